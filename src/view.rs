//! View configuration: axis bounds, scale mode and grid size.
//!
//! The view is derived once per plot from the data statistics and the user
//! overrides, then mutated in place by pan/zoom/reset. Every mutation keeps
//! `min < max` with finite bounds (and positive bounds on log axes); a
//! mutation that would break that is refused and the prior state retained.

use crate::error::{AxisName, Error, Result};
use crate::options::PlotOptions;
use crate::series::Stats;
use tracing::{debug, warn};

/// Smallest visible span, relative to the magnitude of the bounds.
const MIN_RELATIVE_SPAN: f64 = 1e-12;

/// Data-space bounds of both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower x bound.
    pub x_min: f64,
    /// Upper x bound.
    pub x_max: f64,
    /// Lower y bound.
    pub y_min: f64,
    /// Upper y bound.
    pub y_max: f64,
}

/// Pan direction; left/right move along x, up/down along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
    /// Toward larger y.
    Up,
    /// Toward smaller y.
    Down,
}

/// User overrides for one axis.
#[derive(Debug, Clone, Copy, Default)]
struct AxisRequest {
    min: Option<f64>,
    max: Option<f64>,
    log: bool,
}

/// Mutable view state owned by one plot session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    bounds: Bounds,
    initial: Bounds,
    x_log: bool,
    y_log: bool,
    width: usize,
    height: usize,
    zoom_factor: f64,
    pan_step: f64,
}

impl ViewConfig {
    /// Derive the view from data statistics and options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPositiveDataForLogScale`] when a log axis has no
    /// positive value to clamp to, [`Error::InvalidBounds`] for inverted user
    /// bounds, or a validation error for the options.
    pub fn derive(stats: &Stats, options: &PlotOptions) -> Result<Self> {
        options.validate()?;
        let bounds = Self::derive_bounds(stats, options)?;
        debug!(?bounds, x_log = options.x_as_log, y_log = options.y_as_log, "derived view bounds");

        Ok(Self {
            bounds,
            initial: bounds,
            x_log: options.x_as_log,
            y_log: options.y_as_log,
            width: options.width,
            height: options.height,
            zoom_factor: options.zoom_factor,
            pan_step: options.pan_step,
        })
    }

    /// Per axis: explicit user bound if given, else the data extent; clamped to
    /// the positive domain on log axes; degenerate spans widened.
    ///
    /// # Errors
    ///
    /// See [`ViewConfig::derive`].
    pub fn derive_bounds(stats: &Stats, options: &PlotOptions) -> Result<Bounds> {
        let (x_min, x_max) = derive_axis(
            AxisName::X,
            (stats.x_min, stats.x_max, stats.x_min_positive),
            AxisRequest { min: options.x_min, max: options.x_max, log: options.x_as_log },
        )?;
        let (y_min, y_max) = derive_axis(
            AxisName::Y,
            (stats.y_min, stats.y_max, stats.y_min_positive),
            AxisRequest { min: options.y_min, max: options.y_max, log: options.y_as_log },
        )?;
        Ok(Bounds { x_min, x_max, y_min, y_max })
    }

    /// Current bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Bounds captured at construction.
    #[must_use]
    pub fn initial_bounds(&self) -> Bounds {
        self.initial
    }

    /// Whether the x axis is logarithmic.
    #[must_use]
    pub fn x_log(&self) -> bool {
        self.x_log
    }

    /// Whether the y axis is logarithmic.
    #[must_use]
    pub fn y_log(&self) -> bool {
        self.y_log
    }

    /// Grid width in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in characters.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Zoom factor used by the interactive controller.
    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Pan step fraction used by the interactive controller.
    #[must_use]
    pub fn pan_step(&self) -> f64 {
        self.pan_step
    }

    /// Shift one axis by `step_fraction` of its span, preserving the span.
    ///
    /// Log axes shift in log10 space. Returns `false` (and changes nothing) if
    /// the result would be invalid.
    pub fn pan(&mut self, direction: PanDirection, step_fraction: f64) -> bool {
        let (lo, hi, log, sign) = match direction {
            PanDirection::Left => (self.bounds.x_min, self.bounds.x_max, self.x_log, -1.0),
            PanDirection::Right => (self.bounds.x_min, self.bounds.x_max, self.x_log, 1.0),
            PanDirection::Down => (self.bounds.y_min, self.bounds.y_max, self.y_log, -1.0),
            PanDirection::Up => (self.bounds.y_min, self.bounds.y_max, self.y_log, 1.0),
        };

        let (a, b) = to_space(lo, hi, log);
        let shift = sign * step_fraction * (b - a);
        let (new_lo, new_hi) = from_space(a + shift, b + shift, log);

        if !is_valid_range(new_lo, new_hi, log) {
            warn!(?direction, step_fraction, "pan refused: would produce invalid bounds");
            return false;
        }

        match direction {
            PanDirection::Left | PanDirection::Right => {
                self.bounds.x_min = new_lo;
                self.bounds.x_max = new_hi;
            }
            PanDirection::Up | PanDirection::Down => {
                self.bounds.y_min = new_lo;
                self.bounds.y_max = new_hi;
            }
        }
        true
    }

    /// Scale both spans around their centers; `factor > 1` zooms in.
    ///
    /// Returns `false` (and changes nothing) if either axis would become
    /// invalid or narrower than the minimum span.
    pub fn zoom(&mut self, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            warn!(factor, "zoom refused: factor must be finite and positive");
            return false;
        }

        let x = zoom_axis(self.bounds.x_min, self.bounds.x_max, self.x_log, factor);
        let y = zoom_axis(self.bounds.y_min, self.bounds.y_max, self.y_log, factor);

        match (x, y) {
            (Some((x_min, x_max)), Some((y_min, y_max))) => {
                self.bounds = Bounds { x_min, x_max, y_min, y_max };
                true
            }
            _ => {
                warn!(factor, "zoom refused: span would collapse or overflow");
                false
            }
        }
    }

    /// Restore the bounds captured at construction.
    pub fn reset(&mut self) {
        self.bounds = self.initial;
    }
}

fn derive_axis(
    axis: AxisName,
    (data_min, data_max, data_min_positive): (f64, f64, Option<f64>),
    request: AxisRequest,
) -> Result<(f64, f64)> {
    let mut lo = request.min.unwrap_or(data_min);
    let mut hi = request.max.unwrap_or(data_max);

    if lo > hi {
        match (request.min, request.max) {
            (Some(min), Some(max)) => return Err(Error::InvalidBounds { axis, min, max }),
            (Some(_), None) => hi = lo,
            _ => lo = hi,
        }
    }

    if request.log {
        if lo <= 0.0 {
            lo = data_min_positive.ok_or(Error::NoPositiveDataForLogScale { axis })?;
        }
        if hi <= 0.0 {
            hi = if data_max > 0.0 { data_max } else { lo };
        }
        if lo > hi {
            hi = lo;
        }
    }

    if hi - lo <= f64::EPSILON * lo.abs().max(hi.abs()) {
        debug!(%axis, value = lo, "degenerate range, synthesizing span");
        (lo, hi) = synthesize_span(lo, request.log);
    }

    if !is_valid_range(lo, hi, request.log) {
        return Err(Error::InvalidBounds { axis, min: lo, max: hi });
    }
    Ok((lo, hi))
}

/// Widen a zero-width range around `value`.
///
/// Bounds that would leave the finite (or positive, on log axes) range are
/// clamped, so `value` may end up on an edge of the span.
fn synthesize_span(value: f64, log: bool) -> (f64, f64) {
    if log {
        let lo = value / 2.0;
        let lo = if lo > 0.0 { lo } else { value };
        (lo, (value * 2.0).min(f64::MAX))
    } else if value == 0.0 {
        (-1.0, 1.0)
    } else {
        let delta = value.abs() * 0.1;
        ((value - delta).max(f64::MIN), (value + delta).min(f64::MAX))
    }
}

fn to_space(lo: f64, hi: f64, log: bool) -> (f64, f64) {
    if log {
        (lo.log10(), hi.log10())
    } else {
        (lo, hi)
    }
}

fn from_space(a: f64, b: f64, log: bool) -> (f64, f64) {
    if log {
        (10f64.powf(a), 10f64.powf(b))
    } else {
        (a, b)
    }
}

fn is_valid_range(lo: f64, hi: f64, log: bool) -> bool {
    lo.is_finite() && hi.is_finite() && lo < hi && (!log || lo > 0.0)
}

fn zoom_axis(lo: f64, hi: f64, log: bool, factor: f64) -> Option<(f64, f64)> {
    let (a, b) = to_space(lo, hi, log);
    let center = a / 2.0 + b / 2.0;
    let half = (b / 2.0 - a / 2.0) / factor;
    let (na, nb) = (center - half, center + half);

    if !(na.is_finite() && nb.is_finite()) {
        return None;
    }
    if nb - na < MIN_RELATIVE_SPAN * na.abs().max(nb.abs()).max(1.0) {
        return None;
    }

    let (new_lo, new_hi) = from_space(na, nb, log);
    is_valid_range(new_lo, new_hi, log).then_some((new_lo, new_hi))
}
