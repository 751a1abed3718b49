//! Scale functions and the coordinate mapper.
//!
//! Scales transform data values to continuous grid positions. The mapper
//! combines an x and a y scale built from a [`ViewConfig`] snapshot and turns
//! data points into discrete grid cells. It is stateless: callers re-map every
//! point after a view mutation.

use crate::error::{Error, Result};
use crate::view::ViewConfig;

/// Relative tolerance when deciding whether a value lies inside the view.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Trait for scale functions that map domain values to range positions.
pub trait Scale {
    /// Transform a domain value; `None` when the value is outside the
    /// transform's domain (non-finite, or non-positive for log scales).
    fn scale(&self, value: f64) -> Option<f64>;

    /// Fraction of the way through the domain, in transformed space
    /// (0 at the lower bound, 1 at the upper bound).
    fn fraction(&self, value: f64) -> Option<f64>;

    /// Invert the scale (range position to domain value).
    fn invert(&self, position: f64) -> f64;

    /// Get the domain extent.
    fn domain(&self) -> (f64, f64);

    /// Get the range extent.
    fn range(&self) -> (f64, f64);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or non-finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !(domain.0.is_finite() && domain.1.is_finite()) || domain.0 >= domain.1 {
            return Err(Error::ScaleDomain(format!(
                "linear domain must satisfy min < max, got [{}, {}]",
                domain.0, domain.1
            )));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> Option<f64> {
        let t = self.fraction(value)?;
        Some(self.range_min + t * (self.range_max - self.range_min))
    }

    fn fraction(&self, value: f64) -> Option<f64> {
        // Halved operands keep the span finite for domains near f64::MAX.
        value.is_finite().then(|| {
            (value / 2.0 - self.domain_min / 2.0) / (self.domain_max / 2.0 - self.domain_min / 2.0)
        })
    }

    fn invert(&self, position: f64) -> f64 {
        let t = (position - self.range_min) / (self.range_max - self.range_min);
        self.domain_min * (1.0 - t) + self.domain_max * t
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Base-10 logarithmic scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    log_min: f64,
    log_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LogScale {
    /// Create a new logarithmic scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain contains non-positive values or is empty.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !(domain.0 > 0.0 && domain.1.is_finite()) || domain.0 >= domain.1 {
            return Err(Error::ScaleDomain(format!(
                "log domain must satisfy 0 < min < max, got [{}, {}]",
                domain.0, domain.1
            )));
        }

        Ok(Self {
            log_min: domain.0.log10(),
            log_max: domain.1.log10(),
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale for LogScale {
    fn scale(&self, value: f64) -> Option<f64> {
        let t = self.fraction(value)?;
        Some(self.range_min + t * (self.range_max - self.range_min))
    }

    fn fraction(&self, value: f64) -> Option<f64> {
        (value.is_finite() && value > 0.0)
            .then(|| (value.log10() - self.log_min) / (self.log_max - self.log_min))
    }

    fn invert(&self, position: f64) -> f64 {
        let t = (position - self.range_min) / (self.range_max - self.range_min);
        10f64.powf(self.log_min + t * (self.log_max - self.log_min))
    }

    fn domain(&self) -> (f64, f64) {
        (10f64.powf(self.log_min), 10f64.powf(self.log_max))
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Linear or logarithmic scale for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisScale {
    /// Linear interpolation.
    Linear(LinearScale),
    /// Base-10 logarithmic interpolation.
    Log(LogScale),
}

impl AxisScale {
    /// Build a scale for the given domain and range.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is invalid for the requested mode.
    pub fn new(domain: (f64, f64), range: (f64, f64), log: bool) -> Result<Self> {
        if log {
            LogScale::new(domain, range).map(Self::Log)
        } else {
            LinearScale::new(domain, range).map(Self::Linear)
        }
    }

    /// Whether this is a log scale.
    #[must_use]
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log(_))
    }
}

impl Scale for AxisScale {
    fn scale(&self, value: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value),
        }
    }

    fn fraction(&self, value: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => s.fraction(value),
            Self::Log(s) => s.fraction(value),
        }
    }

    fn invert(&self, position: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(position),
            Self::Log(s) => s.invert(position),
        }
    }

    fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Log(s) => s.domain(),
        }
    }

    fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Log(s) => s.range(),
        }
    }
}

// ============================================================================
// Coordinate Mapper
// ============================================================================

/// Maps data-space points onto a `rows x cols` grid for one view snapshot.
///
/// Row 0 is the top of the grid (largest y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    x: AxisScale,
    y: AxisScale,
    cols: usize,
    rows: usize,
}

impl CoordinateMapper {
    /// Create a mapper for a grid of `cols x rows` cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty or the view bounds are invalid
    /// for their scale mode.
    pub fn new(view: &ViewConfig, cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions { width: cols, height: rows });
        }
        let b = view.bounds();
        let x = AxisScale::new((b.x_min, b.x_max), (0.0, (cols - 1) as f64), view.x_log())?;
        let y = AxisScale::new((b.y_min, b.y_max), ((rows - 1) as f64, 0.0), view.y_log())?;
        Ok(Self { x, y, cols, rows })
    }

    /// Grid width in cells.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid height in cells.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The x scale.
    #[must_use]
    pub fn x_scale(&self) -> &AxisScale {
        &self.x
    }

    /// The y scale.
    #[must_use]
    pub fn y_scale(&self) -> &AxisScale {
        &self.y
    }

    /// Continuous `(col, row)` position, not clamped to the grid.
    ///
    /// `None` for non-finite values or non-positive values on log axes.
    #[must_use]
    pub fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Some((self.x.scale(x)?, self.y.scale(y)?))
    }

    /// Discrete `(row, col)` cell, or `None` for invalid or out-of-view points.
    #[must_use]
    pub fn map(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        Some((self.map_y(y)?, self.map_x(x)?))
    }

    /// Column for an x value inside the view.
    #[must_use]
    pub fn map_x(&self, x: f64) -> Option<usize> {
        discretize(&self.x, x, self.cols)
    }

    /// Row for a y value inside the view.
    #[must_use]
    pub fn map_y(&self, y: f64) -> Option<usize> {
        discretize(&self.y, y, self.rows)
    }
}

fn discretize(scale: &AxisScale, value: f64, cells: usize) -> Option<usize> {
    let t = scale.fraction(value)?;
    if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&t) {
        return None;
    }
    let position = scale.scale(value)?.round();
    Some((position.max(0.0) as usize).min(cells - 1))
}
