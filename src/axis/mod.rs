//! Axis ticks and labels.
//!
//! Tick values come from one of three generators (nice-number linear, powers
//! of ten, calendar steps). Every candidate set is mapped through the caller's
//! position function, which is the same mapper used for data, and the densest
//! set whose labels do not collide is kept.

mod temporal;

use crate::series::AxisKind;

/// Upper bound on candidate steps tried per axis.
const MAX_STEP_CANDIDATES: usize = 64;

/// Upper bound on multiples generated for one step.
const MAX_MULTIPLES: f64 = 4096.0;

/// Which side of the grid an axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Labels on one line below the grid, centered under their column.
    Horizontal,
    /// Labels to the right of the grid, one per row.
    Vertical,
}

/// One labelled tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Data value.
    pub value: f64,
    /// Character column (horizontal) or row (vertical).
    pub position: usize,
    /// Label text including the unit suffix.
    pub label: String,
}

/// Everything needed to lay ticks out along one axis.
#[derive(Debug, Clone, Copy)]
pub struct AxisFrame<'a, F> {
    /// Axis side.
    pub orientation: Orientation,
    /// Grid size along the axis, in characters.
    pub cells: usize,
    /// Suffix appended to every label.
    pub unit: &'a str,
    /// Data value to character position; `None` outside the view.
    pub position: F,
}

impl<'a, F> AxisFrame<'a, F>
where
    F: Fn(f64) -> Option<usize>,
{
    /// Create a frame.
    pub fn new(orientation: Orientation, cells: usize, unit: &'a str, position: F) -> Self {
        Self { orientation, cells, unit, position }
    }

    /// Ticks for the visible `domain`.
    #[must_use]
    pub fn ticks(&self, domain: (f64, f64), log: bool, kind: AxisKind) -> Vec<Tick> {
        let (min, max) = domain;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Vec::new();
        }

        if kind == AxisKind::Temporal {
            if let Some(ticks) = temporal::ticks(self, min, max) {
                return ticks;
            }
            return self.linear(min, max, &|v, _| temporal::format_fallback(v, min, max));
        }

        if log {
            if let Some(ticks) = self.log(min, max) {
                return ticks;
            }
        }
        self.linear(min, max, &format_number)
    }

    /// Nice-number ticks, densest first.
    fn linear(&self, min: f64, max: f64, format: &dyn Fn(f64, f64) -> String) -> Vec<Tick> {
        // Divide before subtracting; `max - min` overflows near f64::MAX.
        let cells = self.cells.max(1) as f64;
        let mut step = nice_step(max / cells - min / cells);

        for _ in 0..MAX_STEP_CANDIDATES {
            let values = multiples(min, max, step);
            if values.len() <= 1 {
                break;
            }
            if let Some(ticks) = self.place(&values, |v| format(v, step)) {
                return ticks;
            }
            step = next_nice(step);
        }

        // No step yields two non-overlapping labels; fall back to labelling the minimum.
        self.place(&[min], |v| format(v, max / 2.0 - min / 2.0)).unwrap_or_default()
    }

    /// Powers of ten, thinned until the labels fit. `None` with fewer than two.
    fn log(&self, min: f64, max: f64) -> Option<Vec<Tick>> {
        let lo = (min.log10() - 1e-9).ceil() as i32;
        let hi = (max.log10() + 1e-9).floor() as i32;
        if hi - lo < 1 {
            return None;
        }
        let powers: Vec<i32> = (lo..=hi).collect();

        for stride in 1..powers.len() {
            let values: Vec<f64> =
                powers.iter().step_by(stride).map(|&k| 10f64.powi(k)).collect();
            if values.len() < 2 {
                break;
            }
            if let Some(ticks) = self.place(&values, |v| format_power(v.log10().round() as i32)) {
                return Some(ticks);
            }
        }
        None
    }

    /// Map and label `values`; `None` when labels overlap.
    pub(crate) fn place(&self, values: &[f64], label: impl Fn(f64) -> String) -> Option<Vec<Tick>> {
        let ticks: Vec<Tick> = values
            .iter()
            .filter_map(|&value| {
                let position = (self.position)(value)?;
                Some(Tick { value, position, label: format!("{}{}", label(value), self.unit) })
            })
            .collect();

        if ticks.is_empty() {
            return None;
        }
        let fits = match self.orientation {
            Orientation::Horizontal => label_spans(&ticks, self.cells).is_some(),
            Orientation::Vertical => rows_separated(&ticks),
        };
        fits.then_some(ticks)
    }
}

/// Width of the x label line: the grid plus both border columns.
const fn label_line_width(cells: usize) -> usize {
    cells + 2
}

/// Start column of each x label, or `None` if any two labels touch.
fn label_spans(ticks: &[Tick], cells: usize) -> Option<Vec<usize>> {
    let line = label_line_width(cells);
    let mut sorted: Vec<&Tick> = ticks.iter().collect();
    sorted.sort_by_key(|t| t.position);

    let mut starts = Vec::with_capacity(sorted.len());
    let mut next_free = 0usize;
    for tick in sorted {
        let len = tick.label.chars().count();
        if len > line {
            return None;
        }
        // Position is relative to the grid; the label line has the left border.
        let anchor = tick.position + 1;
        let start = anchor.saturating_sub(len / 2).min(line - len);
        if start < next_free {
            return None;
        }
        starts.push(start);
        next_free = start + len + 1;
    }
    Some(starts)
}

fn rows_separated(ticks: &[Tick]) -> bool {
    let mut rows: Vec<usize> = ticks.iter().map(|t| t.position).collect();
    rows.sort_unstable();
    rows.windows(2).all(|w| w[1] - w[0] >= 2)
}

/// Render the x label line for a `cells`-wide grid.
#[must_use]
pub fn render_x_labels(ticks: &[Tick], cells: usize) -> String {
    let line = label_line_width(cells);
    let mut out: Vec<char> = vec![' '; line];
    let mut sorted: Vec<&Tick> = ticks.iter().collect();
    sorted.sort_by_key(|t| t.position);

    if let Some(starts) = label_spans(ticks, cells) {
        for (tick, start) in sorted.iter().zip(starts) {
            for (i, c) in tick.label.chars().enumerate() {
                out[start + i] = c;
            }
        }
    }
    out.into_iter().collect::<String>().trim_end().to_string()
}

/// Label for each grid row; rows without a tick get an empty string.
#[must_use]
pub fn y_labels_by_row(ticks: &[Tick], rows: usize) -> Vec<String> {
    let mut labels = vec![String::new(); rows];
    for tick in ticks {
        if let Some(slot) = labels.get_mut(tick.position) {
            slot.clone_from(&tick.label);
        }
    }
    labels
}

/// Smallest 1/2/5 x 10^k step not below `raw`.
#[must_use]
pub fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let power = 10f64.powf(raw.log10().floor());
    let n = raw / power;
    let nice = if n <= 1.0 {
        1.0
    } else if n <= 2.0 {
        2.0
    } else if n <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * power
}

/// The nice step after `step` in the 1, 2, 5, 10 sequence.
fn next_nice(step: f64) -> f64 {
    let power = 10f64.powf((step.log10() + 1e-9).floor());
    let n = (step / power).round();
    let next = if n < 2.0 {
        2.0
    } else if n < 5.0 {
        5.0
    } else {
        10.0
    };
    next * power
}

/// Multiples of `step` inside `[min, max]`.
fn multiples(min: f64, max: f64, step: f64) -> Vec<f64> {
    let tolerance = step * 1e-9;
    let first = ((min - tolerance) / step).ceil();
    let last = ((max + tolerance) / step).floor();
    if !(first.is_finite() && last.is_finite()) || last < first || last - first >= MAX_MULTIPLES {
        return Vec::new();
    }
    let count = (last - first) as usize + 1;
    (0..count)
        .map(|i| {
            let v = (first + i as f64) * step;
            if v.abs() < tolerance {
                0.0
            } else {
                v
            }
        })
        .collect()
}

/// Format `value` with as many decimals as `step` needs.
#[must_use]
pub fn format_number(value: f64, step: f64) -> String {
    let value = if value.abs() < step.abs() * 1e-9 { 0.0 } else { value };
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let step_magnitude = step.abs().log10().floor() as i32;
    if magnitude >= 7 || magnitude <= -5 {
        let precision = (magnitude - step_magnitude).max(0) as usize;
        return format!("{value:.precision$e}");
    }

    let decimals = (-step.abs().log10() - 1e-9).ceil().max(0.0) as usize;
    format!("{value:.decimals$}")
}

fn format_power(exponent: i32) -> String {
    if (-4..=6).contains(&exponent) {
        format_number(10f64.powi(exponent), 10f64.powi(exponent))
    } else {
        format!("1e{exponent}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_position(min: f64, max: f64, cells: usize) -> impl Fn(f64) -> Option<usize> {
        move |v| {
            let t = (v - min) / (max - min);
            (-1e-9..=1.0 + 1e-9)
                .contains(&t)
                .then(|| (t * (cells - 1) as f64).round() as usize)
        }
    }

    #[test]
    fn test_nice_step_values() {
        assert_relative_eq!(nice_step(3.2), 5.0);
        assert_relative_eq!(nice_step(0.7), 1.0);
        assert_relative_eq!(nice_step(15.0), 20.0);
        assert_relative_eq!(nice_step(1.0), 1.0);
        assert_relative_eq!(nice_step(0.013), 0.02);
    }

    #[test]
    fn test_next_nice_sequence() {
        assert_relative_eq!(next_nice(1.0), 2.0);
        assert_relative_eq!(next_nice(2.0), 5.0);
        assert_relative_eq!(next_nice(5.0), 10.0);
        assert_relative_eq!(next_nice(0.5), 1.0);
    }

    #[test]
    fn test_multiples_inside_range() {
        assert_eq!(multiples(-1.0, 1.0, 0.5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(multiples(0.1, 0.9, 1.0), Vec::<f64>::new());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0, 1.0), "5");
        assert_eq!(format_number(0.5, 0.5), "0.5");
        assert_eq!(format_number(0.3, 0.1), "0.3");
        assert_eq!(format_number(-2.0, 2.0), "-2");
        assert_eq!(format_number(1e-17, 0.5), "0");
        assert_eq!(format_number(3e8, 1e8), "3e8");
    }

    #[test]
    fn test_x_ticks_do_not_overlap() {
        let frame = AxisFrame::new(Orientation::Horizontal, 60, "", linear_position(0.0, 100.0, 60));
        let ticks = frame.ticks((0.0, 100.0), false, AxisKind::Numeric);
        assert!(ticks.len() >= 3, "expected several ticks, got {ticks:?}");
        assert!(label_spans(&ticks, 60).is_some());
        assert!(ticks.iter().all(|t| t.value >= 0.0 && t.value <= 100.0));
    }

    #[test]
    fn test_x_ticks_pick_densest_fitting_step() {
        let frame = AxisFrame::new(Orientation::Horizontal, 60, "", linear_position(0.0, 10.0, 60));
        let ticks = frame.ticks((0.0, 10.0), false, AxisKind::Numeric);
        // Step 1 gives 11 labels of width 1-2 over 60 columns.
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn test_y_ticks_leave_blank_rows() {
        let frame = AxisFrame::new(Orientation::Vertical, 17, "", |v: f64| {
            let t = (v + 1.0) / 2.0;
            (0.0..=1.0).contains(&t).then(|| ((1.0 - t) * 16.0).round() as usize)
        });
        let ticks = frame.ticks((-1.0, 1.0), false, AxisKind::Numeric);
        assert!(ticks.len() >= 2);
        assert!(rows_separated(&ticks));
    }

    #[test]
    fn test_units_appended() {
        let frame = AxisFrame::new(Orientation::Horizontal, 40, " s", linear_position(0.0, 4.0, 40));
        let ticks = frame.ticks((0.0, 4.0), false, AxisKind::Numeric);
        assert!(ticks.iter().all(|t| t.label.ends_with(" s")));
    }

    #[test]
    fn test_log_ticks_are_powers_of_ten() {
        let position = |v: f64| {
            let t = (v.log10() + 1.0) / 4.0;
            (-1e-9..=1.0 + 1e-9).contains(&t).then(|| (t * 59.0).round() as usize)
        };
        let frame = AxisFrame::new(Orientation::Horizontal, 60, "", position);
        let ticks = frame.ticks((0.1, 1000.0), true, AxisKind::Numeric);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.1", "1", "10", "100", "1000"]);
    }

    #[test]
    fn test_log_falls_back_to_linear_with_one_power() {
        let position = |v: f64| {
            let t = (v.log10() - 2.0f64.log10()) / (50.0f64.log10() - 2.0f64.log10());
            (-1e-9..=1.0 + 1e-9).contains(&t).then(|| (t * 59.0).round() as usize)
        };
        let frame = AxisFrame::new(Orientation::Horizontal, 60, "", position);
        let ticks = frame.ticks((2.0, 50.0), true, AxisKind::Numeric);
        assert!(ticks.len() >= 2);
        assert!(ticks.iter().any(|t| (t.value - 10.0).abs() > 1e-9));
    }

    #[test]
    fn test_render_x_labels_aligns_under_columns() {
        let ticks = vec![
            Tick { value: 0.0, position: 0, label: "0".to_string() },
            Tick { value: 1.0, position: 9, label: "1".to_string() },
        ];
        assert_eq!(render_x_labels(&ticks, 10), " 0        1");
    }

    #[test]
    fn test_render_x_labels_shifts_last_label_inside() {
        let ticks = vec![Tick { value: 5.0, position: 9, label: "12345".to_string() }];
        let line = render_x_labels(&ticks, 10);
        assert_eq!(line.chars().count(), 12);
        assert!(line.ends_with("12345"));
    }

    #[test]
    fn test_y_labels_by_row() {
        let ticks = vec![Tick { value: 1.0, position: 0, label: "1".to_string() }];
        assert_eq!(y_labels_by_row(&ticks, 3), vec!["1", "", ""]);
    }

    #[test]
    fn test_multiples_refuses_unbounded_count() {
        assert!(multiples(-1e308, 1e308, 1.0).is_empty());
        assert!(multiples(0.0, 1e9, 1.0).is_empty());
        assert_eq!(multiples(0.0, 10.0, 5.0), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_linear_ticks_span_near_f64_max() {
        let (min, max) = (-1e308, 1e308);
        let position = |v: f64| {
            let t = (v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0);
            (-1e-9..=1.0 + 1e-9).contains(&t).then(|| (t * 59.0).round() as usize)
        };
        let frame = AxisFrame::new(Orientation::Horizontal, 60, "", position);
        let ticks = frame.ticks((min, max), false, AxisKind::Numeric);
        assert!(ticks.len() >= 2);
        assert!(ticks.iter().all(|t| t.value.is_finite() && t.position < 60));
        assert!(ticks.iter().any(|t| t.value == 0.0 && t.label == "0"));
    }

    #[test]
    fn test_inverted_domain_has_no_ticks() {
        let frame = AxisFrame::new(Orientation::Horizontal, 10, "", |_| Some(0));
        assert!(frame.ticks((1.0, 0.0), false, AxisKind::Numeric).is_empty());
    }
}
