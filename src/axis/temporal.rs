//! Calendar-aware ticks for date/datetime axes.
//!
//! Values on a temporal axis are seconds since the Unix epoch (UTC).

use super::{AxisFrame, Orientation, Tick};
use crate::series::{datetime_to_epoch, epoch_to_datetime};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3600.0;
const DAY: f64 = 86_400.0;

/// Fewest ticks a calendar step must produce, when the axis has room for them.
const MIN_TICKS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    /// Approximate length in seconds, used only to bound tick counts.
    fn approx_seconds(self) -> f64 {
        match self {
            Self::Year => 365.25 * DAY,
            Self::Month => 30.44 * DAY,
            Self::Day => DAY,
            Self::Hour => HOUR,
            Self::Minute => MINUTE,
            Self::Second => 1.0,
        }
    }

    fn format(self, same_date: bool) -> &'static str {
        match (self, same_date) {
            (Self::Year, _) => "%Y",
            (Self::Month, _) => "%Y-%m",
            (Self::Day, _) => "%Y-%m-%d",
            (Self::Hour | Self::Minute, true) => "%H:%M",
            (Self::Hour | Self::Minute, false) => "%Y-%m-%d %H:%M",
            (Self::Second, true) => "%H:%M:%S",
            (Self::Second, false) => "%Y-%m-%d %H:%M:%S",
        }
    }
}

/// Steps tried from coarse to fine.
const CANDIDATES: &[(Unit, u32)] = &[
    (Unit::Year, 100),
    (Unit::Year, 50),
    (Unit::Year, 10),
    (Unit::Year, 5),
    (Unit::Year, 2),
    (Unit::Year, 1),
    (Unit::Month, 6),
    (Unit::Month, 3),
    (Unit::Month, 1),
    (Unit::Day, 14),
    (Unit::Day, 7),
    (Unit::Day, 2),
    (Unit::Day, 1),
    (Unit::Hour, 12),
    (Unit::Hour, 6),
    (Unit::Hour, 3),
    (Unit::Hour, 1),
    (Unit::Minute, 30),
    (Unit::Minute, 15),
    (Unit::Minute, 10),
    (Unit::Minute, 5),
    (Unit::Minute, 1),
    (Unit::Second, 30),
    (Unit::Second, 10),
    (Unit::Second, 5),
    (Unit::Second, 1),
];

/// Ticks at the coarsest calendar step producing enough labels that fit, or
/// `None` when no step does.
pub(super) fn ticks<F>(frame: &AxisFrame<'_, F>, min: f64, max: f64) -> Option<Vec<Tick>>
where
    F: Fn(f64) -> Option<usize>,
{
    let start = epoch_to_datetime(min)?;
    let end = epoch_to_datetime(max)?;
    let max_count = match frame.orientation {
        Orientation::Horizontal => frame.cells / 2,
        Orientation::Vertical => frame.cells.div_ceil(2),
    };
    let min_count = MIN_TICKS.min(max_count).max(2);

    for &(unit, n) in CANDIDATES {
        let estimate = (max - min) / (unit.approx_seconds() * f64::from(n));
        if estimate < 1.0 {
            continue;
        }
        if estimate > max_count as f64 + 2.0 {
            break;
        }

        let values = calendar_values(unit, n, start, end, min, max);
        if values.len() < min_count || values.len() > max_count {
            continue;
        }

        let same_date = shares_one_date(&values);
        let format = unit.format(same_date);
        return frame.place(&values, |v| format_epoch(v, format));
    }
    None
}

/// Label for a numeric tick on a temporal axis that found no calendar step.
pub(super) fn format_fallback(value: f64, min: f64, max: f64) -> String {
    let same_date = match (epoch_to_datetime(min), epoch_to_datetime(max)) {
        (Some(a), Some(b)) => a.date() == b.date(),
        _ => false,
    };
    format_epoch(value, Unit::Second.format(same_date))
}

fn format_epoch(value: f64, format: &str) -> String {
    // Snap to microseconds so 09:59:59.9999998 prints as 10:00:00.
    let value = (value * 1e6).round() / 1e6;
    epoch_to_datetime(value).map_or_else(|| format!("{value}"), |dt| dt.format(format).to_string())
}

fn shares_one_date(values: &[f64]) -> bool {
    let mut dates = values.iter().filter_map(|&v| epoch_to_datetime(v)).map(|dt| dt.date());
    let Some(first) = dates.next() else {
        return true;
    };
    dates.all(|d| d == first)
}

fn calendar_values(
    unit: Unit,
    n: u32,
    start: NaiveDateTime,
    end: NaiveDateTime,
    min: f64,
    max: f64,
) -> Vec<f64> {
    let inside = |v: &f64| *v >= min && *v <= max;
    match unit {
        Unit::Year => {
            let step = n as i32;
            let first = start.year().div_euclid(step) * step;
            (first..=end.year())
                .step_by(n as usize)
                .filter_map(|year| month_start(year, 1))
                .filter(inside)
                .collect()
        }
        Unit::Month => {
            let index = |dt: NaiveDateTime| dt.year() * 12 + dt.month0() as i32;
            let step = n as i32;
            let first = index(start).div_euclid(step) * step;
            (first..=index(end))
                .step_by(n as usize)
                .filter_map(|m| month_start(m.div_euclid(12), m.rem_euclid(12) as u32 + 1))
                .filter(inside)
                .collect()
        }
        Unit::Day => fixed_steps(min, max, DAY * f64::from(n)),
        Unit::Hour => fixed_steps(min, max, HOUR * f64::from(n)),
        Unit::Minute => fixed_steps(min, max, MINUTE * f64::from(n)),
        Unit::Second => fixed_steps(min, max, f64::from(n)),
    }
}

fn month_start(year: i32, month: u32) -> Option<f64> {
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0).map(datetime_to_epoch)
}

/// Multiples of a fixed step in seconds, aligned to the epoch.
fn fixed_steps(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}
