//! Input adapter: coerces heterogeneous values into the canonical numeric form.
//!
//! Every value ends up as a finite number, a temporal value expressed as seconds
//! since the Unix epoch, or an explicit invalid marker (NaN). Insertion order is
//! preserved.

use chrono::{NaiveDate, NaiveDateTime};

/// Datetime layouts accepted from text input.
const DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// A single raw input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain number (may be non-finite).
    Number(f64),
    /// Missing value.
    Missing,
    /// Text that may hold a number or an ISO date/datetime.
    Text(String),
    /// Calendar date (midnight UTC).
    Date(NaiveDate),
    /// Naive datetime, interpreted as UTC.
    DateTime(NaiveDateTime),
}

/// A value after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Coerced {
    Numeric(f64),
    Temporal(f64),
    Missing,
}

impl Coerced {
    pub(crate) fn value(self) -> f64 {
        match self {
            Self::Numeric(v) | Self::Temporal(v) => v,
            Self::Missing => f64::NAN,
        }
    }
}

impl Value {
    pub(crate) fn coerce(&self) -> Coerced {
        match self {
            Self::Number(v) => Coerced::Numeric(*v),
            Self::Missing => Coerced::Missing,
            Self::Date(date) => Coerced::Temporal(date_to_epoch(*date)),
            Self::DateTime(dt) => Coerced::Temporal(datetime_to_epoch(*dt)),
            Self::Text(text) => coerce_text(text),
        }
    }
}

fn coerce_text(text: &str) -> Coerced {
    let text = text.trim();
    if let Ok(v) = text.parse::<f64>() {
        return Coerced::Numeric(v);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Coerced::Temporal(datetime_to_epoch(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Coerced::Temporal(date_to_epoch(date));
    }
    Coerced::Missing
}

/// Seconds since the Unix epoch, with sub-second precision.
pub(crate) fn datetime_to_epoch(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
}

fn date_to_epoch(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0).map_or(f64::NAN, datetime_to_epoch)
}

/// Inverse of [`datetime_to_epoch`]; `None` outside chrono's representable range.
pub(crate) fn epoch_to_datetime(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    chrono::DateTime::<chrono::Utc>::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Number(v as f64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

/// Raw series input: one flat sequence, or one inner sequence per series.
///
/// The nesting depth is the single/multi disambiguation signal.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesInput {
    /// A single series.
    Single(Vec<Value>),
    /// One series per inner sequence.
    Multi(Vec<Vec<Value>>),
}

impl SeriesInput {
    /// Number of series this input describes.
    #[must_use]
    pub fn series_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi(rows) => rows.len(),
        }
    }

    pub(crate) fn into_rows(self) -> Vec<Vec<Value>> {
        match self {
            Self::Single(values) => vec![values],
            Self::Multi(rows) => rows,
        }
    }
}

macro_rules! impl_series_input {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<Vec<$t>> for SeriesInput {
                fn from(values: Vec<$t>) -> Self {
                    Self::Single(values.into_iter().map(Value::from).collect())
                }
            }

            impl From<&[$t]> for SeriesInput {
                fn from(values: &[$t]) -> Self {
                    Self::Single(values.iter().cloned().map(Value::from).collect())
                }
            }

            impl From<Vec<Vec<$t>>> for SeriesInput {
                fn from(rows: Vec<Vec<$t>>) -> Self {
                    Self::Multi(
                        rows.into_iter()
                            .map(|row| row.into_iter().map(Value::from).collect())
                            .collect(),
                    )
                }
            }
        )*
    };
}

impl_series_input!(
    f64,
    f32,
    i32,
    i64,
    u32,
    usize,
    Option<f64>,
    String,
    NaiveDate,
    NaiveDateTime,
    Value,
);

impl<'a> From<Vec<&'a str>> for SeriesInput {
    fn from(values: Vec<&'a str>) -> Self {
        Self::Single(values.into_iter().map(Value::from).collect())
    }
}

impl<'a> From<Vec<Vec<&'a str>>> for SeriesInput {
    fn from(rows: Vec<Vec<&'a str>>) -> Self {
        Self::Multi(rows.into_iter().map(|row| row.into_iter().map(Value::from).collect()).collect())
    }
}

impl<const N: usize> From<[f64; N]> for SeriesInput {
    fn from(values: [f64; N]) -> Self {
        Self::Single(values.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<&[f64]>> for SeriesInput {
    fn from(rows: Vec<&[f64]>) -> Self {
        Self::Multi(rows.into_iter().map(|row| row.iter().copied().map(Value::from).collect()).collect())
    }
}
