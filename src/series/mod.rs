//! Canonical series model.
//!
//! Normalizes raw input into a list of (x, y) sequences. Each [`Series`] keeps
//! its own length; invalid values are stored as NaN and dropped at render time,
//! never propagated to other series.

mod input;

pub use input::{SeriesInput, Value};
pub(crate) use input::{datetime_to_epoch, epoch_to_datetime};

use crate::error::{Error, Result};
use input::Coerced;
use std::sync::OnceLock;

/// Whether an axis carries plain numbers or timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisKind {
    /// Plain numeric values.
    #[default]
    Numeric,
    /// Seconds since the Unix epoch, labeled as dates/times.
    Temporal,
}

// ============================================================================
// Series
// ============================================================================

/// One ordered sequence of (x, y) points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Series {
    /// Create a series from matching x and y values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the lengths differ.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::ShapeMismatch(format!(
                "x has {} elements, y has {} elements",
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self { xs, ys })
    }

    /// Create a series whose x values are the index positions `0..len`.
    #[must_use]
    pub fn from_ys(ys: Vec<f64>) -> Self {
        let xs = (0..ys.len()).map(|i| i as f64).collect();
        Self { xs, ys }
    }

    /// Number of points, valid or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ys.len()
    }

    /// Whether the series has no points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }

    /// The x values.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// The y values.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// All points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Points whose x and y are both finite.
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points().filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

// ============================================================================
// Aggregate statistics
// ============================================================================

/// Aggregate extents across every finite point of every series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Smallest finite x.
    pub x_min: f64,
    /// Largest finite x.
    pub x_max: f64,
    /// Smallest finite y.
    pub y_min: f64,
    /// Largest finite y.
    pub y_max: f64,
    /// Smallest strictly positive finite x, if any.
    pub x_min_positive: Option<f64>,
    /// Smallest strictly positive finite y, if any.
    pub y_min_positive: Option<f64>,
    /// Number of points with finite x and y.
    pub finite_points: usize,
}

impl Stats {
    /// Extents used when no finite point exists.
    pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

    fn compute(series: &[Series]) -> Self {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut x_min_positive: Option<f64> = None;
        let mut y_min_positive: Option<f64> = None;
        let mut finite_points = 0;

        for (x, y) in series.iter().flat_map(Series::finite_points) {
            finite_points += 1;
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
            if x > 0.0 {
                x_min_positive = Some(x_min_positive.map_or(x, |m| m.min(x)));
            }
            if y > 0.0 {
                y_min_positive = Some(y_min_positive.map_or(y, |m| m.min(y)));
            }
        }

        if finite_points == 0 {
            let (lo, hi) = Self::DEFAULT_RANGE;
            return Self {
                x_min: lo,
                x_max: hi,
                y_min: lo,
                y_max: hi,
                x_min_positive: None,
                y_min_positive: None,
                finite_points,
            };
        }

        Self { x_min, x_max, y_min, y_max, x_min_positive, y_min_positive, finite_points }
    }
}

// ============================================================================
// MultiSeries
// ============================================================================

/// A collection of series plotted together on shared axes.
///
/// Immutable after construction; the aggregate [`Stats`] are computed on first
/// use and memoized.
#[derive(Debug, Clone)]
pub struct MultiSeries {
    series: Vec<Series>,
    x_kind: AxisKind,
    y_kind: AxisKind,
    stats: OnceLock<Stats>,
}

impl MultiSeries {
    /// Build from y values only; x defaults to index positions per series.
    ///
    /// # Errors
    ///
    /// Currently infallible for y-only input, kept fallible for symmetry with
    /// [`MultiSeries::from_xy`].
    pub fn from_ys(ys: impl Into<SeriesInput>) -> Result<Self> {
        Self::build(ys.into(), None)
    }

    /// Build from x and y values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the series counts or any per-series
    /// lengths disagree.
    pub fn from_xy(xs: impl Into<SeriesInput>, ys: impl Into<SeriesInput>) -> Result<Self> {
        Self::build(ys.into(), Some(xs.into()))
    }

    /// Build from y values and optional x values.
    ///
    /// # Errors
    ///
    /// See [`MultiSeries::from_xy`].
    pub fn new(ys: SeriesInput, xs: Option<SeriesInput>) -> Result<Self> {
        Self::build(ys, xs)
    }

    /// Wrap already-canonical series (both axes numeric).
    #[must_use]
    pub fn from_series(series: Vec<Series>) -> Self {
        Self::assemble(series, AxisKind::Numeric, AxisKind::Numeric)
    }

    fn assemble(series: Vec<Series>, x_kind: AxisKind, y_kind: AxisKind) -> Self {
        Self { series, x_kind, y_kind, stats: OnceLock::new() }
    }

    fn build(ys: SeriesInput, xs: Option<SeriesInput>) -> Result<Self> {
        let y_multi = matches!(ys, SeriesInput::Multi(_));
        let (y_rows, y_kind) = coerce_rows(ys.into_rows());

        let Some(xs) = xs else {
            let series = y_rows.into_iter().map(Series::from_ys).collect();
            return Ok(Self::assemble(series, AxisKind::Numeric, y_kind));
        };

        let x_count = xs.series_count();
        let x_multi = matches!(xs, SeriesInput::Multi(_));
        let (x_rows, x_kind) = coerce_rows(xs.into_rows());

        let x_rows = match (x_multi, y_multi) {
            (true, true) | (false, false) => {
                if x_count != y_rows.len() {
                    return Err(Error::ShapeMismatch(format!(
                        "x has {x_count} series, y has {} series",
                        y_rows.len()
                    )));
                }
                x_rows
            }
            // One flat x sequence shared by every y series.
            (false, true) => vec![x_rows.into_iter().next().unwrap_or_default(); y_rows.len()],
            (true, false) => {
                if x_count != 1 {
                    return Err(Error::ShapeMismatch(format!(
                        "x has {x_count} series, y is a single series"
                    )));
                }
                x_rows
            }
        };

        let series = x_rows
            .into_iter()
            .zip(y_rows)
            .enumerate()
            .map(|(i, (x, y))| {
                Series::new(x, y).map_err(|err| match err {
                    Error::ShapeMismatch(msg) => Error::ShapeMismatch(format!("series {i}: {msg}")),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::assemble(series, x_kind, y_kind))
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether there are no series at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Length of each series.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.series.iter().map(Series::len).collect()
    }

    /// The series, in input order.
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Iterate the series in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    /// Kind of the x axis.
    #[must_use]
    pub fn x_kind(&self) -> AxisKind {
        self.x_kind
    }

    /// Kind of the y axis.
    #[must_use]
    pub fn y_kind(&self) -> AxisKind {
        self.y_kind
    }

    /// Aggregate statistics, computed once.
    pub fn stats(&self) -> &Stats {
        self.stats.get_or_init(|| Stats::compute(&self.series))
    }
}

impl<'a> IntoIterator for &'a MultiSeries {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Coerce every row; the axis is temporal when every non-missing value was temporal.
fn coerce_rows(rows: Vec<Vec<Value>>) -> (Vec<Vec<f64>>, AxisKind) {
    let mut saw_temporal = false;
    let mut saw_numeric = false;

    let rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| {
                    let coerced = value.coerce();
                    match coerced {
                        Coerced::Temporal(_) => saw_temporal = true,
                        Coerced::Numeric(_) => saw_numeric = true,
                        Coerced::Missing => {}
                    }
                    coerced.value()
                })
                .collect()
        })
        .collect();

    let kind = if saw_temporal && !saw_numeric { AxisKind::Temporal } else { AxisKind::Numeric };
    (rows, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_single_series_from_flat_input() {
        let ms = MultiSeries::from_ys(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ms.len(), 1);
        assert_eq!(ms.series()[0].xs(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_ragged_series_get_independent_indexes() {
        let ms = MultiSeries::from_ys(vec![vec![5.0; 4], vec![7.0; 2]]).unwrap();
        assert_eq!(ms.shape(), vec![4, 2]);
        assert_eq!(ms.series()[1].xs(), &[0.0, 1.0]);
    }

    #[test]
    fn test_series_count_mismatch() {
        let result =
            MultiSeries::from_xy(vec![vec![1.0], vec![2.0]], vec![vec![1.0], vec![2.0], vec![3.0]]);
        assert!(matches!(result, Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn test_series_length_mismatch() {
        let result = MultiSeries::from_xy(vec![1.0, 2.0, 3.0], vec![4.0, 5.0]);
        assert!(matches!(result, Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn test_flat_x_shared_across_nested_y() {
        let ms = MultiSeries::from_xy(vec![10.0, 20.0], vec![vec![1.0, 2.0], vec![3.0, 4.0]])
            .unwrap();
        assert_eq!(ms.len(), 2);
        assert_eq!(ms.series()[1].xs(), &[10.0, 20.0]);
    }

    #[test]
    fn test_nested_x_with_flat_y_requires_one_series() {
        let ok = MultiSeries::from_xy(vec![vec![1.0, 2.0]], vec![3.0, 4.0]);
        assert!(ok.is_ok());
        let err = MultiSeries::from_xy(vec![vec![1.0], vec![2.0]], vec![3.0]);
        assert!(matches!(err, Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn test_stats_skip_invalid_points() {
        let ms = MultiSeries::from_xy(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![Some(-1.0), None, Some(f64::NAN), Some(8.0)],
        )
        .unwrap();
        let stats = ms.stats();
        assert_eq!(stats.finite_points, 2);
        assert_eq!((stats.x_min, stats.x_max), (1.0, 4.0));
        assert_eq!((stats.y_min, stats.y_max), (-1.0, 8.0));
        assert_eq!(stats.y_min_positive, Some(8.0));
    }

    #[test]
    fn test_stats_default_range_when_all_invalid() {
        let ms = MultiSeries::from_ys(vec![f64::NAN, f64::INFINITY]).unwrap();
        let stats = ms.stats();
        assert_eq!((stats.x_min, stats.x_max), Stats::DEFAULT_RANGE);
        assert_eq!((stats.y_min, stats.y_max), Stats::DEFAULT_RANGE);
        assert_eq!(stats.finite_points, 0);
    }

    #[test]
    fn test_stats_are_memoized() {
        let ms = MultiSeries::from_ys(vec![1.0, 2.0]).unwrap();
        let first: *const Stats = ms.stats();
        let second: *const Stats = ms.stats();
        assert_eq!(first, second);
    }

    #[test]
    fn test_temporal_x_axis_detected() {
        let dates: Vec<NaiveDate> =
            (1..=4).filter_map(|d| NaiveDate::from_ymd_opt(2024, 2, d)).collect();
        let ms = MultiSeries::from_xy(dates, vec![1.0, 2.0, 3.0, 2.0]).unwrap();
        assert_eq!(ms.x_kind(), AxisKind::Temporal);
        assert_eq!(ms.y_kind(), AxisKind::Numeric);
        let xs = ms.series()[0].xs();
        assert!((xs[1] - xs[0] - 86_400.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_text_axis_is_numeric() {
        let ms = MultiSeries::from_xy(vec!["1", "2024-01-01", "x"], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ms.x_kind(), AxisKind::Numeric);
        assert!(ms.series()[0].xs()[2].is_nan());
    }

    #[test]
    fn test_empty_series_survives() {
        let ms = MultiSeries::from_ys(vec![vec![], vec![1.0]]).unwrap();
        assert_eq!(ms.len(), 2);
        assert!(ms.series()[0].is_empty());
    }
}
