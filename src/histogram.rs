//! Histogram plots.
//!
//! Values are binned into equal-width bins and each series' counts are drawn
//! as a bar outline: up the left edge of each bin, across its top, and back
//! down after the last bin.

use crate::error::{AxisName, Error, Result};
use crate::options::PlotOptions;
use crate::plot::render;
use crate::series::{MultiSeries, Series, SeriesInput};

/// Fraction of the data range added on each side when a bin bound is not
/// given explicitly.
const AUTO_PADDING: f64 = 0.1;

/// Binning strategy for histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinStrategy {
    /// Sturges' rule: ceil(log2(n) + 1)
    Sturges,
    /// Fixed number of bins
    Fixed(usize),
}

impl Default for BinStrategy {
    fn default() -> Self {
        Self::Fixed(20)
    }
}

/// Builder for creating histograms.
#[derive(Debug, Clone)]
pub struct Histogram {
    bin_strategy: BinStrategy,
    bins_min: Option<f64>,
    bins_max: Option<f64>,
    lines: bool,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Bin edges and per-series counts.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedData {
    edges: Vec<f64>,
    counts: Vec<Vec<usize>>,
}

impl Histogram {
    /// Create a new histogram builder.
    #[must_use]
    pub fn new() -> Self {
        Self { bin_strategy: BinStrategy::default(), bins_min: None, bins_max: None, lines: true }
    }

    /// Set the binning strategy.
    #[must_use]
    pub fn bins(mut self, strategy: BinStrategy) -> Self {
        self.bin_strategy = strategy;
        self
    }

    /// Fix the lower edge of the first bin.
    #[must_use]
    pub fn bins_min(mut self, value: f64) -> Self {
        self.bins_min = Some(value);
        self
    }

    /// Fix the upper edge of the last bin.
    #[must_use]
    pub fn bins_max(mut self, value: f64) -> Self {
        self.bins_max = Some(value);
        self
    }

    /// Draw the bar outline as connected lines (on by default).
    #[must_use]
    pub fn lines(mut self, enabled: bool) -> Self {
        self.lines = enabled;
        self
    }

    /// Number of bins for `n` values.
    #[must_use]
    pub fn bin_count(&self, n: usize) -> usize {
        match self.bin_strategy {
            BinStrategy::Sturges if n > 0 => ((n as f64).log2().ceil() + 1.0) as usize,
            BinStrategy::Sturges => 1,
            BinStrategy::Fixed(bins) => bins.max(1),
        }
    }

    /// Bin every series of `values`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyData` when a bin bound must come from the data and there
    /// is no finite value, and `InvalidBounds` when the bin range is empty.
    pub fn compute(&self, values: impl Into<SeriesInput>) -> Result<BinnedData> {
        let data = MultiSeries::from_ys(values)?;
        let finite: Vec<f64> =
            data.iter().flat_map(|s| s.ys().iter().copied()).filter(|v| v.is_finite()).collect();

        let data_range = finite.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

        let (mut lo, mut hi) = match (self.bins_min, self.bins_max, data_range) {
            (Some(lo), Some(hi), _) => (lo, hi),
            (lo, hi, Some((data_lo, data_hi))) => (lo.unwrap_or(data_lo), hi.unwrap_or(data_hi)),
            (_, _, None) => return Err(Error::EmptyData),
        };
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::InvalidBounds { axis: AxisName::X, min: lo, max: hi });
        }

        let padding = AUTO_PADDING * (hi / 2.0 - lo / 2.0) * 2.0;
        if self.bins_min.is_none() {
            lo = (lo - padding).max(f64::MIN);
        }
        if self.bins_max.is_none() {
            hi = (hi + padding).min(f64::MAX);
        }

        let bins = self.bin_count(finite.len());
        let edges: Vec<f64> = (0..=bins)
            .map(|i| {
                let t = i as f64 / bins as f64;
                lo * (1.0 - t) + hi * t
            })
            .collect();
        let counts = data.iter().map(|s| count_bins(s.ys(), &edges)).collect();

        Ok(BinnedData { edges, counts })
    }

    /// Render the histogram of `values` with `options`.
    ///
    /// # Errors
    ///
    /// Returns binning errors and rendering errors.
    pub fn render(&self, values: impl Into<SeriesInput>, options: &PlotOptions) -> Result<Vec<String>> {
        let series = self.compute(values)?.to_series()?;
        let mut options = options.clone();
        options.lines = self.lines;
        render(&series, &options)
    }
}

/// Counts per bin; bins are half-open except the last, which includes its
/// upper edge. Values outside the edges are not counted.
fn count_bins(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; bins];
    let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
        return counts;
    };

    for &v in values.iter().filter(|v| v.is_finite()) {
        if v < first || v > last {
            continue;
        }
        // Index of the last edge not above v, clamped so v == last lands in the final bin.
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

impl BinnedData {
    /// Bin edges, one more than the number of bins.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Counts per series per bin.
    #[must_use]
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Bar outline points for one series' counts:
    /// `(e0, 0), (e0, c0), (e1, c0), (e1, c1), …, (eN, cN-1), (eN, 0)`.
    #[must_use]
    pub fn outline(&self, counts: &[usize]) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(2 * counts.len() + 2);
        let mut ys = Vec::with_capacity(2 * counts.len() + 2);

        if let Some(&first) = self.edges.first() {
            xs.push(first);
            ys.push(0.0);
        }
        for (i, &count) in counts.iter().enumerate() {
            let height = count as f64;
            xs.extend([self.edges[i], self.edges[i + 1]]);
            ys.extend([height, height]);
        }
        if let Some(&last) = self.edges.last() {
            xs.push(last);
            ys.push(0.0);
        }
        (xs, ys)
    }

    /// One bar-outline series per input series.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the counts do not match the edges.
    pub fn to_series(&self) -> Result<MultiSeries> {
        let series = self
            .counts
            .iter()
            .map(|counts| {
                let (xs, ys) = self.outline(counts);
                Series::new(xs, ys)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiSeries::from_series(series))
    }
}
