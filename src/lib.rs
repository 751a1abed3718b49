//! # Trueno-Termplot
//!
//! Scatter and line plots drawn as character grids, for terminals and
//! notebook-style text output.
//!
//! Each terminal cell is split into sub-cells (2×2 quadrant blocks or 2×4
//! Braille dots) so a plot of a given character size carries several times
//! as many distinct positions. Several series can share one plot; each gets
//! its own ANSI color and legend entry.
//!
//! ## Features
//!
//! - **Sub-cell resolution**: quadrant block or Braille glyphs, with an ASCII
//!   fallback for terminals without Unicode
//! - **Multiple series**: ragged series, per-series colors, legend labels
//! - **Axes**: linear, logarithmic and calendar-aware temporal ticks
//! - **Histograms**: binned counts drawn as bar outlines
//! - **Interactive**: pan with `h/j/k/l`, zoom with `u/n`, reset with `r`
//! - **Streaming**: [`plot::PlotSession`] redraws a plot in place
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trueno_termplot::prelude::*;
//!
//! # fn main() -> trueno_termplot::Result<()> {
//! let ys: Vec<f64> = (0..100).map(|i| (f64::from(i) / 10.0).sin()).collect();
//! Plot::new(ys)?
//!     .options(PlotOptions::new().title("sine").lines(true))
//!     .show()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `terminal` (default): raw key reads and cursor control via crossterm
//! - `cli`: the `termplot` binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Input normalization into ragged numeric series.
pub mod series;

/// Plot options and their YAML configuration file.
pub mod options;

/// Visible bounds with pan, zoom and reset.
pub mod view;

/// Linear and logarithmic scales, and the data-to-grid mapper.
pub mod scale;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Sub-cell rasterization and glyph encoding.
pub mod raster;

/// Tick placement and label formatting.
pub mod axis;

/// ANSI colors and per-series assignment.
pub mod color;

/// Frame assembly: header, bordered body, legend.
pub mod layout;

/// Render entry points and the streaming session.
pub mod plot;

/// Histogram binning on top of the plot pipeline.
pub mod histogram;

// ============================================================================
// Interactive Modules
// ============================================================================

/// Key-driven pan/zoom loop.
pub mod interactive;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-termplot operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust
/// use trueno_termplot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::TermColor;
    pub use crate::error::{Error, Result};
    pub use crate::histogram::{BinStrategy, Histogram};
    pub use crate::interactive::{run_interactive, KeyReader, LineSink, MemorySink, ScriptedKeys};
    pub use crate::options::{CharacterSet, ColorOption, PlotOptions};
    pub use crate::plot::{plot, render, Plot, PlotSession};
    pub use crate::series::{AxisKind, MultiSeries, Series, SeriesInput, Value};
    pub use crate::view::{Bounds, PanDirection, ViewConfig};
}

// ============================================================================
// Tests
// ============================================================================
