//! Plot rendering pipeline.
//!
//! `MultiSeries` + `PlotOptions` → `ViewConfig` → mapper → canvas → glyph grid
//! → framed lines. Rendering is a pure function of its inputs; printing goes
//! through a [`LineSink`].

use crate::axis::{render_x_labels, y_labels_by_row, AxisFrame, Orientation};
use crate::error::Result;
use crate::interactive::LineSink;
use crate::layout;
use crate::options::{CharacterSet, PlotOptions};
use crate::raster::{self, glyphs};
use crate::scale::CoordinateMapper;
use crate::series::{MultiSeries, SeriesInput};
use crate::view::ViewConfig;
use tracing::debug;

/// Render a plot to lines, deriving the view from the data and options.
///
/// # Errors
///
/// Returns an error for invalid options or when a log axis has no positive
/// data.
pub fn render(series: &MultiSeries, options: &PlotOptions) -> Result<Vec<String>> {
    let view = ViewConfig::derive(series.stats(), options)?;
    render_view(series, options, &view)
}

/// Render a plot for an explicit view.
///
/// # Errors
///
/// Returns an error if the view's bounds are invalid for its scales.
pub fn render_view(series: &MultiSeries, options: &PlotOptions, view: &ViewConfig) -> Result<Vec<String>> {
    let set = options.effective_character_set();
    let (res_x, res_y) = set.resolution();
    let (width, height) = (view.width(), view.height());

    let mapper = CoordinateMapper::new(view, width * res_x, height * res_y)?;
    let canvas = raster::rasterize(series, &mapper, options.lines)?;

    let colors = options.color.assignment();
    let density = options.density && colors.is_none();
    let mut grid = glyphs::encode(&canvas, set, density)?;

    let to_col = |v: f64| mapper.map_x(v).map(|c| c / res_x);
    let to_row = |v: f64| mapper.map_y(v).map(|r| r / res_y);

    let grid_cols: Vec<usize> = options.x_gridlines.iter().filter_map(|&v| to_col(v)).collect();
    let grid_rows: Vec<usize> = options.y_gridlines.iter().filter_map(|&v| to_row(v)).collect();
    grid.add_gridlines(&grid_cols, &grid_rows, set == CharacterSet::Ascii);

    let bounds = view.bounds();
    let x_ticks = AxisFrame::new(Orientation::Horizontal, width, &options.x_unit, to_col).ticks(
        (bounds.x_min, bounds.x_max),
        view.x_log(),
        series.x_kind(),
    );
    let y_ticks = AxisFrame::new(Orientation::Vertical, height, &options.y_unit, to_row).ticks(
        (bounds.y_min, bounds.y_max),
        view.y_log(),
        series.y_kind(),
    );

    let mut lines = layout::header(options, view, (series.x_kind(), series.y_kind()));
    lines.extend(layout::body(
        &grid.render(colors.as_ref()),
        &y_labels_by_row(&y_ticks, height),
        &render_x_labels(&x_ticks, width),
        width,
    ));
    lines.extend(layout::legend(options, series.len(), colors.as_ref()));

    debug!(lines = lines.len(), x_ticks = x_ticks.len(), y_ticks = y_ticks.len(), "rendered frame");
    Ok(lines)
}

/// Render and print a plot to stdout.
///
/// With `interactive` set (and the `terminal` feature), enters the key-driven
/// pan/zoom loop after the first frame.
///
/// # Errors
///
/// Returns rendering errors and I/O errors from stdout or the terminal.
pub fn plot(series: &MultiSeries, options: &PlotOptions) -> Result<()> {
    #[cfg(feature = "terminal")]
    {
        use crate::interactive::{run_interactive, TerminalKeys, TerminalSink};

        let mut sink = TerminalSink::stdout();
        if options.interactive {
            return run_interactive(series, options, &mut TerminalKeys::new(), &mut sink);
        }
        sink.write_lines(&render(series, options)?)
    }

    #[cfg(not(feature = "terminal"))]
    {
        if options.interactive {
            tracing::warn!("interactive mode needs the `terminal` feature; printing once");
        }
        let mut sink = crate::interactive::WriterSink::new(std::io::stdout().lock());
        sink.write_lines(&render(series, options)?)
    }
}

// ============================================================================
// Plot Builder
// ============================================================================

/// Builder pairing data with options.
#[derive(Debug, Clone)]
pub struct Plot {
    series: MultiSeries,
    options: PlotOptions,
}

impl Plot {
    /// Plot `ys` against their indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input shape is inconsistent.
    pub fn new(ys: impl Into<SeriesInput>) -> Result<Self> {
        Ok(Self { series: MultiSeries::from_ys(ys)?, options: PlotOptions::default() })
    }

    /// Plot `ys` against `xs`.
    ///
    /// # Errors
    ///
    /// Returns an error if x and y shapes disagree.
    pub fn xy(xs: impl Into<SeriesInput>, ys: impl Into<SeriesInput>) -> Result<Self> {
        Ok(Self { series: MultiSeries::from_xy(xs, ys)?, options: PlotOptions::default() })
    }

    /// Replace the options.
    #[must_use]
    pub fn options(mut self, options: PlotOptions) -> Self {
        self.options = options;
        self
    }

    /// The data being plotted.
    #[must_use]
    pub fn series(&self) -> &MultiSeries {
        &self.series
    }

    /// Current options.
    #[must_use]
    pub fn plot_options(&self) -> &PlotOptions {
        &self.options
    }

    /// Render to lines.
    ///
    /// # Errors
    ///
    /// See [`render`].
    pub fn render(&self) -> Result<Vec<String>> {
        render(&self.series, &self.options)
    }

    /// Print to stdout.
    ///
    /// # Errors
    ///
    /// See [`plot`].
    pub fn show(&self) -> Result<()> {
        plot(&self.series, &self.options)
    }
}

// ============================================================================
// Plot Session
// ============================================================================

/// Repeatedly re-plotted data, such as a live-updating series.
///
/// Each frame re-derives the view from its own data; the session remembers
/// how many lines the previous frame took so it can be erased.
#[derive(Debug, Clone)]
pub struct PlotSession {
    options: PlotOptions,
    view: Option<ViewConfig>,
    last_frame_lines: Option<usize>,
}

impl PlotSession {
    /// Start a session with `options`.
    #[must_use]
    pub fn new(options: PlotOptions) -> Self {
        Self { options, view: None, last_frame_lines: None }
    }

    /// Options used for the next frame.
    #[must_use]
    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// View of the most recent frame.
    #[must_use]
    pub fn view(&self) -> Option<&ViewConfig> {
        self.view.as_ref()
    }

    /// Line count of the most recent frame.
    #[must_use]
    pub fn last_frame_lines(&self) -> Option<usize> {
        self.last_frame_lines
    }

    /// Render the next frame. `new_options`, when given, replace the session's
    /// options from this frame on.
    ///
    /// # Errors
    ///
    /// Returns shape, option or log-scale errors for this frame's data.
    pub fn next_frame(
        &mut self,
        ys: impl Into<SeriesInput>,
        xs: Option<SeriesInput>,
        new_options: Option<PlotOptions>,
    ) -> Result<Vec<String>> {
        if let Some(options) = new_options {
            self.options = options;
        }
        let series = MultiSeries::new(ys.into(), xs)?;
        let view = ViewConfig::derive(series.stats(), &self.options)?;
        let lines = render_view(&series, &self.options, &view)?;

        self.view = Some(view);
        self.last_frame_lines = Some(lines.len());
        Ok(lines)
    }

    /// Erase the previous frame from `sink`, then write the next one.
    ///
    /// # Errors
    ///
    /// Returns rendering errors or sink I/O errors. On a rendering error the
    /// previous frame stays on screen.
    pub fn emit<S: LineSink>(
        &mut self,
        sink: &mut S,
        ys: impl Into<SeriesInput>,
        xs: Option<SeriesInput>,
        new_options: Option<PlotOptions>,
    ) -> Result<()> {
        let previous = self.last_frame_lines;
        let lines = self.next_frame(ys, xs, new_options)?;
        if let Some(count) = previous {
            sink.erase_lines(count)?;
        }
        sink.write_lines(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::MemorySink;

    fn plot_area(lines: &[String], options: &PlotOptions) -> Vec<String> {
        let start = layout::header_line_count(options) + 1;
        lines[start..start + options.height]
            .iter()
            .map(|l| l.chars().skip(1).take(options.width).collect())
            .collect()
    }

    #[test]
    fn test_line_count_matches_layout() {
        let series = MultiSeries::from_ys(vec![1.0, 2.0, 3.0]).unwrap();
        let options = PlotOptions::new().title("t").legend_labels(["a"]);
        let lines = render(&series, &options).unwrap();
        assert_eq!(lines.len(), 1 + 1 + 17 + 1 + 1 + 1);
        assert_eq!(lines.len(), layout::frame_line_count(&options, 1));
    }

    #[test]
    fn test_borders_have_grid_width() {
        let series = MultiSeries::from_ys(vec![1.0, 2.0]).unwrap();
        let options = PlotOptions::new().dimensions(30, 5);
        let lines = render(&series, &options).unwrap();
        assert_eq!(lines[0].chars().count(), 32);
        assert!(lines[0].starts_with('┌'));
        assert!(lines[6].starts_with('└'));
    }

    #[test]
    fn test_corner_points_land_in_corners() {
        let series = MultiSeries::from_xy(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let options = PlotOptions::new()
            .dimensions(10, 4)
            .character_set(CharacterSet::Ascii)
            .gridlines(vec![], vec![]);
        let lines = render(&series, &options).unwrap();
        let area = plot_area(&lines, &options);
        assert_eq!(area[0].chars().last(), Some('█'));
        assert_eq!(area[3].chars().next(), Some('█'));
    }

    #[test]
    fn test_gridline_drawn_at_zero() {
        let series = MultiSeries::from_xy(vec![-1.0, 1.0], vec![-1.0, 1.0]).unwrap();
        let options = PlotOptions::new().dimensions(11, 5).force_ascii(true);
        let lines = render(&series, &options).unwrap();
        let area = plot_area(&lines, &options);
        assert_eq!(area[2].chars().nth(5), Some('+'));
        assert_eq!(area[0].chars().nth(5), Some('|'));
    }

    #[test]
    fn test_color_output_contains_escape_codes() {
        let series = MultiSeries::from_ys(vec![vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        let options = PlotOptions::new().color(true);
        let lines = render(&series, &options).unwrap();
        assert!(lines.iter().any(|l| l.contains("\x1b[34m")));
        assert!(lines.iter().any(|l| l.contains("\x1b[35m")));
    }

    #[test]
    fn test_builder_renders() {
        let lines = Plot::new(vec![3.0, 1.0, 2.0])
            .unwrap()
            .options(PlotOptions::new().dimensions(20, 5))
            .render()
            .unwrap();
        assert_eq!(lines.len(), 5 + 3);
    }

    #[test]
    fn test_session_erases_previous_frame() {
        let mut session = PlotSession::new(PlotOptions::new().dimensions(20, 5));
        let mut sink = MemorySink::new();

        session.emit(&mut sink, vec![1.0, 2.0], None, None).unwrap();
        assert_eq!(sink.lines().len(), 8);
        assert_eq!(sink.erased(), 0);

        session.emit(&mut sink, vec![2.0, 1.0], None, None).unwrap();
        assert_eq!(sink.erased(), 8);
        assert_eq!(sink.lines().len(), 8);
    }

    #[test]
    fn test_session_options_update() {
        let mut session = PlotSession::new(PlotOptions::new().dimensions(20, 5));
        session.next_frame(vec![1.0, 2.0], None, None).unwrap();
        let lines = session
            .next_frame(vec![1.0, 2.0], None, Some(PlotOptions::new().dimensions(20, 3)))
            .unwrap();
        assert_eq!(lines.len(), 6);
        assert_eq!(session.last_frame_lines(), Some(6));
        assert_eq!(session.options().height, 3);
    }

    #[test]
    fn test_session_frame_follows_new_data() {
        let mut session = PlotSession::new(PlotOptions::new());
        session.next_frame(vec![0.0, 1.0], None, None).unwrap();
        session.next_frame(vec![0.0, 100.0], None, None).unwrap();
        let view = session.view().unwrap();
        assert!((view.bounds().y_max - 100.0).abs() < 1e-9);
    }
}
