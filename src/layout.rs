//! Frame layout around the glyph grid.
//!
//! A frame is, top to bottom: optional title, optional bounds summary
//! (interactive only), top border, one line per grid row with its y label,
//! bottom border, x label line, and one legend line per series when legend
//! labels are set.

use crate::axis::format_number;
use crate::color::{visible_width, ColorAssignment};
use crate::options::PlotOptions;
use crate::series::{epoch_to_datetime, AxisKind};
use crate::view::ViewConfig;

/// Prompt printed below the frame in interactive mode.
pub const PROMPT: &str = "Move h/j/k/l, zoom u/n, or r to reset. ESC/q to quit";

/// Legend swatch.
const SWATCH: &str = "██";

/// Lines drawn around the grid rows: top border, bottom border, x labels.
const BODY_EXTRA_LINES: usize = 3;

/// Left-pad every line by the same offset so the widest one is centered in
/// `width` columns. Lines at least `width` wide are left untouched.
#[must_use]
pub fn center_block(lines: &[String], width: usize) -> Vec<String> {
    let widest = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    if widest >= width {
        return lines.to_vec();
    }
    let pad = " ".repeat((width - widest) / 2);
    lines.iter().map(|l| format!("{pad}{l}")).collect()
}

/// Total frame width: grid plus both border columns.
const fn frame_width(width: usize) -> usize {
    width + 2
}

/// Header lines: centered title, then the bounds summary when interactive.
#[must_use]
pub fn header(options: &PlotOptions, view: &ViewConfig, kinds: (AxisKind, AxisKind)) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(title) = &options.title {
        lines.extend(center_block(&[title.clone()], frame_width(options.width)));
    }
    if options.interactive {
        lines.extend(center_block(&[bounds_summary(view, kinds)], frame_width(options.width)));
    }
    lines
}

/// Number of header lines [`header`] produces for `options`.
#[must_use]
pub fn header_line_count(options: &PlotOptions) -> usize {
    usize::from(options.title.is_some()) + usize::from(options.interactive)
}

/// One-line summary of the visible bounds.
#[must_use]
pub fn bounds_summary(view: &ViewConfig, kinds: (AxisKind, AxisKind)) -> String {
    let b = view.bounds();
    format!(
        "x: [{} .. {}]  y: [{} .. {}]",
        format_bound(b.x_min, (b.x_min, b.x_max), kinds.0),
        format_bound(b.x_max, (b.x_min, b.x_max), kinds.0),
        format_bound(b.y_min, (b.y_min, b.y_max), kinds.1),
        format_bound(b.y_max, (b.y_min, b.y_max), kinds.1),
    )
}

fn format_bound(value: f64, (min, max): (f64, f64), kind: AxisKind) -> String {
    if kind == AxisKind::Temporal {
        if let Some(dt) = epoch_to_datetime(value) {
            return dt.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }
    let resolution = 10f64.powf((max / 1000.0 - min / 1000.0).abs().log10().floor());
    if !(resolution.is_finite() && resolution > 0.0) {
        return format!("{value}");
    }
    let text = format_number(value, resolution);
    if text.contains('.') && !text.contains('e') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Bordered grid rows with their y labels, followed by the x label line.
#[must_use]
pub fn body(grid_rows: &[String], y_labels: &[String], x_labels: &str, width: usize) -> Vec<String> {
    let rule = "─".repeat(width);
    let mut lines = Vec::with_capacity(grid_rows.len() + BODY_EXTRA_LINES);

    lines.push(format!("┌{rule}┐"));
    for (i, row) in grid_rows.iter().enumerate() {
        match y_labels.get(i).filter(|l| !l.is_empty()) {
            Some(label) => lines.push(format!("│{row}│ {label}")),
            None => lines.push(format!("│{row}│")),
        }
    }
    lines.push(format!("└{rule}┘"));
    lines.push(x_labels.to_string());
    lines
}

/// Legend lines, one per series, or nothing when no labels are set.
///
/// Series without an explicit label are called `Series N`, counting from 1.
#[must_use]
pub fn legend(
    options: &PlotOptions,
    series_count: usize,
    colors: Option<&ColorAssignment>,
) -> Vec<String> {
    let Some(labels) = &options.legend_labels else {
        return Vec::new();
    };

    let lines: Vec<String> = (0..series_count)
        .map(|i| {
            let label = labels
                .get(i)
                .map_or_else(|| format!("Series {}", i + 1), |l| l.trim().to_string());
            let swatch = colors.map_or_else(
                || SWATCH.to_string(),
                |c| c.color_for(i).paint(SWATCH),
            );
            format!("{swatch} {label}")
        })
        .collect();

    center_block(&lines, frame_width(options.width))
}

/// Number of legend lines [`legend`] produces.
#[must_use]
pub fn legend_line_count(options: &PlotOptions, series_count: usize) -> usize {
    if options.legend_labels.is_some() {
        series_count
    } else {
        0
    }
}

/// Total lines of one rendered frame.
#[must_use]
pub fn frame_line_count(options: &PlotOptions, series_count: usize) -> usize {
    header_line_count(options)
        + options.height
        + BODY_EXTRA_LINES
        + legend_line_count(options, series_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::MultiSeries;

    fn view_for(options: &PlotOptions) -> ViewConfig {
        let series = MultiSeries::from_ys(vec![0.0, 10.0]).unwrap();
        ViewConfig::derive(series.stats(), options).unwrap()
    }

    #[test]
    fn test_center_block_pads_all_lines_equally() {
        let lines = center_block(&["ab".to_string(), "abcd".to_string()], 10);
        assert_eq!(lines, vec!["   ab", "   abcd"]);
    }

    #[test]
    fn test_center_block_leaves_wide_text() {
        let lines = center_block(&["0123456789".to_string()], 10);
        assert_eq!(lines, vec!["0123456789"]);
    }

    #[test]
    fn test_header_title_only() {
        let options = PlotOptions::new().dimensions(10, 3).title("Hi");
        let lines = header(&options, &view_for(&options), (AxisKind::Numeric, AxisKind::Numeric));
        assert_eq!(lines, vec!["     Hi"]);
        assert_eq!(header_line_count(&options), 1);
    }

    #[test]
    fn test_header_interactive_adds_bounds() {
        let options = PlotOptions::new().interactive(true);
        let lines = header(&options, &view_for(&options), (AxisKind::Numeric, AxisKind::Numeric));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("x: [0 .. 1]"), "{}", lines[0]);
        assert!(lines[0].contains("y: [0 .. 10]"), "{}", lines[0]);
    }

    #[test]
    fn test_body_shape() {
        let rows = vec!["ab".to_string(), "cd".to_string()];
        let labels = vec!["1".to_string(), String::new()];
        let lines = body(&rows, &labels, " 0  1", 2);
        assert_eq!(lines, vec!["┌──┐", "│ab│ 1", "│cd│", "└──┘", " 0  1"]);
    }

    #[test]
    fn test_legend_defaults_missing_labels() {
        let options = PlotOptions::new().dimensions(20, 3).legend_labels(["sin"]);
        let lines = legend(&options, 2, None);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("██ sin"));
        assert!(lines[1].ends_with("██ Series 2"));
        assert_eq!(legend_line_count(&options, 2), 2);
    }

    #[test]
    fn test_legend_colored_swatch() {
        let options = PlotOptions::new().legend_labels(["a"]);
        let colors = ColorAssignment::default();
        let lines = legend(&options, 1, Some(&colors));
        assert!(lines[0].contains("\x1b[34m██\x1b[0m a"));
    }

    #[test]
    fn test_no_legend_without_labels() {
        let options = PlotOptions::new();
        assert!(legend(&options, 3, None).is_empty());
        assert_eq!(frame_line_count(&options, 3), 17 + 3);
    }
}
