//! Grid rasterizer.
//!
//! Accumulates mapped points and connecting segments into a sub-cell
//! [`Canvas`]. The canvas resolution is the character grid multiplied by the
//! glyph set's sub-cell resolution; [`glyphs`] turns it into characters.
//!
//! Tie-break at a shared sub-cell: the last series drawn owns it, while the
//! intensity counter accumulates every touch.

pub mod glyphs;

pub use glyphs::{GlyphCell, GlyphGrid};

use crate::error::{Error, Result};
use crate::scale::CoordinateMapper;
use crate::series::MultiSeries;
use tracing::trace;

/// One sub-cell of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubCell {
    /// Index of the last series that marked this sub-cell.
    pub owner: Option<usize>,
    /// Number of marks from all series.
    pub intensity: u32,
}

/// Sub-cell accumulation buffer in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<SubCell>,
}

impl Canvas {
    /// Create an empty canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions { width: cols, height: rows });
        }
        Ok(Self { cols, rows, cells: vec![SubCell::default(); cols * rows] })
    }

    /// Width in sub-cells.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Height in sub-cells.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Sub-cell at `(col, row)`, if inside the canvas.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<&SubCell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Mark a sub-cell for `series`. Out-of-range coordinates are ignored.
    pub fn mark(&mut self, col: i64, row: i64, series: usize) -> bool {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return false;
        }
        let idx = row as usize * self.cols + col as usize;
        let cell = &mut self.cells[idx];
        cell.owner = Some(series);
        cell.intensity = cell.intensity.saturating_add(1);
        true
    }

    /// Number of marked sub-cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.owner.is_some()).count()
    }

    /// Mark the cells strictly between two continuous `(col, row)` positions.
    ///
    /// The segment is clipped to the canvas first, so far off-screen endpoints
    /// cost nothing. Endpoints that survive clipping are left for the point
    /// pass to mark.
    pub fn draw_segment(&mut self, from: (f64, f64), to: (f64, f64), series: usize) {
        let Some((t0, t1)) = self.clip(from, to) else {
            return;
        };

        let lerp = |t: f64| (from.0 + t * (to.0 - from.0), from.1 + t * (to.1 - from.1));
        let (sx, sy) = lerp(t0);
        let (ex, ey) = lerp(t1);
        let start = (sx.round() as i64, sy.round() as i64);
        let end = (ex.round() as i64, ey.round() as i64);
        let skip_start = t0 <= 0.0;
        let skip_end = t1 >= 1.0;

        bresenham(start, end, |col, row| {
            let is_start = (col, row) == start && skip_start;
            let is_end = (col, row) == end && skip_end;
            if !is_start && !is_end {
                self.mark(col, row, series);
            }
        });
    }

    /// Liang-Barsky clip against the canvas rectangle (cell edges at ±0.5).
    fn clip(&self, from: (f64, f64), to: (f64, f64)) -> Option<(f64, f64)> {
        let (x_lo, x_hi) = (-0.5, self.cols as f64 - 0.5);
        let (y_lo, y_hi) = (-0.5, self.rows as f64 - 0.5);
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [
            (-dx, from.0 - x_lo),
            (dx, x_hi - from.0),
            (-dy, from.1 - y_lo),
            (dy, y_hi - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }

        (t0 <= t1 && t0.is_finite() && t1.is_finite()).then_some((t0, t1))
    }
}

/// Walk the cells of a line using Bresenham's algorithm (non-antialiased).
fn bresenham(start: (i64, i64), end: (i64, i64), mut visit: impl FnMut(i64, i64)) {
    let (x0, y0) = start;
    let (x1, y1) = end;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        visit(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Rasterize every series onto a fresh canvas, in series order.
///
/// # Errors
///
/// Returns an error if the mapper's grid is empty.
pub fn rasterize(series: &MultiSeries, mapper: &CoordinateMapper, lines: bool) -> Result<Canvas> {
    let mut canvas = Canvas::new(mapper.cols(), mapper.rows())?;
    let mut dropped = 0usize;

    for (index, s) in series.iter().enumerate() {
        if lines {
            let mut previous: Option<(f64, f64)> = None;
            for (x, y) in s.points() {
                let Some(current) = mapper.project(x, y) else {
                    continue;
                };
                if let Some(prev) = previous {
                    canvas.draw_segment(prev, current, index);
                }
                previous = Some(current);
            }
        }

        for (x, y) in s.points() {
            match mapper.map(x, y) {
                Some((row, col)) => {
                    canvas.mark(col as i64, row as i64, index);
                }
                None => dropped += 1,
            }
        }
    }

    trace!(occupied = canvas.occupied(), dropped, "rasterized canvas");
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PlotOptions;
    use crate::view::ViewConfig;

    fn render_canvas(series: &MultiSeries, options: &PlotOptions, cols: usize, rows: usize) -> Canvas {
        let view = ViewConfig::derive(series.stats(), options).unwrap();
        let mapper = CoordinateMapper::new(&view, cols, rows).unwrap();
        rasterize(series, &mapper, options.lines).unwrap()
    }

    #[test]
    fn test_canvas_rejects_zero_size() {
        assert!(Canvas::new(0, 3).is_err());
    }

    #[test]
    fn test_mark_ignores_out_of_range() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        assert!(!canvas.mark(-1, 0, 0));
        assert!(!canvas.mark(3, 0, 0));
        assert!(canvas.mark(2, 2, 0));
        assert_eq!(canvas.occupied(), 1);
    }

    #[test]
    fn test_last_series_wins_and_intensity_accumulates() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.mark(1, 1, 0);
        canvas.mark(1, 1, 3);
        canvas.mark(1, 1, 1);
        let cell = canvas.get(1, 1).unwrap();
        assert_eq!(cell.owner, Some(1));
        assert_eq!(cell.intensity, 3);
    }

    #[test]
    fn test_points_only_without_lines() {
        let series = MultiSeries::from_xy(vec![0.0, 9.0], vec![0.0, 9.0]).unwrap();
        let canvas = render_canvas(&series, &PlotOptions::new(), 10, 10);
        assert_eq!(canvas.occupied(), 2);
    }

    #[test]
    fn test_lines_fill_diagonal() {
        let series = MultiSeries::from_xy(vec![0.0, 9.0], vec![0.0, 9.0]).unwrap();
        let canvas = render_canvas(&series, &PlotOptions::new().lines(true), 10, 10);
        assert_eq!(canvas.occupied(), 10);
        for i in 0..10 {
            let cell = canvas.get(i, 9 - i).unwrap();
            assert_eq!(cell.intensity, 1, "cell {i} should be touched exactly once");
        }
    }

    #[test]
    fn test_segment_clipped_to_view() {
        let series = MultiSeries::from_xy(vec![-1e12, 1e12], vec![0.5, 0.5]).unwrap();
        let options = PlotOptions::new().lines(true).x_min(0.0).x_max(1.0).y_min(0.0).y_max(1.0);
        let canvas = render_canvas(&series, &options, 8, 3);
        assert_eq!(canvas.occupied(), 8);
    }

    #[test]
    fn test_segment_skips_invalid_points() {
        let series =
            MultiSeries::from_xy(vec![0.0, 1.0, 2.0], vec![Some(0.0), None, Some(2.0)]).unwrap();
        let canvas = render_canvas(&series, &PlotOptions::new().lines(true), 3, 3);
        assert_eq!(canvas.occupied(), 3);
    }

    #[test]
    fn test_bresenham_visits_endpoints() {
        let mut visited = Vec::new();
        bresenham((0, 0), (3, 1), |x, y| visited.push((x, y)));
        assert_eq!(visited.first(), Some(&(0, 0)));
        assert_eq!(visited.last(), Some(&(3, 1)));
        assert_eq!(visited.len(), 4);
    }
}
