//! Character encoding of a rasterized canvas.
//!
//! Each character cell covers a block of sub-cells (2x2 for quadrant blocks,
//! 2x4 for braille, 1x1 for ASCII). The lit sub-cells select the glyph.

use super::Canvas;
use crate::color::ColorAssignment;
use crate::error::{Error, Result};
use crate::options::CharacterSet;

/// Quadrant glyphs indexed by `TL | TR << 1 | BL << 2 | BR << 3`.
const QUADRANTS: [char; 16] = [
    ' ', '▘', '▝', '▀', '▖', '▌', '▞', '▛', '▗', '▚', '▐', '▜', '▄', '▙', '▟', '█',
];

/// Braille dot bit for each `(col, row)` inside a 2x4 cell.
const BRAILLE_DOTS: [[u32; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

const BRAILLE_BASE: u32 = 0x2800;

/// Glyph for any occupied cell in the low-resolution set.
const FULL_BLOCK: char = '█';

/// Density ramp from empty to heaviest.
pub const DENSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Gridline glyphs as `(vertical, horizontal, crossing)`.
const GRID_UNICODE: (char, char, char) = ('│', '─', '┼');
const GRID_ASCII: (char, char, char) = ('|', '-', '+');

/// One encoded character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    /// Character to print.
    pub glyph: char,
    /// Series whose marks produced the glyph.
    pub owner: Option<usize>,
    /// Total marks under this cell.
    pub intensity: u32,
}

impl GlyphCell {
    const EMPTY: Self = Self { glyph: ' ', owner: None, intensity: 0 };

    /// True when no series touched the cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
    }
}

/// Character grid produced from a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    width: usize,
    height: usize,
    cells: Vec<GlyphCell>,
}

impl GlyphGrid {
    /// Grid width in characters.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in characters.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(col, row)`.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<&GlyphCell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    /// Draw gridlines on cells no series touched.
    pub fn add_gridlines(&mut self, cols: &[usize], rows: &[usize], ascii: bool) {
        let (vertical, horizontal, cross) = if ascii { GRID_ASCII } else { GRID_UNICODE };
        for row in 0..self.height {
            let on_row = rows.contains(&row);
            for col in 0..self.width {
                let on_col = cols.contains(&col);
                let cell = &mut self.cells[row * self.width + col];
                if !cell.is_empty() {
                    continue;
                }
                cell.glyph = match (on_col, on_row) {
                    (true, true) => cross,
                    (true, false) => vertical,
                    (false, true) => horizontal,
                    (false, false) => continue,
                };
            }
        }
    }

    /// Render one row, coloring glyphs by owner when `colors` is set.
    ///
    /// Runs of the same color share one escape sequence.
    #[must_use]
    pub fn render_row(&self, row: usize, colors: Option<&ColorAssignment>) -> String {
        let start = row * self.width;
        let Some(cells) = self.cells.get(start..start + self.width) else {
            return String::new();
        };

        let Some(colors) = colors else {
            return cells.iter().map(|c| c.glyph).collect();
        };

        let mut out = String::with_capacity(self.width * 4);
        let mut run: Option<usize> = None;
        for cell in cells {
            let color = cell.owner.map(|s| colors.index_for(s));
            if color != run {
                if run.is_some() {
                    out.push_str(crate::color::RESET);
                }
                if let Some(series) = cell.owner {
                    out.push_str(colors.color_for(series).code());
                }
                run = color;
            }
            out.push(cell.glyph);
        }
        if run.is_some() {
            out.push_str(crate::color::RESET);
        }
        out
    }

    /// All rows rendered.
    #[must_use]
    pub fn render(&self, colors: Option<&ColorAssignment>) -> Vec<String> {
        (0..self.height).map(|row| self.render_row(row, colors)).collect()
    }
}

/// Encode a canvas into characters.
///
/// The highest series index among a cell's sub-cells owns the cell, and only
/// that series' sub-cells contribute to the glyph. With `density`, glyphs are
/// picked from [`DENSITY_RAMP`] by intensity relative to the busiest cell.
///
/// # Errors
///
/// Returns an error if the canvas size is not a multiple of the set's
/// resolution.
pub fn encode(canvas: &Canvas, set: CharacterSet, density: bool) -> Result<GlyphGrid> {
    let (res_x, res_y) = set.resolution();
    if canvas.cols() % res_x != 0 || canvas.rows() % res_y != 0 {
        return Err(Error::InvalidDimensions { width: canvas.cols(), height: canvas.rows() });
    }
    let width = canvas.cols() / res_x;
    let height = canvas.rows() / res_y;

    let mut cells = vec![GlyphCell::EMPTY; width * height];
    for row in 0..height {
        for col in 0..width {
            cells[row * width + col] = encode_cell(canvas, set, col * res_x, row * res_y);
        }
    }

    if density {
        apply_density(&mut cells);
    }

    Ok(GlyphGrid { width, height, cells })
}

fn encode_cell(canvas: &Canvas, set: CharacterSet, col0: usize, row0: usize) -> GlyphCell {
    let (res_x, res_y) = set.resolution();
    let subs = || {
        (0..res_y).flat_map(move |dy| (0..res_x).map(move |dx| (dx, dy))).filter_map(move |(dx, dy)| {
            canvas.get(col0 + dx, row0 + dy).map(|cell| (dx, dy, cell))
        })
    };

    let Some(owner) = subs().filter_map(|(_, _, c)| c.owner).max() else {
        return GlyphCell::EMPTY;
    };
    let intensity = subs().map(|(_, _, c)| c.intensity).fold(0u32, u32::saturating_add);
    let lit = subs().filter(|(_, _, c)| c.owner == Some(owner)).map(|(dx, dy, _)| (dx, dy));

    let glyph = match set {
        CharacterSet::Block => {
            let index = lit.fold(0usize, |acc, (dx, dy)| acc | 1 << (dy * 2 + dx));
            QUADRANTS[index]
        }
        CharacterSet::Braille => {
            let bits = lit.fold(0u32, |acc, (dx, dy)| acc | BRAILLE_DOTS[dx][dy]);
            char::from_u32(BRAILLE_BASE + bits).unwrap_or(FULL_BLOCK)
        }
        CharacterSet::Ascii => FULL_BLOCK,
    };

    GlyphCell { glyph, owner: Some(owner), intensity }
}

fn apply_density(cells: &mut [GlyphCell]) {
    let max = cells.iter().map(|c| c.intensity).max().unwrap_or(0);
    if max == 0 {
        return;
    }
    let steps = DENSITY_RAMP.len() - 1;
    for cell in cells.iter_mut().filter(|c| !c.is_empty()) {
        let level = (u64::from(cell.intensity) * steps as u64).div_ceil(u64::from(max)) as usize;
        cell.glyph = DENSITY_RAMP[level.clamp(1, steps)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TermColor;

    fn canvas_with(cols: usize, rows: usize, marks: &[(i64, i64, usize)]) -> Canvas {
        let mut canvas = Canvas::new(cols, rows).unwrap();
        for &(c, r, s) in marks {
            canvas.mark(c, r, s);
        }
        canvas
    }

    #[test]
    fn test_block_quadrants() {
        let canvas = canvas_with(4, 2, &[(0, 0, 0), (2, 0, 0), (3, 0, 0), (2, 1, 0), (3, 1, 0)]);
        let grid = encode(&canvas, CharacterSet::Block, false).unwrap();
        assert_eq!(grid.render(None), vec!["▘█".to_string()]);
    }

    #[test]
    fn test_empty_canvas_is_blank() {
        let canvas = Canvas::new(6, 4).unwrap();
        let grid = encode(&canvas, CharacterSet::Block, false).unwrap();
        assert_eq!(grid.render(None), vec!["   ".to_string(), "   ".to_string()]);
    }

    #[test]
    fn test_braille_dots() {
        let canvas = canvas_with(2, 4, &[(0, 0, 0), (1, 3, 0)]);
        let grid = encode(&canvas, CharacterSet::Braille, false).unwrap();
        assert_eq!(grid.get(0, 0).unwrap().glyph, '\u{2881}');
    }

    #[test]
    fn test_ascii_full_block() {
        let canvas = canvas_with(3, 1, &[(1, 0, 2)]);
        let grid = encode(&canvas, CharacterSet::Ascii, false).unwrap();
        assert_eq!(grid.render(None), vec![" █ ".to_string()]);
        assert_eq!(grid.get(1, 0).unwrap().owner, Some(2));
    }

    #[test]
    fn test_highest_series_owns_cell() {
        let canvas = canvas_with(2, 2, &[(0, 0, 1), (1, 0, 0), (1, 1, 0)]);
        let grid = encode(&canvas, CharacterSet::Block, false).unwrap();
        let cell = grid.get(0, 0).unwrap();
        assert_eq!(cell.owner, Some(1));
        assert_eq!(cell.glyph, '▘');
        assert_eq!(cell.intensity, 3);
    }

    #[test]
    fn test_density_ramp_scales_to_max() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        for _ in 0..9 {
            canvas.mark(0, 0, 0);
        }
        canvas.mark(1, 0, 0);
        let grid = encode(&canvas, CharacterSet::Ascii, true).unwrap();
        assert_eq!(grid.get(0, 0).unwrap().glyph, '@');
        assert_eq!(grid.get(1, 0).unwrap().glyph, '.');
    }

    #[test]
    fn test_gridlines_only_on_empty_cells() {
        let canvas = canvas_with(3, 3, &[(1, 0, 0)]);
        let mut grid = encode(&canvas, CharacterSet::Ascii, false).unwrap();
        grid.add_gridlines(&[1], &[1], false);
        assert_eq!(grid.render(None), vec![" █ ", "─┼─", " │ "]);
    }

    #[test]
    fn test_ascii_gridlines() {
        let canvas = Canvas::new(2, 2).unwrap();
        let mut grid = encode(&canvas, CharacterSet::Ascii, false).unwrap();
        grid.add_gridlines(&[0], &[1], true);
        assert_eq!(grid.render(None), vec!["| ", "+-"]);
    }

    #[test]
    fn test_colored_row_groups_runs() {
        let canvas = canvas_with(3, 1, &[(0, 0, 0), (1, 0, 0), (2, 0, 1)]);
        let grid = encode(&canvas, CharacterSet::Ascii, false).unwrap();
        let colors = ColorAssignment::new(vec![TermColor::Red, TermColor::Green]);
        let row = grid.render_row(0, Some(&colors));
        assert_eq!(row.matches("\x1b[31m").count(), 1);
        assert_eq!(row.matches("\x1b[32m").count(), 1);
        assert_eq!(crate::color::visible_width(&row), 3);
    }

    #[test]
    fn test_mismatched_resolution_rejected() {
        let canvas = Canvas::new(3, 2).unwrap();
        assert!(encode(&canvas, CharacterSet::Block, false).is_err());
    }
}
