//! Terminal colors and per-series color assignment.
//!
//! Colors are plain 8-color ANSI foreground codes, which every color-capable
//! terminal understands.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ANSI reset sequence.
pub const RESET: &str = "\x1b[0m";

/// 8-color ANSI foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermColor {
    /// Black (30).
    Black,
    /// Red (31).
    Red,
    /// Green (32).
    Green,
    /// Yellow (33).
    Yellow,
    /// Blue (34).
    Blue,
    /// Magenta (35).
    Magenta,
    /// Cyan (36).
    Cyan,
    /// White (37).
    White,
}

impl TermColor {
    /// Default series palette, in assignment order.
    pub const DEFAULT_PALETTE: [Self; 6] =
        [Self::Blue, Self::Magenta, Self::Green, Self::Yellow, Self::Cyan, Self::Red];

    /// Escape sequence that switches the foreground to this color.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Black => "\x1b[30m",
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
        }
    }

    /// Wrap `text` in this color and a reset.
    #[must_use]
    pub fn paint(self, text: &str) -> String {
        format!("{}{text}{RESET}", self.code())
    }
}

impl FromStr for TermColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "blue" => Ok(Self::Blue),
            "magenta" => Ok(Self::Magenta),
            "cyan" => Ok(Self::Cyan),
            "white" => Ok(Self::White),
            other => Err(Error::InvalidColor(other.to_string())),
        }
    }
}

/// Deterministic mapping from series index to a palette color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAssignment {
    palette: Vec<TermColor>,
}

impl Default for ColorAssignment {
    fn default() -> Self {
        Self { palette: TermColor::DEFAULT_PALETTE.to_vec() }
    }
}

impl ColorAssignment {
    /// Create an assignment over a custom palette; an empty palette falls back
    /// to the default one.
    #[must_use]
    pub fn new(palette: Vec<TermColor>) -> Self {
        if palette.is_empty() {
            Self::default()
        } else {
            Self { palette }
        }
    }

    /// Palette index for a series.
    #[must_use]
    pub fn index_for(&self, series: usize) -> usize {
        series % self.palette.len()
    }

    /// Color for a series.
    #[must_use]
    pub fn color_for(&self, series: usize) -> TermColor {
        self.palette[self.index_for(series)]
    }

    /// Number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.palette.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }
}

/// Length of `text` in characters, ignoring ANSI color sequences.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip CSI sequence up to and including its final byte.
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_names() {
        assert_eq!("blue".parse::<TermColor>().unwrap(), TermColor::Blue);
        assert_eq!(" Magenta ".parse::<TermColor>().unwrap(), TermColor::Magenta);
        assert!(matches!("mauve".parse::<TermColor>(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_assignment_wraps_around() {
        let colors = ColorAssignment::default();
        assert_eq!(colors.len(), 6);
        assert_eq!(colors.color_for(0), TermColor::Blue);
        assert_eq!(colors.color_for(6), TermColor::Blue);
        assert_eq!(colors.index_for(7), 1);
    }

    #[test]
    fn test_custom_palette() {
        let colors = ColorAssignment::new(vec![TermColor::Red, TermColor::Green]);
        assert_eq!(colors.color_for(3), TermColor::Green);
        assert_eq!(ColorAssignment::new(Vec::new()), ColorAssignment::default());
    }

    #[test]
    fn test_paint_and_visible_width() {
        let painted = TermColor::Cyan.paint("██");
        assert!(painted.starts_with("\x1b[36m"));
        assert!(painted.ends_with(RESET));
        assert_eq!(visible_width(&painted), 2);
        assert_eq!(visible_width("plain"), 5);
    }
}
