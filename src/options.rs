//! Plot options.
//!
//! Options can be built in code or loaded from YAML, with precedence
//! CLI > file > defaults when used from the `termplot` binary.

use crate::color::{ColorAssignment, TermColor};
use crate::error::{AxisName, Error, Result};
use crate::series::Value;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Glyph set used to encode the plot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSet {
    /// Unicode quadrant blocks, 2x2 sub-cells per character.
    #[default]
    Block,
    /// Unicode braille patterns, 2x4 sub-cells per character.
    Braille,
    /// One sub-cell per character, full block glyph only.
    Ascii,
}

impl CharacterSet {
    /// Sub-cell resolution per character as `(columns, rows)`.
    #[must_use]
    pub const fn resolution(self) -> (usize, usize) {
        match self {
            Self::Block => (2, 2),
            Self::Braille => (2, 4),
            Self::Ascii => (1, 1),
        }
    }
}

/// Color setting: on/off, or an explicit palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorOption {
    /// Default palette when `true`, monochrome when `false`.
    Enabled(bool),
    /// Explicit palette, assigned to series in order.
    Palette(Vec<TermColor>),
}

impl Default for ColorOption {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

impl ColorOption {
    /// The color assignment, or `None` for monochrome output.
    #[must_use]
    pub fn assignment(&self) -> Option<ColorAssignment> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(ColorAssignment::default()),
            Self::Palette(colors) => Some(ColorAssignment::new(colors.clone())),
        }
    }
}

/// All user-facing plot options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Explicit lower x bound.
    #[serde(default)]
    pub x_min: Option<f64>,
    /// Explicit upper x bound.
    #[serde(default)]
    pub x_max: Option<f64>,
    /// Explicit lower y bound.
    #[serde(default)]
    pub y_min: Option<f64>,
    /// Explicit upper y bound.
    #[serde(default)]
    pub y_max: Option<f64>,

    /// Logarithmic x axis.
    #[serde(default)]
    pub x_as_log: bool,
    /// Logarithmic y axis.
    #[serde(default)]
    pub y_as_log: bool,

    /// Plot area width in characters.
    #[serde(default = "default_width")]
    pub width: usize,
    /// Plot area height in characters.
    #[serde(default = "default_height")]
    pub height: usize,

    /// Connect consecutive points of each series.
    #[serde(default)]
    pub lines: bool,
    /// Per-series color.
    #[serde(default)]
    pub color: ColorOption,
    /// Force the low-resolution glyph set.
    #[serde(default)]
    pub force_ascii: bool,
    /// Glyph set when not forced to ASCII.
    #[serde(default)]
    pub character_set: CharacterSet,
    /// Monochrome density rendering (ignored when color is on).
    #[serde(default)]
    pub density: bool,

    /// Title shown above the plot.
    #[serde(default)]
    pub title: Option<String>,
    /// Suffix for x axis labels.
    #[serde(default)]
    pub x_unit: String,
    /// Suffix for y axis labels.
    #[serde(default)]
    pub y_unit: String,
    /// Legend labels; the legend is shown only when set.
    #[serde(default)]
    pub legend_labels: Option<Vec<String>>,

    /// x values where vertical gridlines are drawn.
    #[serde(default = "default_gridlines")]
    pub x_gridlines: Vec<f64>,
    /// y values where horizontal gridlines are drawn.
    #[serde(default = "default_gridlines")]
    pub y_gridlines: Vec<f64>,

    /// Enter the key-driven pan/zoom loop after the first render.
    #[serde(default)]
    pub interactive: bool,
    /// Zoom factor applied per zoom key.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    /// Fraction of the visible span moved per pan key.
    #[serde(default = "default_pan_step")]
    pub pan_step: f64,
}

fn default_width() -> usize {
    60
}
fn default_height() -> usize {
    17
}
fn default_gridlines() -> Vec<f64> {
    vec![0.0]
}
fn default_zoom_factor() -> f64 {
    1.25
}
fn default_pan_step() -> f64 {
    0.1
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
            x_as_log: false,
            y_as_log: false,
            width: default_width(),
            height: default_height(),
            lines: false,
            color: ColorOption::default(),
            force_ascii: false,
            character_set: CharacterSet::default(),
            density: false,
            title: None,
            x_unit: String::new(),
            y_unit: String::new(),
            legend_labels: None,
            x_gridlines: default_gridlines(),
            y_gridlines: default_gridlines(),
            interactive: false,
            zoom_factor: default_zoom_factor(),
            pan_step: default_pan_step(),
        }
    }
}

/// Convert a bound given as any input value (number, date, text) to a number.
fn bound(value: impl Into<Value>) -> Option<f64> {
    let v = value.into().coerce().value();
    v.is_finite().then_some(v)
}

impl PlotOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower x bound (numbers, dates and datetimes accepted).
    #[must_use]
    pub fn x_min(mut self, value: impl Into<Value>) -> Self {
        self.x_min = bound(value);
        self
    }

    /// Set the upper x bound.
    #[must_use]
    pub fn x_max(mut self, value: impl Into<Value>) -> Self {
        self.x_max = bound(value);
        self
    }

    /// Set the lower y bound.
    #[must_use]
    pub fn y_min(mut self, value: impl Into<Value>) -> Self {
        self.y_min = bound(value);
        self
    }

    /// Set the upper y bound.
    #[must_use]
    pub fn y_max(mut self, value: impl Into<Value>) -> Self {
        self.y_max = bound(value);
        self
    }

    /// Enable or disable the logarithmic x axis.
    #[must_use]
    pub fn x_as_log(mut self, enabled: bool) -> Self {
        self.x_as_log = enabled;
        self
    }

    /// Enable or disable the logarithmic y axis.
    #[must_use]
    pub fn y_as_log(mut self, enabled: bool) -> Self {
        self.y_as_log = enabled;
        self
    }

    /// Set the plot area size in characters.
    #[must_use]
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Connect consecutive points.
    #[must_use]
    pub fn lines(mut self, enabled: bool) -> Self {
        self.lines = enabled;
        self
    }

    /// Enable the default palette or monochrome output.
    #[must_use]
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = ColorOption::Enabled(enabled);
        self
    }

    /// Use an explicit palette.
    #[must_use]
    pub fn palette(mut self, colors: Vec<TermColor>) -> Self {
        self.color = ColorOption::Palette(colors);
        self
    }

    /// Force the low-resolution glyph set.
    #[must_use]
    pub fn force_ascii(mut self, enabled: bool) -> Self {
        self.force_ascii = enabled;
        self
    }

    /// Select the glyph set.
    #[must_use]
    pub fn character_set(mut self, set: CharacterSet) -> Self {
        self.character_set = set;
        self
    }

    /// Enable monochrome density rendering.
    #[must_use]
    pub fn density(mut self, enabled: bool) -> Self {
        self.density = enabled;
        self
    }

    /// Set the title from anything printable.
    #[must_use]
    pub fn title(mut self, title: impl Display) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set axis label suffixes.
    #[must_use]
    pub fn units(mut self, x_unit: impl Into<String>, y_unit: impl Into<String>) -> Self {
        self.x_unit = x_unit.into();
        self.y_unit = y_unit.into();
        self
    }

    /// Set legend labels from anything printable.
    #[must_use]
    pub fn legend_labels<I, T>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.legend_labels = Some(labels.into_iter().map(|l| l.to_string()).collect());
        self
    }

    /// Set gridline positions.
    #[must_use]
    pub fn gridlines(mut self, x: Vec<f64>, y: Vec<f64>) -> Self {
        self.x_gridlines = x;
        self.y_gridlines = y;
        self
    }

    /// Enable the interactive loop.
    #[must_use]
    pub fn interactive(mut self, enabled: bool) -> Self {
        self.interactive = enabled;
        self
    }

    /// Glyph set after applying `force_ascii`.
    #[must_use]
    pub fn effective_character_set(&self) -> CharacterSet {
        if self.force_ascii {
            CharacterSet::Ascii
        } else {
            self.character_set
        }
    }

    /// Check option values for consistency.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions, inverted or non-finite bounds,
    /// or out-of-range zoom/pan settings.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        for (axis, min, max) in
            [(AxisName::X, self.x_min, self.x_max), (AxisName::Y, self.y_min, self.y_max)]
        {
            let non_finite = min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite());
            if non_finite {
                return Err(Error::InvalidBounds {
                    axis,
                    min: min.unwrap_or(f64::NAN),
                    max: max.unwrap_or(f64::NAN),
                });
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(Error::InvalidBounds { axis, min, max });
                }
            }
        }

        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            return Err(Error::InvalidOption {
                key: "zoom_factor",
                message: format!("must be a finite value greater than 1, got {}", self.zoom_factor),
            });
        }
        if !(self.pan_step.is_finite() && self.pan_step > 0.0 && self.pan_step <= 1.0) {
            return Err(Error::InvalidOption {
                key: "pan_step",
                message: format!("must be in (0, 1], got {}", self.pan_step),
            });
        }

        Ok(())
    }

    /// Parses options from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        let options: Self = serde_yaml_ng::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Serializes options to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Default config file location (`<config dir>/trueno-termplot/config.yaml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trueno-termplot").join("config.yaml"))
    }
}
