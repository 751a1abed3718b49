//! termplot - plot numeric columns in the terminal.
//!
//! Reads whitespace- or comma-separated columns from files or stdin and plots
//! each column as a series. Options come from the command line, then the
//! config file, then defaults.
//!
//! Run: `seq 1 100 | termplot --lines`

#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use trueno_termplot::prelude::*;

/// termplot: character-grid plots for the terminal
#[derive(Parser, Debug)]
#[command(name = "termplot")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Scatter, line and histogram plots in the terminal", long_about = None)]
struct Cli {
    /// Input files (stdin when empty or "-")
    files: Vec<PathBuf>,

    /// Use the first column as x values for the remaining columns
    #[arg(short = 'x', long)]
    x_column: bool,

    /// Plot a histogram of every column instead
    #[arg(long)]
    histogram: bool,

    /// Number of histogram bins
    #[arg(long, conflicts_with = "sturges")]
    bins: Option<usize>,

    /// Pick the histogram bin count with Sturges' rule
    #[arg(long)]
    sturges: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective options as YAML and exit
    #[arg(long)]
    dump_config: bool,

    /// Plot width in characters
    #[arg(short, long)]
    width: Option<usize>,

    /// Plot height in characters
    #[arg(long)]
    height: Option<usize>,

    /// Title above the plot
    #[arg(short, long)]
    title: Option<String>,

    /// Legend labels, one per series
    #[arg(long, value_delimiter = ',')]
    legend: Vec<String>,

    /// Connect consecutive points
    #[arg(short, long)]
    lines: bool,

    /// Color each series with the default palette
    #[arg(long)]
    color: bool,

    /// Color each series from this palette
    #[arg(long, value_delimiter = ',')]
    palette: Vec<TermColor>,

    /// Glyph set for the plot area
    #[arg(long, value_enum)]
    charset: Option<Charset>,

    /// Shade overlapping points by density (monochrome only)
    #[arg(long)]
    density: bool,

    /// Logarithmic x axis
    #[arg(long)]
    x_log: bool,

    /// Logarithmic y axis
    #[arg(long)]
    y_log: bool,

    /// Lower x bound
    #[arg(long, allow_negative_numbers = true)]
    x_min: Option<f64>,

    /// Upper x bound
    #[arg(long, allow_negative_numbers = true)]
    x_max: Option<f64>,

    /// Lower y bound
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    /// Upper y bound
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,

    /// Pan and zoom with the keyboard after drawing
    #[arg(short, long)]
    interactive: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Charset {
    Block,
    Braille,
    Ascii,
}

impl From<Charset> for CharacterSet {
    fn from(charset: Charset) -> Self {
        match charset {
            Charset::Block => Self::Block,
            Charset::Braille => Self::Braille,
            Charset::Ascii => Self::Ascii,
        }
    }
}

impl Cli {
    /// Overlay command-line flags on `options`. Flags that were not given
    /// leave the configured value alone.
    fn apply(&self, mut options: PlotOptions) -> PlotOptions {
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(title) = &self.title {
            options.title = Some(title.clone());
        }
        if !self.legend.is_empty() {
            options.legend_labels = Some(self.legend.clone());
        }
        if let Some(charset) = self.charset {
            options.character_set = charset.into();
        }
        if !self.palette.is_empty() {
            options.color = ColorOption::Palette(self.palette.clone());
        } else if self.color {
            options.color = ColorOption::Enabled(true);
        }

        options.lines |= self.lines;
        options.density |= self.density;
        options.x_as_log |= self.x_log;
        options.y_as_log |= self.y_log;
        options.interactive |= self.interactive;

        options.x_min = self.x_min.or(options.x_min);
        options.x_max = self.x_max.or(options.x_max);
        options.y_min = self.y_min.or(options.y_min);
        options.y_max = self.y_max.or(options.y_max);
        options
    }

    fn histogram(&self) -> Histogram {
        let histogram = Histogram::new();
        if self.sturges {
            histogram.bins(BinStrategy::Sturges)
        } else if let Some(bins) = self.bins {
            histogram.bins(BinStrategy::Fixed(bins))
        } else {
            histogram
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let options = cli.apply(load_options(cli.config.as_deref())?);
    options.validate().context("invalid plot options")?;

    if cli.dump_config {
        print!("{}", options.to_yaml()?);
        return Ok(());
    }

    let text = read_input(&cli.files)?;
    let columns = parse_columns(&text);
    if columns.is_empty() {
        bail!("no numeric data in input");
    }
    debug!(columns = columns.len(), rows = columns[0].len(), "parsed input");

    if cli.histogram {
        let series = cli.histogram().compute(columns)?.to_series()?;
        let options = PlotOptions { lines: true, ..options };
        plot(&series, &options)?;
        return Ok(());
    }

    let series = build_series(columns, cli.x_column)?;
    plot(&series, &options)?;
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Options from an explicit config file, else the default config file if it
/// exists, else defaults.
fn load_options(path: Option<&Path>) -> Result<PlotOptions> {
    if let Some(path) = path {
        return PlotOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match PlotOptions::default_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "loading config");
            PlotOptions::load(&path).with_context(|| format!("failed to load config {}", path.display()))
        }
        _ => Ok(PlotOptions::default()),
    }
}

fn read_input(files: &[PathBuf]) -> Result<String> {
    let mut text = String::new();
    if files.is_empty() {
        std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
        return Ok(text);
    }
    for file in files {
        if file.as_os_str() == "-" {
            std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
        } else {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            text.push_str(&content);
        }
        if !text.ends_with('\n') {
            text.push('\n');
        }
    }
    Ok(text)
}

/// Split input into numeric columns.
///
/// Fields are separated by commas or whitespace. Unparseable fields and
/// short rows become missing values; blank lines, `#` comments and rows with
/// no number at all (headers) are skipped.
fn parse_columns(text: &str) -> Vec<Vec<Option<f64>>> {
    let mut columns: Vec<Vec<Option<f64>>> = Vec::new();
    let mut rows = 0;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<Option<f64>> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .map(|field| field.parse().ok())
            .collect();
        if fields.iter().all(Option::is_none) {
            continue;
        }

        if fields.len() > columns.len() {
            columns.resize(fields.len(), vec![None; rows]);
        }
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(fields.get(i).copied().flatten());
        }
        rows += 1;
    }
    columns
}

/// Columns as series; with `x_column`, the first column is shared x.
fn build_series(mut columns: Vec<Vec<Option<f64>>>, x_column: bool) -> Result<MultiSeries> {
    if !x_column {
        return Ok(match columns.len() {
            1 => MultiSeries::from_ys(columns.remove(0))?,
            _ => MultiSeries::from_ys(columns)?,
        });
    }

    if columns.len() < 2 {
        bail!("--x-column needs at least two columns, found {}", columns.len());
    }
    let xs = columns.remove(0);
    Ok(match columns.len() {
        1 => MultiSeries::from_xy(xs, columns.remove(0))?,
        _ => MultiSeries::from_xy(xs, columns)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns_mixed_separators() {
        let columns = parse_columns("1, 2\n3 4\n\n# comment\n5,6\n");
        assert_eq!(columns, vec![vec![Some(1.0), Some(3.0), Some(5.0)], vec![Some(2.0), Some(4.0), Some(6.0)]]);
    }

    #[test]
    fn test_parse_columns_skips_header_and_pads_short_rows() {
        let columns = parse_columns("x,y\n1\n2,3\n");
        assert_eq!(columns, vec![vec![Some(1.0), Some(2.0)], vec![None, Some(3.0)]]);
    }

    #[test]
    fn test_parse_columns_bad_field_is_missing() {
        let columns = parse_columns("1 abc\n2 3\n");
        assert_eq!(columns[1], vec![None, Some(3.0)]);
    }

    #[test]
    fn test_build_series_shared_x() {
        let columns = vec![vec![Some(0.0), Some(1.0)], vec![Some(5.0), Some(6.0)], vec![Some(7.0), None]];
        let series = build_series(columns, true).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.series()[1].xs(), &[0.0, 1.0]);
    }

    #[test]
    fn test_build_series_needs_two_columns_for_x() {
        assert!(build_series(vec![vec![Some(1.0)]], true).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["termplot", "--width", "30", "--lines", "--y-min", "-2"]);
        let base = PlotOptions::parse("width: 80\nheight: 9\n").unwrap();
        let options = cli.apply(base);
        assert_eq!(options.width, 30);
        assert_eq!(options.height, 9);
        assert!(options.lines);
        assert_eq!(options.y_min, Some(-2.0));
    }

    #[test]
    fn test_cli_palette() {
        let cli = Cli::parse_from(["termplot", "--palette", "red,blue"]);
        let options = cli.apply(PlotOptions::default());
        assert_eq!(options.color, ColorOption::Palette(vec![TermColor::Red, TermColor::Blue]));
    }
}
