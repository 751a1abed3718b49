//! Line output with erasure of previously written lines.

use crate::error::Result;
use std::io::Write;

/// Destination for rendered frames.
pub trait LineSink {
    /// Write `lines`, each followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;

    /// Erase the last `count` written lines and move the cursor to where the
    /// first of them started.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn erase_lines(&mut self, count: usize) -> Result<()>;
}

/// In-memory sink that keeps what a terminal would currently show.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<String>,
    written: usize,
    erased: usize,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines currently visible.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Total lines ever written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Total lines ever erased.
    #[must_use]
    pub fn erased(&self) -> usize {
        self.erased
    }
}

impl LineSink for MemorySink {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        self.written += lines.len();
        self.lines.extend_from_slice(lines);
        Ok(())
    }

    fn erase_lines(&mut self, count: usize) -> Result<()> {
        let keep = self.lines.len().saturating_sub(count);
        self.lines.truncate(keep);
        self.erased += count;
        Ok(())
    }
}

/// Plain writer sink for builds without terminal control; erasure uses raw
/// ANSI sequences.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn erase_lines(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            // Clear line, cursor up, clear line.
            write!(self.out, "\x1b[2K\x1b[1A\x1b[2K")?;
        }
        write!(self.out, "\r")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_erase_truncates() {
        let mut sink = MemorySink::new();
        sink.write_lines(&["a".to_string(), "b".to_string(), "c".to_string()]).unwrap();
        sink.erase_lines(2).unwrap();
        assert_eq!(sink.lines(), ["a".to_string()]);
        sink.erase_lines(5).unwrap();
        assert!(sink.lines().is_empty());
        assert_eq!(sink.written(), 3);
        assert_eq!(sink.erased(), 7);
    }

    #[test]
    fn test_writer_sink_output() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_lines(&["x".to_string(), "y".to_string()]).unwrap();
        sink.erase_lines(1).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("x\ny\n"));
        assert_eq!(out.matches("\x1b[1A").count(), 1);
    }
}
