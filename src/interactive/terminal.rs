//! Crossterm-backed key reader and line sink.

use super::input::{Key, KeyReader};
use super::sink::LineSink;
use crate::error::Result;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};

/// Reads single keypresses from the terminal.
///
/// Raw mode is held only for the duration of one read, so output written
/// between reads behaves normally.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    /// Create a reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Restores cooked mode on drop, including on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

impl KeyReader for TerminalKeys {
    fn read_key(&mut self) -> Result<Key> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Key::from(key));
                }
            }
        }
    }
}

/// Writes frames to a terminal and erases them with cursor control.
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    out: W,
}

impl TerminalSink<Stdout> {
    /// Sink on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSink<W> {
    /// Sink on any writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for TerminalSink<W> {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn erase_lines(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.out.queue(Clear(ClearType::CurrentLine))?;
            self.out.queue(MoveUp(1))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
        }
        self.out.queue(MoveToColumn(0))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_emits_cursor_up_per_line() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.write_lines(&["a".to_string()]).unwrap();
        sink.erase_lines(3).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("a\n"));
        assert_eq!(out.matches("\x1b[1A").count(), 3);
        assert_eq!(out.matches("\x1b[2K").count(), 6);
    }
}
