//! Key input for the interactive view.

use crate::error::Result;
use std::collections::VecDeque;

/// A single keypress, reduced to what the view controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// The escape key.
    Escape,
    /// Ctrl+C.
    Interrupt,
    /// Anything else.
    Other,
}

/// Source of keypresses; each call blocks until one key is available.
pub trait KeyReader {
    /// Read one key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input fails.
    fn read_key(&mut self) -> Result<Key>;
}

/// View action resulting from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the view left (`h`).
    PanLeft,
    /// Shift the view right (`l`).
    PanRight,
    /// Shift the view down (`j`).
    PanDown,
    /// Shift the view up (`k`).
    PanUp,
    /// Zoom in (`u`).
    ZoomIn,
    /// Zoom out (`n`).
    ZoomOut,
    /// Restore the initial view (`r`).
    Reset,
    /// Leave interactive mode (`q`, ESC, Ctrl+C).
    Quit,
    /// Unbound key.
    None,
}

/// Maps keys to actions. Letter keys are case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Handles a key and returns the corresponding action.
    #[must_use]
    pub fn handle_key(&self, key: Key) -> Action {
        match key {
            Key::Escape | Key::Interrupt => Action::Quit,
            Key::Char(c) => match c.to_ascii_lowercase() {
                'q' => Action::Quit,
                'h' => Action::PanLeft,
                'l' => Action::PanRight,
                'j' => Action::PanDown,
                'k' => Action::PanUp,
                'u' => Action::ZoomIn,
                'n' => Action::ZoomOut,
                'r' => Action::Reset,
                _ => Action::None,
            },
            Key::Other => Action::None,
        }
    }
}

/// Replays a fixed key sequence, then reports ESC forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
    reads: usize,
}

impl ScriptedKeys {
    /// Script from explicit keys.
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self { keys: keys.into_iter().collect(), reads: 0 }
    }

    /// Script from a string, one key per character; `\x1b` is ESC.
    #[must_use]
    pub fn from_chars(text: &str) -> Self {
        Self::new(text.chars().map(|c| if c == '\x1b' { Key::Escape } else { Key::Char(c) }))
    }

    /// Number of keys read so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl KeyReader for ScriptedKeys {
    fn read_key(&mut self) -> Result<Key> {
        self.reads += 1;
        Ok(self.keys.pop_front().unwrap_or(Key::Escape))
    }
}

#[cfg(feature = "terminal")]
impl From<crossterm::event::KeyEvent> for Key {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::{KeyCode, KeyModifiers};

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Self::Interrupt,
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::Esc => Self::Escape,
            _ => Self::Other,
        }
    }
}
