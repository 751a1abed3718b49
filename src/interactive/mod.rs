//! Interactive pan/zoom.
//!
//! A [`Controller`] turns keys from a [`KeyReader`] into view mutations and
//! redraws through a [`LineSink`]. The crossterm adapters live behind the
//! `terminal` feature; [`ScriptedKeys`] and [`MemorySink`] drive the same loop
//! in tests.

mod controller;
mod input;
mod sink;
#[cfg(feature = "terminal")]
mod terminal;

pub use controller::{run_interactive, Controller, ControllerState};
pub use input::{Action, InputHandler, Key, KeyReader, ScriptedKeys};
pub use sink::{LineSink, MemorySink, WriterSink};
#[cfg(feature = "terminal")]
pub use terminal::{TerminalKeys, TerminalSink};
