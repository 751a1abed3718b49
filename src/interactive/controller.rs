//! Key-driven view state machine.

use super::input::{Action, InputHandler, Key, KeyReader};
use super::sink::LineSink;
use crate::error::Result;
use crate::layout::PROMPT;
use crate::options::PlotOptions;
use crate::plot::render_view;
use crate::series::MultiSeries;
use crate::view::{PanDirection, ViewConfig};
use tracing::debug;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for the next key.
    Running,
    /// Quit was requested; no further keys are read.
    Stopped,
}

/// Owns the view of one interactive plot and applies key actions to it.
#[derive(Debug, Clone)]
pub struct Controller<'a> {
    series: &'a MultiSeries,
    options: PlotOptions,
    view: ViewConfig,
    input: InputHandler,
    state: ControllerState,
}

impl<'a> Controller<'a> {
    /// Derive the initial view for `series`.
    ///
    /// # Errors
    ///
    /// Returns option or log-scale errors from view derivation.
    pub fn new(series: &'a MultiSeries, options: &PlotOptions) -> Result<Self> {
        let mut options = options.clone();
        options.interactive = true;
        let view = ViewConfig::derive(series.stats(), &options)?;
        Ok(Self { series, options, view, input: InputHandler::new(), state: ControllerState::Running })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Render the current view.
    ///
    /// # Errors
    ///
    /// Returns rendering errors.
    pub fn render(&self) -> Result<Vec<String>> {
        render_view(self.series, &self.options, &self.view)
    }

    /// Handle one key. Keys after `Stopped` are ignored.
    pub fn step(&mut self, key: Key) -> ControllerState {
        let action = self.input.handle_key(key);
        self.apply(action)
    }

    /// Apply one action to the view.
    pub fn apply(&mut self, action: Action) -> ControllerState {
        if self.state == ControllerState::Stopped {
            return self.state;
        }

        let step = self.view.pan_step();
        let factor = self.view.zoom_factor();
        let changed = match action {
            Action::PanLeft => self.view.pan(PanDirection::Left, step),
            Action::PanRight => self.view.pan(PanDirection::Right, step),
            Action::PanDown => self.view.pan(PanDirection::Down, step),
            Action::PanUp => self.view.pan(PanDirection::Up, step),
            Action::ZoomIn => self.view.zoom(factor),
            Action::ZoomOut => self.view.zoom(factor.recip()),
            Action::Reset => {
                self.view.reset();
                true
            }
            Action::Quit => {
                self.state = ControllerState::Stopped;
                false
            }
            Action::None => false,
        };

        debug!(?action, changed, bounds = ?self.view.bounds(), "interactive step");
        self.state
    }
}

/// Run the interactive loop until `q`, ESC or Ctrl+C.
///
/// The first frame is written, then for each key: prompt, read, and (unless
/// quitting) erase the frame and prompt and write the re-rendered frame.
/// On quit only the prompt is erased, leaving the last frame in place.
///
/// # Errors
///
/// Returns view derivation errors, key reader errors and sink errors.
pub fn run_interactive<K: KeyReader, S: LineSink>(
    series: &MultiSeries,
    options: &PlotOptions,
    keys: &mut K,
    sink: &mut S,
) -> Result<()> {
    let mut controller = Controller::new(series, options)?;
    let prompt = [PROMPT.to_string()];

    let mut frame = controller.render()?;
    sink.write_lines(&frame)?;

    loop {
        sink.write_lines(&prompt)?;
        let key = keys.read_key()?;
        if controller.step(key) == ControllerState::Stopped {
            sink.erase_lines(prompt.len())?;
            return Ok(());
        }

        sink.erase_lines(frame.len() + prompt.len())?;
        frame = controller.render()?;
        sink.write_lines(&frame)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::{MemorySink, ScriptedKeys};

    fn series() -> MultiSeries {
        MultiSeries::from_ys(vec![0.0, 1.0, 4.0, 9.0, 16.0]).unwrap()
    }

    #[test]
    fn test_quit_stops_and_is_terminal() {
        let data = series();
        let mut controller = Controller::new(&data, &PlotOptions::new()).unwrap();
        assert_eq!(controller.step(Key::Char('q')), ControllerState::Stopped);
        let before = controller.view().bounds();
        assert_eq!(controller.step(Key::Char('h')), ControllerState::Stopped);
        assert_eq!(controller.view().bounds(), before);
    }

    #[test]
    fn test_pan_left_moves_x_bounds() {
        let data = series();
        let mut controller = Controller::new(&data, &PlotOptions::new()).unwrap();
        let before = controller.view().bounds();
        controller.step(Key::Char('h'));
        let after = controller.view().bounds();
        assert!(after.x_min < before.x_min);
        assert_eq!(after.y_min, before.y_min);
    }

    #[test]
    fn test_unknown_key_keeps_view() {
        let data = series();
        let mut controller = Controller::new(&data, &PlotOptions::new()).unwrap();
        let before = controller.view().bounds();
        assert_eq!(controller.step(Key::Char('z')), ControllerState::Running);
        assert_eq!(controller.view().bounds(), before);
    }

    #[test]
    fn test_reset_restores_initial_view() {
        let data = series();
        let mut controller = Controller::new(&data, &PlotOptions::new()).unwrap();
        let initial = controller.view().bounds();
        for c in "hhkuuunl".chars() {
            controller.step(Key::Char(c));
        }
        assert_ne!(controller.view().bounds(), initial);
        controller.step(Key::Char('R'));
        assert_eq!(controller.view().bounds(), initial);
    }

    #[test]
    fn test_loop_rerenders_once_per_key() {
        let data = series();
        let options = PlotOptions::new().dimensions(20, 5);
        let mut keys = ScriptedKeys::from_chars("hu?q");
        let mut sink = MemorySink::new();
        run_interactive(&data, &options, &mut keys, &mut sink).unwrap();

        // Frame: bounds header + 5 rows + 3 body lines.
        let frame = 1 + 5 + 3;
        assert_eq!(keys.reads(), 4);
        assert_eq!(sink.written(), 4 * frame + 4);
        assert_eq!(sink.erased(), 3 * (frame + 1) + 1);
        assert_eq!(sink.lines().len(), frame);
        assert!(sink.lines()[0].contains("x: ["));
    }

    #[test]
    fn test_loop_stops_on_escape() {
        let data = series();
        let mut keys = ScriptedKeys::from_chars("\x1b");
        let mut sink = MemorySink::new();
        run_interactive(&data, &PlotOptions::new(), &mut keys, &mut sink).unwrap();
        assert_eq!(keys.reads(), 1);
        assert!(!sink.lines().iter().any(|l| l == PROMPT));
    }
}
