//! High-level input service.
//!
//! Maps raw terminal events to the viewer's `InputAction`s using `less`-style bindings.

use crate::error::Result;
use crate::input::raw::{translate_event, RawInputCollector, RawInputEvent, ScrollDirection};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// High-level input actions consumed by the application loop.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Scroll {
        direction: ScrollDirection,
        lines: u64,
    },
    PageUp,
    PageDown,
    GoToStart,
    GoToEnd,
    /// Switch between rendered markup and source text
    ToggleView,
    ToggleWrap,
    /// Re-read the document from disk and render it again
    Reload,
    Quit,
    Resize {
        width: u16,
        height: u16,
    },
    NoAction,
    InvalidInput,
}

/// Map a key press to an action.
pub fn map_key(key_event: KeyEvent) -> InputAction {
    if key_event.kind != KeyEventKind::Press {
        return InputAction::NoAction;
    }

    let modifiers = key_event.modifiers;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => InputAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('l') => InputAction::Reload,
            _ => InputAction::InvalidInput,
        };
    }
    if modifiers.contains(KeyModifiers::ALT) {
        return InputAction::InvalidInput;
    }

    match key_event.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => InputAction::Scroll {
            direction: ScrollDirection::Down,
            lines: 1,
        },
        KeyCode::Char('k') | KeyCode::Up => InputAction::Scroll {
            direction: ScrollDirection::Up,
            lines: 1,
        },
        KeyCode::Char(' ') | KeyCode::Char('f') | KeyCode::PageDown => InputAction::PageDown,
        KeyCode::Char('b') | KeyCode::PageUp => InputAction::PageUp,
        KeyCode::Char('g') | KeyCode::Home => InputAction::GoToStart,
        KeyCode::Char('G') | KeyCode::End => InputAction::GoToEnd,
        KeyCode::Tab => InputAction::ToggleView,
        KeyCode::Char('w') => InputAction::ToggleWrap,
        KeyCode::Char('r') => InputAction::Reload,
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        _ => InputAction::InvalidInput,
    }
}

/// Service responsible for producing high-level `InputAction`s from terminal events.
#[derive(Debug, Default)]
pub struct InputService {
    raw_input: RawInputCollector,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            raw_input: RawInputCollector::new(),
        }
    }

    /// Wait up to `timeout` for the next meaningful action.
    pub fn poll_action(&mut self, timeout: Option<Duration>) -> Result<Option<InputAction>> {
        Ok(self
            .raw_input
            .poll_event(timeout)?
            .and_then(Self::process_raw_event))
    }

    /// Map a synthetic crossterm event (used by tests and replays).
    pub fn process_event(&mut self, event: Event) -> Option<InputAction> {
        translate_event(event).and_then(Self::process_raw_event)
    }

    fn process_raw_event(event: RawInputEvent) -> Option<InputAction> {
        let action = match event {
            RawInputEvent::Key(key_event) => map_key(key_event),
            RawInputEvent::Resize { width, height } => InputAction::Resize { width, height },
            RawInputEvent::Scroll { direction, lines } => InputAction::Scroll { direction, lines },
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}
