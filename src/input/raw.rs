//! Low-level input collection: crossterm polling and translation into primitive events
//! that the higher-level input service can consume.

use crate::error::{FountviewError, Result};
use ratatui::crossterm::event::{self, Event, KeyEvent, MouseEventKind};
use std::time::Duration;

/// Number of lines produced by a single mouse wheel tick.
const MOUSE_SCROLL_LINES: u64 = 3;
/// Poll timeout used when the caller does not provide one.
const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;

/// Direction for scroll actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Low-level events surfaced by the raw input collector.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    Scroll {
        direction: ScrollDirection,
        lines: u64,
    },
}

/// Translate a crossterm event, discarding the kinds the viewer ignores.
pub fn translate_event(event: Event) -> Option<RawInputEvent> {
    match event {
        Event::Key(key_event) => Some(RawInputEvent::Key(key_event)),
        Event::Resize(width, height) => Some(RawInputEvent::Resize { width, height }),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(RawInputEvent::Scroll {
                direction: ScrollDirection::Up,
                lines: MOUSE_SCROLL_LINES,
            }),
            MouseEventKind::ScrollDown => Some(RawInputEvent::Scroll {
                direction: ScrollDirection::Down,
                lines: MOUSE_SCROLL_LINES,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Collector that polls crossterm for events.
#[derive(Debug, Default)]
pub struct RawInputCollector;

impl RawInputCollector {
    pub fn new() -> Self {
        Self
    }

    /// Retrieve the next raw input event, blocking up to `timeout`.
    pub fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        let poll_timeout = timeout.unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS));
        let ready =
            event::poll(poll_timeout).map_err(FountviewError::terminal("poll terminal input"))?;
        if !ready {
            return Ok(None);
        }
        let event = event::read().map_err(FountviewError::terminal("read terminal input"))?;
        Ok(translate_event(event))
    }
}
