//! Render coordination on the UI side.
//!
//! Mediates between input actions, the request port, and bridge events. The bridge
//! answers every accepted request in order; this state keeps the view on the latest one
//! and re-submits the current text once the bridge becomes ready, because requests
//! emitted before that are dropped.

use crate::input::{InputAction, ScrollDirection};
use crate::render::port::{Delivery, RequestPort};
use crate::render::protocol::{BridgeStatus, RenderEvent, RequestId};
use crate::render::ui::{RenderIndicator, ViewState};

/// Tracks render-related state that must persist across input actions and bridge events.
pub struct RenderLoopState {
    port: RequestPort,
    latest_request: Option<RequestId>,
    needs_render: bool,
}

impl RenderLoopState {
    pub fn new(port: RequestPort) -> Self {
        Self {
            port,
            latest_request: None,
            needs_render: true,
        }
    }

    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// True when the current text still has to reach the bridge
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Ask the bridge to render the current source text.
    pub fn submit(&mut self, view_state: &mut ViewState) -> Delivery {
        let delivery = self.port.emit(view_state.source_text.as_str());
        match delivery {
            Delivery::Accepted(request_id) => {
                self.latest_request = Some(request_id);
                self.needs_render = false;
                view_state.status_line.render = RenderIndicator::Pending(request_id);
            }
            Delivery::Dropped => {
                self.needs_render = true;
                log::debug!("render request dropped, bridge not subscribed");
            }
        }
        delivery
    }

    /// Apply a bridge lifecycle change, re-submitting text that was dropped earlier.
    pub fn handle_status(&mut self, status: BridgeStatus, view_state: &mut ViewState) {
        let ready = status.is_ready();
        view_state.status_line.bridge = status;
        if ready && self.needs_render {
            self.submit(view_state);
        }
    }

    /// Apply a bridge response; responses to superseded requests are skipped.
    pub fn handle_event(&mut self, event: RenderEvent, view_state: &mut ViewState) {
        if Some(event.request_id()) != self.latest_request {
            log::debug!(
                "skipping response {} superseded by {:?}",
                event.request_id(),
                self.latest_request
            );
            return;
        }

        match event {
            RenderEvent::Rendered { request_id, html } => {
                view_state.apply_rendered(request_id, html);
            }
            RenderEvent::Failed { request_id, error } => {
                view_state.apply_failure(request_id, error);
            }
        }
    }

    /// Apply a view-only action. Returns false when the user asked to quit.
    pub fn process_action(&mut self, action: InputAction, view_state: &mut ViewState) -> bool {
        match action {
            InputAction::Quit => return false,
            InputAction::Scroll { direction, lines } => {
                let lines = i64::try_from(lines).unwrap_or(i64::MAX);
                match direction {
                    ScrollDirection::Up => view_state.scroll_by(-lines),
                    ScrollDirection::Down => view_state.scroll_by(lines),
                }
            }
            InputAction::PageUp => view_state.page_up(),
            InputAction::PageDown => view_state.page_down(),
            InputAction::GoToStart => view_state.go_to_start(),
            InputAction::GoToEnd => view_state.go_to_end(),
            InputAction::ToggleView => view_state.toggle_display_mode(),
            InputAction::ToggleWrap => view_state.toggle_wrap(),
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
            }
            InputAction::Reload | InputAction::NoAction | InputAction::InvalidInput => {}
        }
        true
    }
}
