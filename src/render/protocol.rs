//! Protocol definitions shared between the UI layer and the render bridge.

use crate::error::ParseError;
use std::sync::Arc;

/// Identifier attached to render requests so responses can be correlated.
pub type RequestId = u64;

/// Screenplay text the UI wants rendered, as it was at emission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub request_id: RequestId,
    pub raw_text: Arc<str>,
}

/// Events emitted by the bridge back to the UI, one per accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// The parser produced markup for `request_id`
    Rendered { request_id: RequestId, html: String },
    /// The parser rejected the text of `request_id`; nothing was rendered
    Failed {
        request_id: RequestId,
        error: ParseError,
    },
}

impl RenderEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            RenderEvent::Rendered { request_id, .. } | RenderEvent::Failed { request_id, .. } => {
                *request_id
            }
        }
    }
}

/// Lifecycle of the render bridge.
///
/// `Loading` is the initial state. `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeStatus {
    Loading,
    Ready,
    Failed(String),
}

impl BridgeStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, BridgeStatus::Ready)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BridgeStatus::Loading)
    }

    /// Short label for status lines.
    pub fn label(&self) -> &str {
        match self {
            BridgeStatus::Loading => "loading parser",
            BridgeStatus::Ready => "ready",
            BridgeStatus::Failed(_) => "parser unavailable",
        }
    }
}

/// Start-up value handed to the UI when it is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub starting_text: String,
}
