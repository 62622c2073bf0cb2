//! Rendering subsystem.
//!
//! - [`protocol`] - messages exchanged between the UI layer and the bridge
//! - [`port`] - the late-subscribing request port
//! - [`bridge`] - parser lifecycle and the request/response relay
//! - [`service`] - UI-side bookkeeping of requests in flight
//! - [`ui`] - terminal presentation of the rendered markup

pub mod bridge;
pub mod port;
pub mod protocol;
pub mod service;
pub mod ui;

pub use bridge::{handle_render_request, spawn_render_bridge, BridgeChannels, RenderBridge};
pub use port::{Delivery, RequestPort};
pub use protocol::{BridgeStatus, RenderEvent, RenderRequest, RequestId, StartupConfig};
pub use service::RenderLoopState;
