//! Input subsystem.
//!
//! [`raw`] turns crossterm events into primitive events; [`service`] maps them to the
//! viewer's actions.

pub mod raw;
pub mod service;

// Modules outside this crate should prefer importing from `crate::input` rather than
// reaching into submodules.
pub use raw::ScrollDirection;
pub use service::{map_key, InputAction, InputService};
