//! # fountview - Terminal Fountain Screenplay Previewer
//!
//! Renders Fountain screenplays to HTML through an asynchronously loaded parser and shows
//! the result in a terminal.
//!
//! ## Features
//!
//! - **Late-start bridge**: the parser loads in the background; the viewer is usable
//!   immediately and renders as soon as the bridge reports ready
//! - **Ordered rendering**: requests are answered one at a time, in the order they were made
//! - **Fault reporting**: malformed input produces an error event instead of markup
//! - **File watching**: edits saved to disk are picked up and re-rendered
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - TOML configuration
//! - [`parser`] - Fountain lexer, HTML emitter and the parser loader
//! - [`render`] - Request port, render bridge and terminal presentation
//! - [`input`] - Terminal input mapping
//! - [`source`] - Document loading and change detection
//! - [`app`] - Application core and component coordination

// Core modules
pub mod config;
pub mod error;
pub mod parser;
pub mod sample;
pub mod source;

// Subsystems
pub mod input;
pub mod render;

// Core components
pub mod app;

// Re-export commonly used types for convenience
pub use error::{FountviewError, ParseError, Result};

// Public API surface for external usage
pub use app::Application;
pub use config::Config;
pub use parser::{FountainLoader, FountainParser, ParserLoader, ScreenplayParser};
pub use render::{spawn_render_bridge, BridgeStatus, Delivery, RenderEvent, RequestPort};
pub use source::ScreenplaySource;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
