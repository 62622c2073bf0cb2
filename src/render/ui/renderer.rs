//! UI renderer trait
//!
//! This module defines the `UIRenderer` trait for rendering terminal interfaces and managing
//! lifecycle hooks such as initialization and cleanup.

use crate::error::Result;
use crate::render::ui::state::ViewState;

/// Core trait for UI rendering
pub trait UIRenderer {
    /// Render the current view state to the terminal
    ///
    /// This method should:
    /// - Redraw the content area for the current display mode
    /// - Update the status line, including bridge and render indicators
    fn render(&mut self, view_state: &ViewState) -> Result<()>;

    /// Initialize the terminal UI
    ///
    /// This method should:
    /// - Set up raw mode
    /// - Enter the alternate screen
    /// - Enable mouse capture for wheel scrolling
    fn initialize(&mut self) -> Result<()>;

    /// Clean up and restore terminal state
    fn cleanup(&mut self) -> Result<()>;

    /// Get current terminal dimensions
    fn get_terminal_size(&self) -> Result<(u16, u16)>; // (width, height)
}
