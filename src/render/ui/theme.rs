//! Color theme and styling definitions using ratatui colors
//!
//! This module provides color themes for terminal rendering using ratatui's
//! color system directly to avoid unnecessary abstractions.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for terminal UI elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Normal text color (None uses terminal default)
    pub normal_text: Option<Color>,

    /// HTML tags in the markup view
    pub markup_tag: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Status line segment shown while the parser loads or a render is pending
    pub pending_text: Color,

    /// Error/warning text
    pub error_text: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: None, // Use terminal default
            markup_tag: Style::default().fg(Color::DarkGray),
            status_bg: Color::Blue,
            status_fg: Color::White,
            pending_text: Color::Yellow,
            error_text: Color::Red,
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            normal_text: None,
            markup_tag: Style::default().add_modifier(Modifier::DIM),
            status_bg: Color::Black,
            status_fg: Color::White,
            pending_text: Color::White,
            error_text: Color::White,
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Monochrome => Self::monochrome(),
        }
    }

    /// Style for body text
    pub fn text_style(&self) -> Style {
        match self.normal_text {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
