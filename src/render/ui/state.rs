//! UI state management structures
//!
//! This module holds what the terminal shows: the current source text, the last markup the
//! bridge delivered, scroll position and the status line. Rendering work itself happens in
//! the bridge; ViewState only records its results.

use crate::error::ParseError;
use crate::render::protocol::{BridgeStatus, RequestId, StartupConfig};
use ratatui::widgets::{Paragraph, Wrap};

/// Which document the content area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Rendered HTML from the bridge
    Markup,
    /// The raw screenplay text
    Source,
}

impl DisplayMode {
    /// Get the mode indicator string for display
    pub fn indicator(&self) -> &'static str {
        match self {
            DisplayMode::Markup => "HTML",
            DisplayMode::Source => "SOURCE",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Markup => DisplayMode::Source,
            DisplayMode::Source => DisplayMode::Markup,
        }
    }
}

/// Outcome of the most recent render as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderIndicator {
    /// Nothing requested yet
    Idle,
    /// A request was accepted and its response has not arrived
    Pending(RequestId),
    /// The latest response was markup
    Rendered(RequestId),
    /// The latest response was a parser fault; the previous markup stays on screen
    Failed { request_id: RequestId, error: ParseError },
}

/// Viewport state for rendering
#[derive(Debug)]
pub struct ViewState {
    /// Name shown in the status line
    pub document_name: String,

    /// Current screenplay text
    pub source_text: String,

    /// Markup from the last successful render
    pub rendered_html: Option<String>,

    pub display_mode: DisplayMode,

    /// Wrap long lines instead of clipping them
    pub wrap_lines: bool,

    /// First visible line of the content area
    pub scroll_top: usize,

    /// Viewport dimensions
    pub viewport_width: u16,
    pub viewport_height: u16,

    /// Status line content
    pub status_line: StatusLine,
}

impl ViewState {
    /// Create the initial view from the start-up configuration
    pub fn new(
        startup: &StartupConfig,
        document_name: impl Into<String>,
        viewport_width: u16,
        viewport_height: u16,
    ) -> Self {
        Self {
            document_name: document_name.into(),
            source_text: startup.starting_text.clone(),
            rendered_html: None,
            display_mode: DisplayMode::Markup,
            wrap_lines: true,
            scroll_top: 0,
            viewport_width,
            viewport_height,
            status_line: StatusLine::new(),
        }
    }

    /// Get lines per page (viewport height minus status line)
    pub fn lines_per_page(&self) -> usize {
        usize::from(self.viewport_height.saturating_sub(1))
    }

    /// Text of the content area for the current display mode
    pub fn content(&self) -> &str {
        match self.display_mode {
            DisplayMode::Markup => self.rendered_html.as_deref().unwrap_or(""),
            DisplayMode::Source => &self.source_text,
        }
    }

    pub fn content_line_count(&self) -> usize {
        self.content().lines().count()
    }

    /// Terminal rows the content occupies; scroll offsets are counted in these.
    ///
    /// With wrapping on, long lines take several rows at the current viewport width,
    /// laid out the same way the terminal paragraph wraps them.
    pub fn content_row_count(&self) -> usize {
        let content = self.content();
        if !self.wrap_lines || self.viewport_width == 0 || content.is_empty() {
            return self.content_line_count();
        }
        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .line_count(self.viewport_width)
    }

    fn max_scroll(&self) -> usize {
        self.content_row_count()
            .saturating_sub(self.lines_per_page().max(1))
    }

    /// Move the viewport by `delta` lines, clamped to the content
    pub fn scroll_by(&mut self, delta: i64) {
        let target = if delta.is_negative() {
            self.scroll_top
                .saturating_sub(usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX))
        } else {
            self.scroll_top
                .saturating_add(usize::try_from(delta).unwrap_or(usize::MAX))
        };
        self.scroll_top = target.min(self.max_scroll());
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.lines_per_page() as i64);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.lines_per_page() as i64));
    }

    pub fn go_to_start(&mut self) {
        self.scroll_top = 0;
    }

    pub fn go_to_end(&mut self) {
        self.scroll_top = self.max_scroll();
    }

    pub fn toggle_wrap(&mut self) {
        self.wrap_lines = !self.wrap_lines;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    pub fn toggle_display_mode(&mut self) {
        self.display_mode = self.display_mode.toggled();
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Replace the source text (after a reload); markup stays until the next render lands
    pub fn set_source_text(&mut self, text: String) {
        self.source_text = text;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Record fresh markup from the bridge
    pub fn apply_rendered(&mut self, request_id: RequestId, html: String) {
        self.rendered_html = Some(html);
        self.status_line.render = RenderIndicator::Rendered(request_id);
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Record a parser fault without touching the markup on screen
    pub fn apply_failure(&mut self, request_id: RequestId, error: ParseError) {
        self.status_line.render = RenderIndicator::Failed { request_id, error };
    }

    /// Update terminal dimensions
    /// Returns true if dimensions actually changed
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.viewport_width != width || self.viewport_height != height;

        if changed {
            self.viewport_width = width;
            self.viewport_height = height;
            self.scroll_top = self.scroll_top.min(self.max_scroll());
        }

        changed
    }

    /// Format the complete status line for this view state
    pub fn format_status_line(&self) -> String {
        let total = self.content_row_count();
        let position = if total == 0 {
            "Empty".to_string()
        } else if self.scroll_top >= self.max_scroll() {
            "END".to_string()
        } else {
            format!("{}/{}", self.scroll_top + 1, total)
        };
        self.status_line
            .format_status_line(&self.document_name, self.display_mode, &position)
    }
}

/// Status line information
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub bridge: BridgeStatus,
    pub render: RenderIndicator,
    pub message: Option<String>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            bridge: BridgeStatus::Loading,
            render: RenderIndicator::Idle,
            message: None,
        }
    }
}

impl StatusLine {
    /// Create a new status line
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a temporary message
    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    /// Clear any temporary message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// True when the status line should draw attention to a problem
    pub fn has_error(&self) -> bool {
        matches!(self.bridge, BridgeStatus::Failed(_))
            || matches!(self.render, RenderIndicator::Failed { .. })
    }

    /// Render state segment: bridge lifecycle first, then the last render outcome
    pub fn render_segment(&self) -> String {
        match (&self.bridge, &self.render) {
            (BridgeStatus::Failed(reason), _) => format!("parser unavailable: {reason}"),
            (BridgeStatus::Loading, _) => "loading parser...".to_string(),
            (BridgeStatus::Ready, RenderIndicator::Idle) => "ready".to_string(),
            (BridgeStatus::Ready, RenderIndicator::Pending(_)) => "rendering...".to_string(),
            (BridgeStatus::Ready, RenderIndicator::Rendered(id)) => format!("rendered #{id}"),
            (BridgeStatus::Ready, RenderIndicator::Failed { request_id, error }) => {
                format!("render #{request_id} failed: {error}")
            }
        }
    }

    /// Format the status line for display
    pub fn format_status_line(&self, name: &str, mode: DisplayMode, position: &str) -> String {
        let mut line = format!(
            "{} | {} | {} | {}",
            name,
            mode.indicator(),
            self.render_segment(),
            position
        );
        if let Some(ref message) = self.message {
            line.push_str(" | ");
            line.push_str(message);
        }
        line
    }
}
