//! Terminal UI implementation using ratatui
//!
//! Concrete `UIRenderer` for a crossterm terminal. It only draws: the content of the
//! current display mode and a one-line status bar.

use crate::error::{FountviewError, Result};
use crate::render::ui::state::{DisplayMode, ViewState};
use crate::render::ui::theme::ColorTheme;
use crate::render::ui::UIRenderer;
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    /// Create a new terminal UI instance with the default theme
    pub fn new() -> Result<Self> {
        Self::with_theme(ColorTheme::default())
    }

    /// Create terminal UI with custom theme
    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }

    fn render_content(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let lines: Vec<Line> = match view_state.display_mode {
            DisplayMode::Markup => view_state
                .content()
                .lines()
                .map(|line| markup_line(line, theme))
                .collect(),
            DisplayMode::Source => view_state
                .content()
                .lines()
                .map(|line| Line::styled(line, theme.text_style()))
                .collect(),
        };

        let scroll = u16::try_from(view_state.scroll_top).unwrap_or(u16::MAX);
        let mut paragraph = Paragraph::new(lines).scroll((scroll, 0));
        if view_state.wrap_lines {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        frame.render_widget(paragraph, area);
    }

    fn render_status(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let status_line = &view_state.status_line;
        let fg = if status_line.has_error() {
            theme.error_text
        } else if !status_line.bridge.is_ready() {
            theme.pending_text
        } else {
            theme.status_fg
        };

        let mut style = Style::default().bg(theme.status_bg).fg(fg);
        if status_line.has_error() {
            style = style.add_modifier(Modifier::BOLD);
        }

        let status = Paragraph::new(view_state.format_status_line()).style(style);
        frame.render_widget(status, area);
    }
}

/// Split a line of HTML into tag and text spans.
fn markup_line<'a>(line: &'a str, theme: &ColorTheme) -> Line<'a> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        if open > 0 {
            spans.push(Span::styled(&rest[..open], theme.text_style()));
        }
        match rest[open..].find('>') {
            Some(close) => {
                let end = open + close + 1;
                spans.push(Span::styled(&rest[open..end], theme.markup_tag));
                rest = &rest[end..];
            }
            None => {
                spans.push(Span::styled(&rest[open..], theme.text_style()));
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest, theme.text_style()));
    }

    Line::from(spans)
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            // Extract theme before closure to avoid borrowing issues
            let theme = &self.theme;

            terminal.draw(move |frame| {
                let size = frame.size();

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
                    .split(size);

                Self::render_content(frame, chunks[0], view_state, theme);
                Self::render_status(frame, chunks[1], view_state, theme);
            })
            .map_err(FountviewError::terminal("draw frame"))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode().map_err(FountviewError::terminal("enable raw mode"))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(FountviewError::terminal("enter alternate screen"))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(FountviewError::terminal("create terminal"))?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode().map_err(FountviewError::terminal("disable raw mode"))?;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
                .map_err(FountviewError::terminal("leave alternate screen"))?;
            self.terminal = None;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()
            .map_err(FountviewError::terminal("query terminal size"))?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_texts<'a>(line: &'a Line<'a>) -> Vec<&'a str> {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn markup_line_separates_tags() {
        let theme = ColorTheme::default();
        let line = markup_line("<h4 class=\"character\">KANE</h4>", &theme);
        assert_eq!(
            span_texts(&line),
            vec!["<h4 class=\"character\">", "KANE", "</h4>"]
        );
        assert_eq!(line.spans[0].style, theme.markup_tag);
        assert_eq!(line.spans[1].style, theme.text_style());
    }

    #[test]
    fn markup_line_tolerates_unclosed_tag() {
        let theme = ColorTheme::default();
        let line = markup_line("text <br", &theme);
        assert_eq!(span_texts(&line), vec!["text ", "<br"]);
    }
}
