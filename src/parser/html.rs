//! HTML emission for lexed scripts.
//!
//! Every block element is written on its own line. The class names are the structural
//! markers a stylesheet (or a test) keys on.

use crate::parser::inline::{escape_html, render_inline};
use crate::parser::lexer::{DialogueBlock, DialoguePart, Script, TitlePage, Token};
use std::fmt::Write;

/// Which optional elements make it into the output.
#[derive(Debug, Clone, Copy)]
pub struct HtmlOptions {
    pub show_outline: bool,
    /// Render `[[notes]]` as spans; when false the note pass is skipped entirely
    pub show_notes: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            show_outline: true,
            show_notes: false,
        }
    }
}

fn inline(text: &str, options: HtmlOptions) -> String {
    render_inline(text, options.show_notes)
}

/// Render a whole script: optional title page, then the script body.
pub fn render_script(script: &Script, options: HtmlOptions) -> String {
    let mut out = String::new();
    if !script.title_page.is_empty() {
        render_title_page(&mut out, &script.title_page, options);
    }

    out.push_str("<div class=\"script\">");
    let mut wrote_any = false;
    for token in &script.tokens {
        let mut element = String::new();
        render_token(&mut element, token, options);
        if element.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&element);
        wrote_any = true;
    }
    if wrote_any {
        out.push('\n');
    }
    out.push_str("</div>");
    out
}

fn render_title_page(out: &mut String, page: &TitlePage, options: HtmlOptions) {
    out.push_str("<div class=\"title-page\">\n");
    for entry in &page.entries {
        let class = title_class(&entry.key);
        let value = entry
            .lines
            .iter()
            .map(|line| inline(line, options))
            .collect::<Vec<_>>()
            .join("<br />");
        if class == "title" {
            let _ = writeln!(out, "<h1 class=\"title\">{value}</h1>");
        } else {
            let _ = writeln!(out, "<p class=\"{class}\">{value}</p>");
        }
    }
    out.push_str("</div>\n");
}

/// `Draft date` -> `draft-date`
fn title_class(key: &str) -> String {
    let class = key
        .split_whitespace()
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    escape_html(&class)
}

fn render_token(out: &mut String, token: &Token, options: HtmlOptions) {
    match token {
        Token::SceneHeading { text, number } => {
            let text = inline(text, options);
            match number {
                Some(number) => {
                    let number = escape_html(number);
                    let _ = write!(
                        out,
                        "<h3 class=\"scene-heading\" data-scene-number=\"{number}\">{text}</h3>"
                    );
                }
                None => {
                    let _ = write!(out, "<h3 class=\"scene-heading\">{text}</h3>");
                }
            }
        }
        Token::Action(lines) => {
            let body = lines
                .iter()
                .map(|line| inline(line, options))
                .collect::<Vec<_>>()
                .join("<br />");
            let _ = write!(out, "<p class=\"action\">{body}</p>");
        }
        Token::Dialogue(block) => render_dialogue(out, block, options),
        Token::DualDialogue(left, right) => {
            out.push_str("<div class=\"dual-dialogue\">\n");
            render_dialogue(out, left, options);
            out.push('\n');
            render_dialogue(out, right, options);
            out.push_str("\n</div>");
        }
        Token::Transition(text) => {
            let _ = write!(
                out,
                "<h2 class=\"transition\">{}</h2>",
                inline(text, options)
            );
        }
        Token::Centered(text) => {
            let _ = write!(out, "<p class=\"centered\">{}</p>", inline(text, options));
        }
        Token::Lyrics(text) => {
            let _ = write!(out, "<p class=\"lyrics\">{}</p>", inline(text, options));
        }
        Token::Section { depth, text } => {
            if options.show_outline {
                let _ = write!(
                    out,
                    "<p class=\"section\" data-depth=\"{depth}\">{}</p>",
                    inline(text, options)
                );
            }
        }
        Token::Synopsis(text) => {
            if options.show_outline {
                let _ = write!(
                    out,
                    "<p class=\"synopsis\">{}</p>",
                    inline(text, options)
                );
            }
        }
        Token::PageBreak => out.push_str("<hr class=\"page-break\" />"),
    }
}

/// Consecutive spoken lines share one `<p class="line">`, split by `<br />`.
fn render_dialogue(out: &mut String, block: &DialogueBlock, options: HtmlOptions) {
    out.push_str("<div class=\"dialogue\">");
    let name = inline(&block.character, options);
    match &block.extension {
        Some(extension) => {
            let _ = write!(
                out,
                "<h4 class=\"character\">{name} <span class=\"extension\">{}</span></h4>",
                inline(extension, options)
            );
        }
        None => {
            let _ = write!(out, "<h4 class=\"character\">{name}</h4>");
        }
    }

    let mut spoken: Vec<String> = Vec::new();
    for part in &block.parts {
        match part {
            DialoguePart::Line(line) => spoken.push(inline(line, options)),
            DialoguePart::Parenthetical(text) => {
                flush_spoken(out, &mut spoken);
                let _ = write!(
                    out,
                    "<p class=\"parenthetical\">{}</p>",
                    inline(text, options)
                );
            }
            DialoguePart::Lyric(text) => {
                flush_spoken(out, &mut spoken);
                let _ = write!(out, "<p class=\"lyrics\">{}</p>", inline(text, options));
            }
        }
    }
    flush_spoken(out, &mut spoken);
    out.push_str("</div>");
}

fn flush_spoken(out: &mut String, spoken: &mut Vec<String>) {
    if spoken.is_empty() {
        return;
    }
    let _ = write!(out, "<p class=\"line\">{}</p>", spoken.join("<br />"));
    spoken.clear();
}
