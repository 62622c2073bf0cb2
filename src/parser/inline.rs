//! Inline markup: HTML escaping, emphasis and notes.

/// Emphasis delimiters, longest first so `***` is not consumed as `**` + `*`.
const EMPHASIS: [(&str, &str, &str); 4] = [
    ("***", "<strong><em>", "</em></strong>"),
    ("**", "<strong>", "</strong>"),
    ("*", "<em>", "</em>"),
    ("_", "<u>", "</u>"),
];

// Placeholders for backslash-escaped delimiters; they survive escaping and emphasis passes.
const ESCAPED_STAR: &str = "&#42;";
const ESCAPED_UNDERSCORE: &str = "&#95;";

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one line of Fountain text to HTML.
///
/// With `notes` set, `[[notes]]` that survived preprocessing become `<span class="note">`;
/// otherwise any leftover brackets stay literal.
pub fn render_inline(text: &str, notes: bool) -> String {
    let escaped = escape_html(text)
        .replace("\\*", ESCAPED_STAR)
        .replace("\\_", ESCAPED_UNDERSCORE);
    let escaped = if notes {
        wrap_pairs(&escaped, "[[", "]]", "<span class=\"note\">", "</span>")
    } else {
        escaped
    };
    EMPHASIS
        .iter()
        .fold(escaped, |acc, (delim, open, close)| {
            wrap_pairs(&acc, delim, delim, open, close)
        })
}

/// Replace balanced `start ... end` pairs on one line with HTML tags.
///
/// Content must be non-empty and must not begin with whitespace; unmatched delimiters
/// are kept literally. Runs in linear time: the position of the next closer is
/// remembered across rejected openers, and scanning stops once no closer is left.
fn wrap_pairs(text: &str, start: &str, end: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;
    let mut next_end: Option<usize> = None;

    while let Some(offset) = text[search..].find(start) {
        let content = search + offset + start.len();
        let closer = match next_end {
            Some(at) if at >= content => Some(at),
            _ => text[content..].find(end).map(|len| content + len),
        };
        let Some(closer) = closer else {
            break;
        };
        next_end = Some(closer);

        let inner = &text[content..closer];
        if inner.is_empty() || inner.starts_with(char::is_whitespace) {
            search = content;
            continue;
        }

        out.push_str(&text[copied..content - start.len()]);
        out.push_str(open);
        out.push_str(inner);
        out.push_str(close);
        copied = closer + end.len();
        search = copied;
        next_end = None;
    }
    out.push_str(&text[copied..]);
    out
}
