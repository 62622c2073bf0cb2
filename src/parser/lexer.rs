//! Line classification for Fountain documents.
//!
//! The lexer works paragraph by paragraph: blank lines separate elements, and most element
//! kinds depend on whether the neighbouring lines are blank. Inline markup (emphasis, notes)
//! is left untouched here and handled by [`crate::parser::inline`].

/// Scene heading prefixes, matched case-insensitively and followed by `.` or a space.
const SCENE_PREFIXES: [&str; 6] = ["INT./EXT", "INT/EXT", "I/E", "INT", "EXT", "EST"];

/// Ordered `key: value` pairs from the title page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePage {
    pub entries: Vec<TitleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub key: String,
    pub lines: Vec<String>,
}

impl TitlePage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the first entry for `key`, ignoring case.
    pub fn get(&self, key: &str) -> Option<&TitleEntry> {
        self.entries
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
    }
}

/// One part of a dialogue block, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialoguePart {
    Line(String),
    Parenthetical(String),
    Lyric(String),
}

/// A character cue together with everything spoken under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueBlock {
    pub character: String,
    pub extension: Option<String>,
    pub parts: Vec<DialoguePart>,
}

/// A lexed screenplay element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    SceneHeading {
        text: String,
        number: Option<String>,
    },
    Action(Vec<String>),
    Dialogue(DialogueBlock),
    DualDialogue(DialogueBlock, DialogueBlock),
    Transition(String),
    Centered(String),
    Lyrics(String),
    Section {
        depth: usize,
        text: String,
    },
    Synopsis(String),
    PageBreak,
}

/// Title page plus body tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub title_page: TitlePage,
    pub tokens: Vec<Token>,
}

/// Split a normalized document into its title page and body tokens.
pub fn lex(text: &str) -> Script {
    let lines: Vec<&str> = text.split('\n').collect();
    let (title_page, body_start) = lex_title_page(&lines);
    let tokens = lex_body(&lines[body_start..]);
    Script { title_page, tokens }
}

/// Normalize line endings and drop `/* boneyard */` regions.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    strip_boneyard(&text)
}

/// Remove `[[notes]]`, or flatten multi-line notes onto one line when they are kept.
pub fn prepare_notes(text: &str, keep: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("[[") {
        let Some(len) = rest[start + 2..].find("]]") else {
            break;
        };
        let end = start + 2 + len + 2;
        out.push_str(&rest[..start]);
        if keep {
            out.push_str(&rest[start..end].replace('\n', " "));
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

fn strip_boneyard(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        let Some(len) = rest[start + 2..].find("*/") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

fn title_key(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let valid = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ');
    valid.then(|| (key.trim(), value.trim()))
}

fn lex_title_page(lines: &[&str]) -> (TitlePage, usize) {
    let mut page = TitlePage::default();
    let Some(first) = lines.first() else {
        return (page, 0);
    };
    if title_key(first).is_none() {
        return (page, 0);
    }

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        if line.trim().is_empty() {
            break;
        }
        let indented = line.starts_with('\t') || line.starts_with("   ");
        match (indented, title_key(line)) {
            (false, Some((key, value))) => {
                let mut entry = TitleEntry {
                    key: key.to_string(),
                    lines: Vec::new(),
                };
                if !value.is_empty() {
                    entry.lines.push(value.to_string());
                }
                page.entries.push(entry);
            }
            _ => {
                if let Some(entry) = page.entries.last_mut() {
                    entry.lines.push(line.trim().to_string());
                }
            }
        }
        index += 1;
    }
    (page, index)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Blank for the purpose of ending a dialogue block; two spaces keep it open.
fn ends_dialogue(line: &str) -> bool {
    line != "  " && is_blank(line)
}

fn lex_body(lines: &[&str]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        if is_blank(line) {
            index += 1;
            continue;
        }

        let trimmed = line.trim();
        let prev_blank = index == 0 || is_blank(lines[index - 1]);
        let next_blank = index + 1 >= lines.len() || is_blank(lines[index + 1]);

        if trimmed.len() >= 3 && trimmed.chars().all(|c| c == '=') {
            tokens.push(Token::PageBreak);
        } else if let Some(rest) = trimmed.strip_prefix('=') {
            tokens.push(Token::Synopsis(rest.trim().to_string()));
        } else if trimmed.starts_with('#') {
            let depth = trimmed.chars().take_while(|&c| c == '#').count();
            tokens.push(Token::Section {
                depth: depth.min(6),
                text: trimmed[depth..].trim().to_string(),
            });
        } else if let Some(heading) = scene_heading(trimmed, prev_blank) {
            tokens.push(heading);
        } else if trimmed.starts_with('>') && trimmed.ends_with('<') && trimmed.len() >= 2 {
            tokens.push(Token::Centered(
                trimmed[1..trimmed.len() - 1].trim().to_string(),
            ));
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            tokens.push(Token::Transition(rest.trim().to_string()));
        } else if let Some(rest) = trimmed.strip_prefix('~') {
            tokens.push(Token::Lyrics(rest.trim().to_string()));
        } else if prev_blank && next_blank && is_transition(trimmed) {
            tokens.push(Token::Transition(trimmed.to_string()));
        } else if let Some((block, dual)) = character_cue(trimmed, prev_blank, next_blank) {
            let mut block = block;
            index += 1;
            while index < lines.len() && !ends_dialogue(lines[index]) {
                block.parts.push(dialogue_part(lines[index]));
                index += 1;
            }
            push_dialogue(&mut tokens, block, dual);
            continue;
        } else {
            let mut paragraph = vec![action_line(line)];
            index += 1;
            while index < lines.len() && !is_blank(lines[index]) {
                paragraph.push(action_line(lines[index]));
                index += 1;
            }
            tokens.push(Token::Action(paragraph));
            continue;
        }
        index += 1;
    }
    tokens
}

fn scene_heading(trimmed: &str, prev_blank: bool) -> Option<Token> {
    let text = if let Some(rest) = trimmed.strip_prefix('.') {
        if rest.starts_with('.') || rest.is_empty() {
            return None;
        }
        rest
    } else if prev_blank && has_scene_prefix(trimmed) {
        trimmed
    } else {
        return None;
    };

    let (text, number) = split_scene_number(text);
    Some(Token::SceneHeading {
        text: text.to_string(),
        number,
    })
}

fn has_scene_prefix(line: &str) -> bool {
    SCENE_PREFIXES.iter().any(|prefix| {
        line.len() > prefix.len()
            && line.is_char_boundary(prefix.len())
            && line[..prefix.len()].eq_ignore_ascii_case(prefix)
            && matches!(line.as_bytes()[prefix.len()], b'.' | b' ')
    })
}

fn split_scene_number(text: &str) -> (&str, Option<String>) {
    if let Some(body) = text.strip_suffix('#') {
        if let Some(open) = body.rfind('#') {
            let number = &body[open + 1..];
            if !number.is_empty() && !number.contains(char::is_whitespace) {
                return (body[..open].trim_end(), Some(number.to_string()));
            }
        }
    }
    (text, None)
}

fn is_transition(trimmed: &str) -> bool {
    trimmed.ends_with("TO:") && !trimmed.chars().any(char::is_lowercase)
}

fn character_cue(trimmed: &str, prev_blank: bool, next_blank: bool) -> Option<(DialogueBlock, bool)> {
    if !prev_blank || next_blank || trimmed.starts_with('!') {
        return None;
    }

    let (cue, dual) = match trimmed.strip_suffix('^') {
        Some(cue) => (cue.trim_end(), true),
        None => (trimmed, false),
    };
    let (cue, forced) = match cue.strip_prefix('@') {
        Some(cue) => (cue.trim_start(), true),
        None => (cue, false),
    };

    let (name, extension) = match cue.find('(') {
        Some(open) => (cue[..open].trim_end(), Some(cue[open..].trim().to_string())),
        None => (cue, None),
    };

    if name.is_empty() {
        return None;
    }
    if !forced
        && (name.chars().any(char::is_lowercase) || !name.chars().any(char::is_alphabetic))
    {
        return None;
    }

    Some((
        DialogueBlock {
            character: name.to_string(),
            extension,
            parts: Vec::new(),
        },
        dual,
    ))
}

fn dialogue_part(line: &str) -> DialoguePart {
    if line == "  " {
        return DialoguePart::Line(String::new());
    }
    let trimmed = line.trim();
    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        DialoguePart::Parenthetical(trimmed.to_string())
    } else if let Some(rest) = trimmed.strip_prefix('~') {
        DialoguePart::Lyric(rest.trim().to_string())
    } else {
        DialoguePart::Line(trimmed.to_string())
    }
}

fn action_line(line: &str) -> String {
    let line = line.trim_end();
    match line.strip_prefix('!') {
        Some(rest) => rest.to_string(),
        None => line.to_string(),
    }
}

/// A `^` cue pairs with the dialogue block right before it; otherwise it stands alone.
fn push_dialogue(tokens: &mut Vec<Token>, block: DialogueBlock, dual: bool) {
    if dual {
        if let Some(Token::Dialogue(_)) = tokens.last() {
            if let Some(Token::Dialogue(left)) = tokens.pop() {
                tokens.push(Token::DualDialogue(left, block));
                return;
            }
        }
    }
    tokens.push(Token::Dialogue(block));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> Vec<Token> {
        lex(&normalize(text)).tokens
    }

    #[test]
    fn scene_headings_need_known_prefix_or_dot() {
        assert_eq!(
            body("INT. MESS - NIGHT\n"),
            vec![Token::SceneHeading {
                text: "INT. MESS - NIGHT".to_string(),
                number: None,
            }]
        );
        assert_eq!(
            body(".BRIDGE\n"),
            vec![Token::SceneHeading {
                text: "BRIDGE".to_string(),
                number: None,
            }]
        );
        assert_eq!(
            body("int/ext car - moving #12A#\n"),
            vec![Token::SceneHeading {
                text: "int/ext car - moving".to_string(),
                number: Some("12A".to_string()),
            }]
        );
        assert!(matches!(body("INTERIOR DESIGN\n")[0], Token::Action(_)));
        assert!(matches!(body("...and then\n")[0], Token::Action(_)));
    }

    #[test]
    fn cue_followed_by_dialogue_and_parenthetical() {
        let tokens = body("KANE (V.O.)\n(grimacing)\nFirst thing.\nThen food.\n");
        assert_eq!(
            tokens,
            vec![Token::Dialogue(DialogueBlock {
                character: "KANE".to_string(),
                extension: Some("(V.O.)".to_string()),
                parts: vec![
                    DialoguePart::Parenthetical("(grimacing)".to_string()),
                    DialoguePart::Line("First thing.".to_string()),
                    DialoguePart::Line("Then food.".to_string()),
                ],
            })]
        );
    }

    #[test]
    fn uppercase_line_without_following_text_is_action() {
        assert!(matches!(body("PAUSE.\n")[0], Token::Action(_)));
        assert!(matches!(body("Pause.\n\nKANE\n")[0], Token::Action(_)));
    }

    #[test]
    fn forced_character_allows_lowercase() {
        let tokens = body("@McCLANE\nYippee.\n");
        match &tokens[0] {
            Token::Dialogue(block) => assert_eq!(block.character, "McCLANE"),
            other => panic!("unexpected token: {other:?}"),
        }
    }

    #[test]
    fn caret_pairs_with_previous_dialogue() {
        let tokens = body("BRICK\nScrew retirement.\n\nSTEEL ^\nScrew retirement.\n");
        assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Token::DualDialogue(left, right) => {
                assert_eq!(left.character, "BRICK");
                assert_eq!(right.character, "STEEL");
            }
            other => panic!("unexpected token: {other:?}"),
        }
    }

    #[test]
    fn two_spaces_keep_dialogue_open() {
        let tokens = body("RIPLEY\nWhat's wrong?\n  \nKane?\n");
        match &tokens[0] {
            Token::Dialogue(block) => assert_eq!(block.parts.len(), 3),
            other => panic!("unexpected token: {other:?}"),
        }
    }

    #[test]
    fn transitions_centered_and_breaks() {
        assert_eq!(
            body("Kane dies.\n\nCUT TO:\n\nINT. BRIDGE\n")[1],
            Token::Transition("CUT TO:".to_string())
        );
        assert_eq!(
            body("> FADE OUT.\n")[0],
            Token::Transition("FADE OUT.".to_string())
        );
        assert_eq!(
            body("> THE END <\n")[0],
            Token::Centered("THE END".to_string())
        );
        assert_eq!(body("===\n")[0], Token::PageBreak);
    }

    #[test]
    fn outline_elements() {
        assert_eq!(
            body("## Act Two\n\n= Kane gets sick\n"),
            vec![
                Token::Section {
                    depth: 2,
                    text: "Act Two".to_string(),
                },
                Token::Synopsis("Kane gets sick".to_string()),
            ]
        );
    }

    #[test]
    fn action_paragraph_keeps_lines_and_forced_marker() {
        assert_eq!(
            body("!SUDDENLY Kane grimaces.\nHe coughs.\n"),
            vec![Token::Action(vec![
                "SUDDENLY Kane grimaces.".to_string(),
                "He coughs.".to_string(),
            ])]
        );
    }

    #[test]
    fn title_page_with_indented_values() {
        let script = lex(&normalize("Title:\n    Alien\nAuthor: Dan O'Bannon\n\nINT. MESS\n"));
        assert_eq!(script.title_page.entries.len(), 2);
        assert_eq!(script.title_page.get("title").unwrap().lines, vec!["Alien"]);
        assert_eq!(
            script.title_page.get("AUTHOR").unwrap().lines,
            vec!["Dan O'Bannon"]
        );
        assert_eq!(script.tokens.len(), 1);
    }

    #[test]
    fn boneyard_and_notes_are_removed() {
        let text = normalize("Kane /* cut this\nline */eats.\r\n");
        assert_eq!(text, "Kane eats.\n");
        assert_eq!(prepare_notes("Kane [[maybe\nnot]] eats.", false), "Kane  eats.");
        assert_eq!(
            prepare_notes("Kane [[maybe\nnot]] eats.", true),
            "Kane [[maybe not]] eats."
        );
    }

    #[test]
    fn empty_document_has_no_tokens() {
        assert_eq!(lex(&normalize("")), Script::default());
    }
}
