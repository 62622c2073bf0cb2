//! The parsing engine seen by the render bridge.

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::parser::html::{render_script, HtmlOptions};
use crate::parser::lexer::{self, Script};

/// A loaded screenplay-to-markup converter.
///
/// Implementations must be stateless across calls: the same input always yields the
/// same output, and one instance is shared read-only by every render request.
pub trait ScreenplayParser: Send + Sync {
    /// Convert raw screenplay text into HTML markup.
    ///
    /// The empty string is valid input. Errors are reserved for inputs outside the
    /// parser's documented contract.
    fn parse(&self, raw: &str) -> std::result::Result<String, ParseError>;

    /// Short engine description for status displays.
    fn name(&self) -> &str {
        "screenplay parser"
    }
}

/// Fountain-to-HTML parser.
///
/// # Contract
///
/// Every UTF-8 string is accepted except:
/// - text containing a NUL character (`ParseError::ControlCharacter`)
/// - text longer than `max_input_bytes` (`ParseError::InputTooLarge`)
#[derive(Debug, Clone)]
pub struct FountainParser {
    config: ParserConfig,
}

impl FountainParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Validate and lex a document without producing markup.
    pub fn tokenize(&self, raw: &str) -> std::result::Result<Script, ParseError> {
        self.check_input(raw)?;
        let text = lexer::normalize(raw);
        let text = lexer::prepare_notes(&text, self.config.show_notes);
        Ok(lexer::lex(&text))
    }

    fn check_input(&self, raw: &str) -> std::result::Result<(), ParseError> {
        if raw.len() > self.config.max_input_bytes {
            return Err(ParseError::InputTooLarge {
                size: raw.len(),
                limit: self.config.max_input_bytes,
            });
        }

        let bytes = raw.as_bytes();
        if let Some(pos) = memchr::memchr(0, bytes) {
            // Line breaks are counted the way `normalize` folds them: CRLF, CR or LF.
            let prefix = &bytes[..pos];
            let mut line = 1;
            let mut line_start = 0;
            for at in memchr::memchr2_iter(b'\n', b'\r', prefix) {
                if prefix[at] == b'\r' && prefix.get(at + 1) == Some(&b'\n') {
                    continue;
                }
                line += 1;
                line_start = at + 1;
            }
            return Err(ParseError::ControlCharacter {
                code: 0,
                line,
                column: raw[line_start..pos].chars().count() + 1,
            });
        }
        Ok(())
    }
}

impl Default for FountainParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ScreenplayParser for FountainParser {
    fn parse(&self, raw: &str) -> std::result::Result<String, ParseError> {
        let script = self.tokenize(raw)?;
        Ok(render_script(
            &script,
            HtmlOptions {
                show_outline: self.config.show_outline,
                show_notes: self.config.show_notes,
            },
        ))
    }

    fn name(&self) -> &str {
        "fountain"
    }
}
