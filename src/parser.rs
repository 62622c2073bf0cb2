//! Fountain parsing engine.
//!
//! Raw screenplay text goes through three stages: normalization (line endings, boneyard,
//! notes), line classification into [`Token`]s, and HTML emission. The render bridge only
//! sees the [`ScreenplayParser`] trait and obtains an instance through a [`ParserLoader`].

pub mod engine;
pub mod html;
pub mod inline;
pub mod lexer;
pub mod loader;

pub use engine::{FountainParser, ScreenplayParser};
pub use lexer::{DialogueBlock, DialoguePart, Script, TitlePage, Token};
pub use loader::{FountainLoader, ParserHandle, ParserLoader};
