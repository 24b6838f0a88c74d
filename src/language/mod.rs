//! # Language Definitions
//!
//! A [`LanguageDef`] describes the lexical conventions of a language: comment markers,
//! identifier and operator characters, reserved words. A [`TokenParser`] turns one
//! into lexeme parsers that skip trailing white space and comments.
//!
//! Definitions can be written in code or loaded from JSON:
//!
//! ```json
//! {
//!   "comment_line": "#",
//!   "reserved_names": ["def", "return"],
//!   "case_sensitive": false
//! }
//! ```
//!
//! Omitted fields take their defaults.

mod def;
mod token;

pub use def::{CharClass, LanguageDef};
pub use token::TokenParser;
