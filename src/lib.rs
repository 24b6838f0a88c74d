//! # parsect
//!
//! A parser-combinator engine in the Parsec tradition. Every parser reports one of four
//! outcomes: it consumed input or not, and it succeeded or failed. Alternatives are only
//! tried after a failure that consumed nothing, so backtracking is explicit and happens
//! only under [`parser::combinators::Attempt`].
//!
//! ```
//! use parsect::character::{digit, parse_str};
//! use parsect::parser::prelude::many1;
//!
//! let digits = many1(digit::<&str, ()>());
//! assert_eq!(parse_str(&digits, "", "42x"), Ok(vec!['4', '2']));
//! ```

pub mod character;
pub mod error;
pub mod language;
pub mod parser;
pub mod position;
pub mod stream;

// Re-exports
pub use error::{ConfigError, Error, GrammarError, ParsectResult};
pub use language::{CharClass, LanguageDef, TokenParser};
pub use parser::{run, run_checked, Message, ParseError, ParseState, Parser};
pub use position::SourcePosition;
pub use stream::{Stream, TokenBuffer};
