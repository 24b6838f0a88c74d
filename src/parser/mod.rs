pub mod combinators;
pub mod core;
pub mod derived;
pub mod error;
pub mod prelude;
pub mod primitives;
pub mod runner;

pub use self::core::{
    BoxedParser, ByRef, Consumption, Continuations, Outcome, ParseState, Parser, Step,
};
pub use self::error::{Message, ParseError};
pub use self::runner::{run, run_checked};
