use thiserror::Error;

use crate::parser::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    // grammar defects, distinct from ordinary parse failures
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type ParsectResult<T> = Result<T, Error>;

/// A defect in the grammar itself rather than in the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A repeating combinator was given a body that succeeds on empty input.
    #[error("combinator '{combinator}' is applied to a parser that accepts an empty input")]
    EmptyLoop { combinator: &'static str },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read language definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse language definition: {0}")]
    Json(#[from] serde_json::Error),
}

/// Aborts the parse with [`GrammarError::EmptyLoop`] as the panic payload.
///
/// `run_checked` turns the payload back into [`Error::Grammar`].
pub(crate) fn empty_loop(combinator: &'static str) -> ! {
    let fault = GrammarError::EmptyLoop { combinator };
    tracing::error!(combinator, "{}", fault);
    std::panic::panic_any(fault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn test_empty_loop_payload() {
        let caught = panic::catch_unwind(|| empty_loop("many")).unwrap_err();
        let fault = caught.downcast::<GrammarError>().unwrap();
        assert_eq!(*fault, GrammarError::EmptyLoop { combinator: "many" });
        assert_eq!(
            fault.to_string(),
            "combinator 'many' is applied to a parser that accepts an empty input"
        );
    }

    #[test]
    fn test_error_conversions() {
        let error: Error = GrammarError::EmptyLoop { combinator: "many" }.into();
        assert!(matches!(error, Error::Grammar(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = ConfigError::from(json).into();
        assert!(error.to_string().starts_with("Config error: Failed to parse"));
    }
}
