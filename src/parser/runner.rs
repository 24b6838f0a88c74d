use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use super::core::{Continuations, ParseState, Parser, Step};
use super::error::ParseError;
use crate::error::{Error, GrammarError, ParsectResult};
use crate::position::SourcePosition;
use crate::stream::Stream;

/// Terminal continuations: each one packages the outcome with its consumption tag
/// and stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl<S, U, O> Continuations<S, U, O> for Terminal {
    type Output = Step<S, U, O>;

    fn consumed_ok(self, value: O, state: ParseState<S, U>, error: ParseError) -> Self::Output {
        Step::consumed_ok(value, state, error)
    }

    fn consumed_error(self, error: ParseError) -> Self::Output {
        Step::consumed_error(error)
    }

    fn empty_ok(self, value: O, state: ParseState<S, U>, error: ParseError) -> Self::Output {
        Step::empty_ok(value, state, error)
    }

    fn empty_error(self, error: ParseError) -> Self::Output {
        Step::empty_error(error)
    }
}

/// Runs `parser` over `stream`, starting at `(name, 1, 1)` with `user` as the user
/// value.
///
/// The whole stream does not have to be consumed; compose the grammar with `eof` to
/// require that. A grammar fault (a repeating combinator over a parser that accepts
/// empty input) panics; use [`run_checked`] to get it back as a value.
#[tracing::instrument(level = "debug", skip(parser, user, stream))]
pub fn run<S, U, O, P>(parser: &P, user: U, name: &str, stream: S) -> Result<O, ParseError>
where
    S: Stream,
    P: Parser<S, U, O> + ?Sized,
{
    let state = ParseState::new(stream, SourcePosition::initial(name), user);
    let reply = parser.parse(&state).resume(Terminal);
    let consumed = reply.is_consumed();

    match reply.into_inner().into_result() {
        Ok(value) => {
            debug!(consumed, "parse succeeded");
            Ok(value)
        }
        Err(error) => {
            debug!(consumed, position = %error.position(), "parse failed");
            trace!("{}", error);
            Err(error)
        }
    }
}

/// Like [`run`], but reports grammar faults as [`Error::Grammar`] instead of
/// unwinding.
pub fn run_checked<S, U, O, P>(parser: &P, user: U, name: &str, stream: S) -> ParsectResult<O>
where
    S: Stream,
    P: Parser<S, U, O> + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| run(parser, user, name, stream))) {
        Ok(result) => Ok(result?),
        Err(payload) => match payload.downcast::<GrammarError>() {
            Ok(fault) => Err(Error::Grammar(*fault)),
            Err(payload) => panic::resume_unwind(payload),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::core::{Consumption, Outcome};
    use crate::parser::error::Message;
    use pretty_assertions::assert_eq;

    type State = ParseState<&'static str, ()>;

    fn letter(st: &State) -> Step<&'static str, (), char> {
        match st.input.uncons() {
            Some((c, rest)) if c.is_alphabetic() => {
                let position = st.position.update_char(c);
                Step::consumed_ok(
                    c,
                    ParseState::new(rest, position.clone(), ()),
                    ParseError::unknown(position),
                )
            }
            _ => Step::empty_error(ParseError::new(
                st.position.clone(),
                Message::Expected("letter".into()),
            )),
        }
    }

    #[test]
    fn test_run_projects_outcome() {
        assert_eq!(run(&letter, (), "input", "ab"), Ok('a'));

        let error = run(&letter, (), "input", "1").unwrap_err();
        assert_eq!(error.position(), &SourcePosition::initial("input"));
        assert_eq!(error.to_string(), "input(1, 1):\nexpecting letter");
    }

    #[test]
    fn test_terminal_keeps_consumption_tag() {
        let state = ParseState::new("ab", SourcePosition::initial(""), ());
        match letter.parse_with(&state, Terminal) {
            Consumption::Consumed(Outcome::Success { value, state, .. }) => {
                assert_eq!(value, 'a');
                assert_eq!(state.input, "b");
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_run_checked_wraps_parse_errors() {
        let error = run_checked(&letter, (), "", "1").unwrap_err();
        assert!(matches!(error, Error::Parse(_)));
    }
}
