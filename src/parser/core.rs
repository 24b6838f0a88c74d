//! # Core Parser Definitions
//!
//! This module defines the parser interface and the values threaded through a parse.
//!
//! ## The Four-Way Protocol
//!
//! Every parser action reports exactly one of four outcomes:
//!
//! | outcome | meaning |
//! |---|---|
//! | consumed ok | succeeded after reading at least one token |
//! | consumed error | failed after reading at least one token |
//! | empty ok | succeeded without reading input |
//! | empty error | failed without reading input |
//!
//! The outcome is a [`Step`]: an [`Outcome`] wrapped in a [`Consumption`] tag. Each
//! of the four cases plays the role of one continuation of a continuation-passing
//! parser; combinators are defined entirely by how they rewire the four cases of the
//! parsers they wrap. Callers who prefer to drive a parser through callbacks can use
//! [`Parser::parse_with`] with an implementation of [`Continuations`].
//!
//! Alternatives are only tried after an *empty error*. Once a branch has consumed
//! input its outcome is final, which is what keeps backtracking explicit.

use std::mem;

use super::error::ParseError;
use crate::error::empty_loop;
use crate::position::SourcePosition;
use crate::stream::Stream;

/// The context threaded through a parse: remaining input, position and user value.
///
/// States are never mutated in place; each step hands the next one a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseState<S, U> {
    /// The input not yet consumed.
    pub input: S,
    /// The position of the next token.
    pub position: SourcePosition,
    /// Client data carried alongside the parse; opaque to the engine.
    pub user: U,
}

impl<S, U> ParseState<S, U> {
    pub fn new(input: S, position: SourcePosition, user: U) -> Self {
        Self {
            input,
            position,
            user,
        }
    }

    /// An unknown error at the current position.
    pub fn unknown_error(&self) -> ParseError {
        ParseError::unknown(self.position.clone())
    }
}

/// The result of a single parser step, before consumption is taken into account.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S, U, O> {
    /// The parser produced `value` and left `state` behind.
    ///
    /// `error` carries what abandoned alternatives had to say, to be merged into a
    /// later failure at the same position.
    Success {
        value: O,
        state: ParseState<S, U>,
        error: ParseError,
    },
    Failure(ParseError),
}

impl<S, U, O> Outcome<S, U, O> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn error(&self) -> &ParseError {
        match self {
            Outcome::Success { error, .. } | Outcome::Failure(error) => error,
        }
    }

    /// Merges `prior` in front of this outcome's error.
    pub fn merge_error(self, prior: ParseError) -> Self {
        match self {
            Outcome::Success {
                value,
                state,
                error,
            } => Outcome::Success {
                value,
                state,
                error: prior.merge(error),
            },
            Outcome::Failure(error) => Outcome::Failure(prior.merge(error)),
        }
    }

    pub fn map<B>(self, f: impl FnOnce(O) -> B) -> Outcome<S, U, B> {
        match self {
            Outcome::Success {
                value,
                state,
                error,
            } => Outcome::Success {
                value: f(value),
                state,
                error,
            },
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn map_error(self, f: impl FnOnce(ParseError) -> ParseError) -> Self {
        match self {
            Outcome::Success {
                value,
                state,
                error,
            } => Outcome::Success {
                value,
                state,
                error: f(error),
            },
            Outcome::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    /// Drops the state and keeps either the value or the error.
    pub fn into_result(self) -> Result<O, ParseError> {
        match self {
            Outcome::Success { value, .. } => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

/// Tags a value with whether the step that produced it advanced the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption<T> {
    Consumed(T),
    Empty(T),
}

impl<T> Consumption<T> {
    pub fn tagged(consumed: bool, value: T) -> Self {
        if consumed {
            Consumption::Consumed(value)
        } else {
            Consumption::Empty(value)
        }
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self, Consumption::Consumed(_))
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Consumption::Consumed(value) | Consumption::Empty(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Consumption::Consumed(value) | Consumption::Empty(value) => value,
        }
    }

    /// Transforms the wrapped value, keeping the tag.
    pub fn map<X>(self, f: impl FnOnce(T) -> X) -> Consumption<X> {
        match self {
            Consumption::Consumed(value) => Consumption::Consumed(f(value)),
            Consumption::Empty(value) => Consumption::Empty(f(value)),
        }
    }
}

/// One of the four outcomes a parser action reports.
pub type Step<S, U, O> = Consumption<Outcome<S, U, O>>;

impl<S, U, O> Consumption<Outcome<S, U, O>> {
    pub fn consumed_ok(value: O, state: ParseState<S, U>, error: ParseError) -> Self {
        Consumption::Consumed(Outcome::Success {
            value,
            state,
            error,
        })
    }

    pub fn empty_ok(value: O, state: ParseState<S, U>, error: ParseError) -> Self {
        Consumption::Empty(Outcome::Success {
            value,
            state,
            error,
        })
    }

    pub fn consumed_error(error: ParseError) -> Self {
        Consumption::Consumed(Outcome::Failure(error))
    }

    pub fn empty_error(error: ParseError) -> Self {
        Consumption::Empty(Outcome::Failure(error))
    }

    /// Applies `f` to the value of either success case.
    pub fn map_value<B>(self, f: impl FnOnce(O) -> B) -> Step<S, U, B> {
        self.map(|outcome| outcome.map(f))
    }

    /// Merges `prior` in front of the step's error, keeping the tag.
    pub fn merge_error(self, prior: ParseError) -> Self {
        self.map(|outcome| outcome.merge_error(prior))
    }

    /// Sequences a second step after a successful one (monadic bind).
    ///
    /// If this step consumed, the composite is consumed whatever the second step does.
    /// If it did not, the second step's tag is kept and, when that step is empty too,
    /// its error is merged with this step's error.
    pub fn and_then<B, F>(self, f: F) -> Step<S, U, B>
    where
        F: FnOnce(O, &ParseState<S, U>) -> Step<S, U, B>,
    {
        let (consumed, value, state, error) = match self {
            Consumption::Consumed(Outcome::Success {
                value,
                state,
                error,
            }) => (true, value, state, error),
            Consumption::Empty(Outcome::Success {
                value,
                state,
                error,
            }) => (false, value, state, error),
            Consumption::Consumed(Outcome::Failure(error)) => {
                return Consumption::consumed_error(error)
            }
            Consumption::Empty(Outcome::Failure(error)) => return Consumption::empty_error(error),
        };

        match f(value, &state) {
            Consumption::Consumed(outcome) => Consumption::Consumed(outcome),
            Consumption::Empty(outcome) => {
                Consumption::tagged(consumed, outcome.merge_error(error))
            }
        }
    }

    /// Tries an alternative after an empty error (choice).
    ///
    /// Every other case is returned untouched. When the alternative is empty as well,
    /// its error is merged with this step's error.
    pub fn or_else<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        match self {
            Consumption::Empty(Outcome::Failure(error)) => match f() {
                Consumption::Empty(outcome) => Consumption::Empty(outcome.merge_error(error)),
                consumed => consumed,
            },
            other => other,
        }
    }

    /// Hands the step to the matching continuation.
    pub fn resume<K>(self, continuations: K) -> K::Output
    where
        K: Continuations<S, U, O>,
    {
        match self {
            Consumption::Consumed(Outcome::Success {
                value,
                state,
                error,
            }) => continuations.consumed_ok(value, state, error),
            Consumption::Consumed(Outcome::Failure(error)) => continuations.consumed_error(error),
            Consumption::Empty(Outcome::Success {
                value,
                state,
                error,
            }) => continuations.empty_ok(value, state, error),
            Consumption::Empty(Outcome::Failure(error)) => continuations.empty_error(error),
        }
    }
}

/// The four callbacks of a continuation-passing parse. Exactly one is invoked.
pub trait Continuations<S, U, O> {
    type Output;

    fn consumed_ok(self, value: O, state: ParseState<S, U>, error: ParseError) -> Self::Output;
    fn consumed_error(self, error: ParseError) -> Self::Output;
    fn empty_ok(self, value: O, state: ParseState<S, U>, error: ParseError) -> Self::Output;
    fn empty_error(self, error: ParseError) -> Self::Output;
}

/// Parser trait defines the core parsing interface.
///
/// A parser is a pure function of its input state: the same state always yields the
/// same [`Step`].
///
/// # Type Parameters
///
/// * `S` - The stream type
/// * `U` - The user value type
/// * `O` - The output value type
pub trait Parser<S: Stream, U, O> {
    /// Runs the parser against `state`.
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O>;

    /// Runs the parser and passes its outcome to the matching continuation.
    fn parse_with<K>(&self, state: &ParseState<S, U>, continuations: K) -> K::Output
    where
        Self: Sized,
        K: Continuations<S, U, O>,
    {
        self.parse(state).resume(continuations)
    }
}

impl<S, U, O, F> Parser<S, U, O> for F
where
    S: Stream,
    F: Fn(&ParseState<S, U>) -> Step<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        self(state)
    }
}

/// A boxed parser, for storing heterogeneous alternatives.
pub type BoxedParser<'a, S, U, O> = Box<dyn Parser<S, U, O> + 'a>;

/// Uses a borrowed parser (or a boxed one, through `&*boxed`) where a parser value is
/// expected.
pub struct ByRef<'p, P: ?Sized> {
    parser: &'p P,
}

impl<'p, P: ?Sized> ByRef<'p, P> {
    pub fn new(parser: &'p P) -> Self {
        Self { parser }
    }
}

impl<P: ?Sized> Clone for ByRef<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized> Copy for ByRef<'_, P> {}

impl<S, U, O, P> Parser<S, U, O> for ByRef<'_, P>
where
    S: Stream,
    P: Parser<S, U, O> + ?Sized,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        self.parser.parse(state)
    }
}

/// The failure of a partially built composite, with its consumption tag.
pub(crate) type Failure = Consumption<ParseError>;

pub(crate) fn failure_step<S, U, O>(failure: Failure) -> Step<S, U, O> {
    failure.map(Outcome::Failure)
}

/// Accumulates a sequence of steps with the same rules as [`Step::and_then`].
///
/// Iterative combinators use this instead of nesting binds, so that long inputs do not
/// grow the call stack.
pub(crate) struct Progress<S, U> {
    consumed: bool,
    state: ParseState<S, U>,
    error: ParseError,
}

impl<S: Stream, U: Clone> Progress<S, U> {
    pub(crate) fn new(state: &ParseState<S, U>) -> Self {
        Self {
            consumed: false,
            state: state.clone(),
            error: state.unknown_error(),
        }
    }

    pub(crate) fn state(&self) -> &ParseState<S, U> {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn has_consumed(&self) -> bool {
        self.consumed
    }

    fn merge_error(&mut self, error: ParseError) {
        let prior = mem::replace(&mut self.error, self.state.unknown_error());
        self.error = prior.merge(error);
    }

    /// Feeds the next step into the sequence, returning its value.
    pub(crate) fn step<O>(&mut self, step: Step<S, U, O>) -> Result<O, Failure> {
        match step {
            Consumption::Consumed(Outcome::Success {
                value,
                state,
                error,
            }) => {
                self.consumed = true;
                self.state = state;
                self.error = error;
                Ok(value)
            }
            Consumption::Empty(Outcome::Success {
                value,
                state,
                error,
            }) => {
                self.state = state;
                self.merge_error(error);
                Ok(value)
            }
            Consumption::Consumed(Outcome::Failure(error)) => Err(Consumption::Consumed(error)),
            Consumption::Empty(Outcome::Failure(error)) => Err(Consumption::tagged(
                self.consumed,
                self.error.clone().merge(error),
            )),
        }
    }

    /// Runs `parser` at the current state and feeds its step in.
    pub(crate) fn run<O, P>(&mut self, parser: &P) -> Result<O, Failure>
    where
        P: Parser<S, U, O> + ?Sized,
    {
        let step = parser.parse(&self.state);
        self.step(step)
    }

    /// Like [`Progress::step`], but an empty error falls back to "no value" at the
    /// current state, as `step <|> pure` would.
    pub(crate) fn recover<O>(&mut self, step: Step<S, U, O>) -> Result<Option<O>, Failure> {
        match step {
            Consumption::Empty(Outcome::Failure(error)) => {
                self.merge_error(error);
                Ok(None)
            }
            step => self.step(step).map(Some),
        }
    }

    pub(crate) fn run_optional<O, P>(&mut self, parser: &P) -> Result<Option<O>, Failure>
    where
        P: Parser<S, U, O> + ?Sized,
    {
        let step = parser.parse(&self.state);
        self.recover(step)
    }

    /// Falls back to the current state after a failed branch that consumed nothing.
    pub(crate) fn fallback(&mut self, failure: Failure) -> Result<(), Failure> {
        match failure {
            Consumption::Empty(error) => {
                self.merge_error(error);
                Ok(())
            }
            consumed => Err(consumed),
        }
    }

    /// Starts a sub-sequence at the current state.
    pub(crate) fn branch(&self) -> Progress<S, U> {
        Progress::new(&self.state)
    }

    /// Feeds a completed sub-sequence in as a single step.
    pub(crate) fn absorb(&mut self, other: Progress<S, U>) {
        if other.consumed {
            self.consumed = true;
            self.state = other.state;
            self.error = other.error;
        } else {
            self.state = other.state;
            self.merge_error(other.error);
        }
    }

    /// Faults if a loop body succeeded without consuming input.
    pub(crate) fn guard(&self, combinator: &'static str) {
        if !self.consumed {
            empty_loop(combinator);
        }
    }

    pub(crate) fn finish<O>(self, value: O) -> Step<S, U, O> {
        Consumption::tagged(
            self.consumed,
            Outcome::Success {
                value,
                state: self.state,
                error: self.error,
            },
        )
    }
}
