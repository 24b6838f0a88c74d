//! Primitive parsers: constants, failures, single tokens, token sequences and the
//! parse-state accessors.

use std::fmt;
use std::marker::PhantomData;

use super::combinators::Map;
use super::core::{ParseState, Parser, Step};
use super::error::{Message, ParseError};
use crate::position::SourcePosition;
use crate::stream::Stream;

/// Succeeds with a clone of `value` without consuming input.
#[derive(Clone)]
pub struct Pure<O> {
    value: O,
}

impl<O> Pure<O> {
    pub fn new(value: O) -> Self {
        Self { value }
    }
}

impl<S, U, O> Parser<S, U, O> for Pure<O>
where
    S: Stream,
    U: Clone,
    O: Clone,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        Step::empty_ok(self.value.clone(), state.clone(), state.unknown_error())
    }
}

/// Fails without consuming and without saying why.
pub struct Zero<O> {
    _phantom: PhantomData<O>,
}

impl<O> Zero<O> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<O> Default for Zero<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for Zero<O> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S: Stream, U, O> Parser<S, U, O> for Zero<O> {
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        Step::empty_error(state.unknown_error())
    }
}

/// Fails without consuming, with a fixed message.
#[derive(Clone)]
pub struct Fail<O> {
    message: Message,
    _phantom: PhantomData<O>,
}

impl<O> Fail<O> {
    /// A failure carrying a `Generic` message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_message(Message::Generic(message.into()))
    }

    /// A failure carrying an `Unexpected` message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::with_message(Message::Unexpected(message.into()))
    }

    fn with_message(message: Message) -> Self {
        Self {
            message,
            _phantom: PhantomData,
        }
    }
}

impl<S: Stream, U, O> Parser<S, U, O> for Fail<O> {
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        Step::empty_error(ParseError::new(
            state.position.clone(),
            self.message.clone(),
        ))
    }
}

/// Signature of the user-value update run by [`TokenPrim`] after a token is accepted.
pub type UserUpdate<S, U> = fn(&SourcePosition, &<S as Stream>::Token, &S, &U) -> U;

/// Accepts a single token for which `test` returns `Some`.
///
/// * end of input fails empty with `SystemUnexpected("")`
/// * a rejected token fails empty with `SystemUnexpected(token)`
/// * an accepted token succeeds consumed; `next_position` computes the new position
///   from the current one, the token and the rest of the input
#[derive(Clone)]
pub struct TokenPrim<N, W, T> {
    next_position: N,
    update_user: Option<W>,
    test: T,
}

impl<N, W, T> TokenPrim<N, W, T> {
    pub fn new(next_position: N, update_user: Option<W>, test: T) -> Self {
        Self {
            next_position,
            update_user,
            test,
        }
    }
}

impl<S, U, O, N, W, T> Parser<S, U, O> for TokenPrim<N, W, T>
where
    S: Stream,
    S::Token: fmt::Display,
    U: Clone,
    N: Fn(&SourcePosition, &S::Token, &S) -> SourcePosition,
    W: Fn(&SourcePosition, &S::Token, &S, &U) -> U,
    T: Fn(&S::Token) -> Option<O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        let Some((token, rest)) = state.input.uncons() else {
            return Step::empty_error(ParseError::new(
                state.position.clone(),
                Message::SystemUnexpected(String::new()),
            ));
        };
        let Some(value) = (self.test)(&token) else {
            return Step::empty_error(ParseError::new(
                state.position.clone(),
                Message::SystemUnexpected(token.to_string()),
            ));
        };

        let position = (self.next_position)(&state.position, &token, &rest);
        let user = match &self.update_user {
            Some(update) => update(&state.position, &token, &rest, &state.user),
            None => state.user.clone(),
        };
        let error = ParseError::unknown(position.clone());
        Step::consumed_ok(value, ParseState::new(rest, position, user), error)
    }
}

/// Matches an exact token sequence.
///
/// A mismatch on the first token fails empty; a later mismatch fails consumed. Both
/// report the position where the sequence started, with the offending token and the
/// rendered sequence as expectation.
#[derive(Clone)]
pub struct Tokens<T, R, N> {
    expected: Vec<T>,
    show: R,
    next_position: N,
}

impl<T, R, N> Tokens<T, R, N> {
    pub fn new(show: R, next_position: N, expected: Vec<T>) -> Self {
        Self {
            expected,
            show,
            next_position,
        }
    }
}

impl<S, U, T, R, N> Parser<S, U, Vec<T>> for Tokens<T, R, N>
where
    S: Stream<Token = T>,
    U: Clone,
    T: Clone + PartialEq + fmt::Display,
    R: Fn(&[T]) -> String,
    N: Fn(&SourcePosition, &[T]) -> SourcePosition,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Vec<T>> {
        if self.expected.is_empty() {
            return Step::empty_ok(Vec::new(), state.clone(), state.unknown_error());
        }

        let mismatch = |found: String| {
            ParseError::new(state.position.clone(), Message::SystemUnexpected(found))
                .set_message(Message::Expected((self.show)(self.expected.as_slice())))
        };

        let mut input = state.input.clone();
        for (index, wanted) in self.expected.iter().enumerate() {
            let error = match input.uncons() {
                Some((token, rest)) if token == *wanted => {
                    input = rest;
                    continue;
                }
                Some((token, _)) => mismatch(token.to_string()),
                None => mismatch(String::new()),
            };
            return if index == 0 {
                Step::empty_error(error)
            } else {
                Step::consumed_error(error)
            };
        }

        let position = (self.next_position)(&state.position, self.expected.as_slice());
        let error = ParseError::unknown(position.clone());
        Step::consumed_ok(
            self.expected.clone(),
            ParseState::new(input, position, state.user.clone()),
            error,
        )
    }
}

/// Replaces the parse state with `f(state)` and returns the new state.
#[derive(Clone)]
pub struct UpdateState<F> {
    f: F,
}

impl<F> UpdateState<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<S, U, F> Parser<S, U, ParseState<S, U>> for UpdateState<F>
where
    S: Stream,
    U: Clone,
    F: Fn(ParseState<S, U>) -> ParseState<S, U>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, ParseState<S, U>> {
        let updated = (self.f)(state.clone());
        let error = updated.unknown_error();
        Step::empty_ok(updated.clone(), updated, error)
    }
}

pub fn get_state<S: Stream, U: Clone>() -> impl Parser<S, U, ParseState<S, U>> + Clone {
    UpdateState::new(|state: ParseState<S, U>| state)
}

pub fn set_state<S: Stream, U: Clone>(
    replacement: ParseState<S, U>,
) -> impl Parser<S, U, ParseState<S, U>> + Clone {
    UpdateState::new(move |_: ParseState<S, U>| replacement.clone())
}

pub fn get_position<S: Stream, U: Clone>() -> impl Parser<S, U, SourcePosition> + Clone {
    Map::new(get_state(), |state: ParseState<S, U>| state.position)
}

pub fn set_position<S: Stream, U: Clone>(
    position: SourcePosition,
) -> impl Parser<S, U, ()> + Clone {
    let update = UpdateState::new(move |state: ParseState<S, U>| ParseState {
        position: position.clone(),
        ..state
    });
    Map::new(update, |_: ParseState<S, U>| ())
}

pub fn get_input<S: Stream, U: Clone>() -> impl Parser<S, U, S> + Clone {
    Map::new(get_state(), |state: ParseState<S, U>| state.input)
}

pub fn set_input<S: Stream, U: Clone>(input: S) -> impl Parser<S, U, ()> + Clone {
    let update = UpdateState::new(move |state: ParseState<S, U>| ParseState {
        input: input.clone(),
        ..state
    });
    Map::new(update, |_: ParseState<S, U>| ())
}

pub fn get_user<S: Stream, U: Clone>() -> impl Parser<S, U, U> + Clone {
    Map::new(get_state(), |state: ParseState<S, U>| state.user)
}

pub fn put_user<S: Stream, U: Clone>(user: U) -> impl Parser<S, U, ()> + Clone {
    modify_user(move |_: U| user.clone())
}

pub fn modify_user<S, U, F>(f: F) -> impl Parser<S, U, ()> + Clone
where
    S: Stream,
    U: Clone,
    F: Fn(U) -> U + Clone,
{
    let update = UpdateState::new(move |state: ParseState<S, U>| ParseState {
        user: f(state.user),
        ..state
    });
    Map::new(update, |_: ParseState<S, U>| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::core::{Consumption, Outcome};
    use pretty_assertions::assert_eq;

    type Str = &'static str;
    type State = ParseState<Str, u32>;

    fn state(input: &'static str) -> State {
        ParseState::new(input, SourcePosition::initial("t"), 0)
    }

    fn next_char(position: &SourcePosition, token: &char, _: &&'static str) -> SourcePosition {
        position.update_char(*token)
    }

    #[test]
    fn test_pure_and_zero() {
        let s = state("abc");
        let step = Parser::<_, _, i32>::parse(&Pure::new(7), &s);
        assert_eq!(step, Step::empty_ok(7, s.clone(), s.unknown_error()));

        let step = Parser::<_, _, i32>::parse(&Zero::new(), &s);
        assert_eq!(step, Step::empty_error(s.unknown_error()));
    }

    #[test]
    fn test_fail_messages() {
        let s = state("abc");
        let step = Parser::<_, _, ()>::parse(&Fail::new("bad"), &s);
        assert_eq!(
            step.into_inner().error().messages(),
            &[Message::Generic("bad".into())]
        );

        let step = Parser::<_, _, ()>::parse(&Fail::unexpected("x"), &s);
        assert_eq!(
            step.into_inner().error().messages(),
            &[Message::Unexpected("x".into())]
        );
    }

    #[test]
    fn test_token_prim() {
        let digit = TokenPrim::new(
            next_char,
            None::<UserUpdate<&'static str, u32>>,
            |c: &char| c.to_digit(10),
        );

        match digit.parse(&state("7x")) {
            Consumption::Consumed(Outcome::Success {
                value,
                state,
                error,
            }) => {
                assert_eq!(value, 7);
                assert_eq!(state.input, "x");
                assert_eq!(state.position, SourcePosition::new("t", 1, 2));
                assert!(error.is_unknown());
            }
            other => panic!("unexpected step: {:?}", other),
        }

        let step = digit.parse(&state("x"));
        assert!(!step.is_consumed());
        assert_eq!(
            step.into_inner().error().messages(),
            &[Message::SystemUnexpected("x".into())]
        );

        let step = digit.parse(&state(""));
        assert_eq!(
            step.into_inner().error().to_string(),
            "t(1, 1):\nunexpected end of input"
        );
    }

    #[test]
    fn test_token_prim_updates_user() {
        fn count(_: &SourcePosition, _: &char, _: &&'static str, user: &u32) -> u32 {
            user + 1
        }
        let any = TokenPrim::new(next_char, Some(count), |c: &char| Some(*c));
        match any.parse(&state("a")) {
            Consumption::Consumed(Outcome::Success { state, .. }) => assert_eq!(state.user, 1),
            other => panic!("unexpected step: {:?}", other),
        }
    }

    fn word(text: &str) -> impl Parser<Str, u32, Vec<char>> {
        fn show(tokens: &[char]) -> String {
            format!("{:?}", tokens.iter().collect::<String>())
        }
        fn advance(position: &SourcePosition, tokens: &[char]) -> SourcePosition {
            position.update_chars(tokens.iter().copied())
        }
        Tokens::new(show, advance, text.chars().collect())
    }

    #[test]
    fn test_tokens() {
        let step = word("let").parse(&state("let x"));
        assert!(step.is_consumed());
        let outcome = step.into_inner();
        assert_eq!(outcome.clone().into_result().unwrap(), vec!['l', 'e', 't']);
        if let Outcome::Success { state, .. } = outcome {
            assert_eq!(state.input, " x");
            assert_eq!(state.position.column(), 4);
        }
    }

    #[test]
    fn test_tokens_failure_consumption() {
        // 先頭の不一致は消費なし
        let step = word("let").parse(&state("var"));
        assert!(!step.is_consumed());
        assert_eq!(
            step.into_inner().error().messages(),
            &[
                Message::Expected("\"let\"".into()),
                Message::SystemUnexpected("v".into())
            ]
        );

        // 途中の不一致は消費あり、位置は開始位置
        let step = word("let").parse(&state("lex"));
        assert!(step.is_consumed());
        let error = step.into_inner().error().clone();
        assert_eq!(error.position(), &SourcePosition::new("t", 1, 1));
        assert_eq!(
            error.to_string(),
            "t(1, 1):\nexpecting \"let\"\nunexpected x"
        );

        let step = word("let").parse(&state("le"));
        assert!(step.is_consumed());
        assert_eq!(
            step.into_inner().error().messages()[1],
            Message::SystemUnexpected(String::new())
        );
    }

    #[test]
    fn test_empty_tokens_succeed_empty() {
        let s = state("abc");
        let step = word("").parse(&s);
        assert_eq!(step, Step::empty_ok(Vec::new(), s.clone(), s.unknown_error()));
    }

    #[test]
    fn test_state_accessors() {
        let s = state("abc");

        let step = get_position::<Str, u32>().parse(&s);
        assert_eq!(
            step.into_inner().into_result().unwrap(),
            SourcePosition::initial("t")
        );

        let moved = SourcePosition::new("t", 4, 2);
        match set_position::<Str, u32>(moved.clone()).parse(&s) {
            Consumption::Empty(Outcome::Success { state, error, .. }) => {
                assert_eq!(state.position, moved);
                assert_eq!(error.position(), &moved);
            }
            other => panic!("unexpected step: {:?}", other),
        }

        let step = set_input::<Str, u32>("zz").parse(&s);
        if let Outcome::Success { state, .. } = step.into_inner() {
            assert_eq!(state.input, "zz");
        }

        let step = modify_user::<Str, u32, _>(|user: u32| user + 41).parse(&s);
        if let Outcome::Success { state, .. } = step.into_inner() {
            let user = get_user::<Str, u32>().parse(&state).into_inner();
            assert_eq!(user.into_result().unwrap(), 41);
        }

        let replacement = state("q");
        let step = set_state(replacement.clone()).parse(&s);
        assert_eq!(step.into_inner().into_result().unwrap(), replacement);
        let input = get_input::<Str, u32>().parse(&s).into_inner();
        assert_eq!(input.into_result().unwrap(), "abc");
        let step = put_user::<Str, u32>(9).parse(&s);
        if let Outcome::Success { state, .. } = step.into_inner() {
            assert_eq!(state.user, 9);
        }
    }
}
