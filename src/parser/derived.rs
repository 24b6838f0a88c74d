//! # Combinator Library
//!
//! Repetition, separation, chaining and lookahead, built from the core operations.
//!
//! The loops here never recurse: each one drives a [`Progress`] accumulator, which
//! applies the same consumption and error-merging rules as a chain of binds. Any loop
//! whose body can succeed without consuming input faults with
//! [`GrammarError::EmptyLoop`](crate::error::GrammarError).

use std::fmt;
use std::marker::PhantomData;

use super::combinators::{Attempt, Labels, Many, SkipMany, Skip, Then};
use super::core::{
    failure_step, BoxedParser, ByRef, Consumption, Outcome, ParseState, Parser, Progress, Step,
};
use super::error::{Message, ParseError};
use super::primitives::{TokenPrim, UserUpdate};
use crate::error::empty_loop;
use crate::position::SourcePosition;
use crate::stream::Stream;

fn prepend<A>(first: A, rest: Vec<A>) -> Vec<A> {
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(first);
    items.extend(rest);
    items
}

fn empty_list<S, U, A>(state: &ParseState<S, U>) -> Step<S, U, Vec<A>>
where
    S: Clone,
    U: Clone,
{
    Step::empty_ok(Vec::new(), state.clone(), state.unknown_error())
}

/// Tries each parser in order until one succeeds or consumes input.
///
/// Equivalent to folding `plus` over the list with a never-succeeding base case: an
/// empty list fails with an unknown error.
pub struct Choice<'a, S, U, O> {
    parsers: Vec<BoxedParser<'a, S, U, O>>,
}

impl<'a, S, U, O> Choice<'a, S, U, O> {
    pub fn new(parsers: Vec<BoxedParser<'a, S, U, O>>) -> Self {
        Self { parsers }
    }
}

impl<S: Stream, U, O> Parser<S, U, O> for Choice<'_, S, U, O> {
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        let mut error = state.unknown_error();
        for parser in &self.parsers {
            match parser.parse(state) {
                Consumption::Empty(Outcome::Failure(next)) => error = error.merge(next),
                Consumption::Empty(outcome) => {
                    return Consumption::Empty(outcome.merge_error(error))
                }
                consumed => return consumed,
            }
        }
        Step::empty_error(error)
    }
}

/// `parser`, or `default` when it fails without consuming.
#[derive(Clone)]
pub struct OptionOr<P, O> {
    parser: P,
    default: O,
}

impl<P, O> OptionOr<P, O> {
    pub fn new(default: O, parser: P) -> Self {
        Self { parser, default }
    }
}

impl<S, U, O, P> Parser<S, U, O> for OptionOr<P, O>
where
    S: Stream,
    U: Clone,
    O: Clone,
    P: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        self.parser.parse(state).or_else(|| {
            Step::empty_ok(self.default.clone(), state.clone(), state.unknown_error())
        })
    }
}

/// `Some(value)` when `parser` succeeds, `None` when it fails without consuming.
#[derive(Clone)]
pub struct OptionMaybe<P> {
    parser: P,
}

impl<P> OptionMaybe<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<S, U, A, P> Parser<S, U, Option<A>> for OptionMaybe<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Option<A>> {
        self.parser
            .parse(state)
            .map_value(Some)
            .or_else(|| Step::empty_ok(None, state.clone(), state.unknown_error()))
    }
}

/// Runs `parser` if it applies and discards its value. Fails only if `parser` fails
/// after consuming.
#[derive(Clone)]
pub struct Optional<P, A> {
    parser: P,
    _phantom: PhantomData<A>,
}

impl<P, A> Optional<P, A> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, P> Parser<S, U, ()> for Optional<P, A>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, ()> {
        self.parser
            .parse(state)
            .map_value(|_| ())
            .or_else(|| Step::empty_ok((), state.clone(), state.unknown_error()))
    }
}

/// `open`, then `parser`, then `close`; keeps the value of `parser`.
#[derive(Clone)]
pub struct Between<L, R, P, A, B> {
    open: L,
    close: R,
    parser: P,
    _phantom: PhantomData<(A, B)>,
}

impl<L, R, P, A, B> Between<L, R, P, A, B> {
    pub fn new(open: L, close: R, parser: P) -> Self {
        Self {
            open,
            close,
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, O, L, R, P> Parser<S, U, O> for Between<L, R, P, A, B>
where
    S: Stream,
    L: Parser<S, U, A>,
    R: Parser<S, U, B>,
    P: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        self.open.parse(state).and_then(|_, next| {
            self.parser
                .parse(next)
                .and_then(|value, next| self.close.parse(next).map_value(|_| value))
        })
    }
}

/// One or more occurrences of `parser`.
#[derive(Clone)]
pub struct Many1<P> {
    parser: P,
}

impl<P> Many1<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<S, U, A, P> Parser<S, U, Vec<A>> for Many1<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Vec<A>> {
        self.parser.parse(state).and_then(|first, next| {
            Many::<_, A>::many(ByRef::new(&self.parser))
                .parse(next)
                .map_value(|rest| prepend(first, rest))
        })
    }
}

/// One or more occurrences of `parser`, values discarded.
#[derive(Clone)]
pub struct SkipMany1<P, A> {
    parser: P,
    _phantom: PhantomData<A>,
}

impl<P, A> SkipMany1<P, A> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, P> Parser<S, U, ()> for SkipMany1<P, A>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, ()> {
        self.parser.parse(state).and_then(|_, next| {
            SkipMany::<_, A>::skip_many(ByRef::new(&self.parser)).parse(next)
        })
    }
}

/// Occurrences of `parser` separated by `separator`, with no trailing separator.
#[derive(Clone)]
pub struct SepBy<P, Sep, B> {
    parser: P,
    separator: Sep,
    allow_empty: bool,
    _phantom: PhantomData<B>,
}

impl<P, Sep, B> SepBy<P, Sep, B> {
    /// Zero or more occurrences.
    pub fn new(parser: P, separator: Sep) -> Self {
        Self::with_minimum(parser, separator, true)
    }

    /// One or more occurrences.
    pub fn one_or_more(parser: P, separator: Sep) -> Self {
        Self::with_minimum(parser, separator, false)
    }

    fn with_minimum(parser: P, separator: Sep, allow_empty: bool) -> Self {
        Self {
            parser,
            separator,
            allow_empty,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, Sep> Parser<S, U, Vec<A>> for SepBy<P, Sep, B>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
    Sep: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Vec<A>> {
        let step = self.parser.parse(state).and_then(|first, next| {
            let item =
                Then::<_, _, B>::new(ByRef::new(&self.separator), ByRef::new(&self.parser));
            Many::<_, A>::collecting(item, "sep_by")
                .parse(next)
                .map_value(|rest| prepend(first, rest))
        });
        if self.allow_empty {
            step.or_else(|| empty_list(state))
        } else {
            step
        }
    }
}

/// Occurrences of `parser`, each followed by `separator`.
#[derive(Clone)]
pub struct EndBy<P, Sep, B> {
    parser: P,
    separator: Sep,
    allow_empty: bool,
    _phantom: PhantomData<B>,
}

impl<P, Sep, B> EndBy<P, Sep, B> {
    /// Zero or more occurrences.
    pub fn new(parser: P, separator: Sep) -> Self {
        Self::with_minimum(parser, separator, true)
    }

    /// One or more occurrences.
    pub fn one_or_more(parser: P, separator: Sep) -> Self {
        Self::with_minimum(parser, separator, false)
    }

    fn with_minimum(parser: P, separator: Sep, allow_empty: bool) -> Self {
        Self {
            parser,
            separator,
            allow_empty,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, Sep> Parser<S, U, Vec<A>> for EndBy<P, Sep, B>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
    Sep: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Vec<A>> {
        let item = Skip::<_, _, B>::new(ByRef::new(&self.parser), ByRef::new(&self.separator));
        if self.allow_empty {
            return Many::<_, A>::collecting(item, "end_by").parse(state);
        }
        item.parse(state).and_then(|first, next| {
            Many::<_, A>::collecting(ByRef::new(&item), "end_by")
                .parse(next)
                .map_value(|rest| prepend(first, rest))
        })
    }
}

/// Occurrences of `parser` separated by `separator`, with an optional trailing
/// separator.
#[derive(Clone)]
pub struct SepEndBy<P, Sep, B> {
    parser: P,
    separator: Sep,
    allow_empty: bool,
    _phantom: PhantomData<B>,
}

impl<P, Sep, B> SepEndBy<P, Sep, B> {
    /// Zero or more occurrences.
    pub fn new(parser: P, separator: Sep) -> Self {
        Self::with_minimum(parser, separator, true)
    }

    /// One or more occurrences.
    pub fn one_or_more(parser: P, separator: Sep) -> Self {
        Self::with_minimum(parser, separator, false)
    }

    fn with_minimum(parser: P, separator: Sep, allow_empty: bool) -> Self {
        Self {
            parser,
            separator,
            allow_empty,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, Sep> Parser<S, U, Vec<A>> for SepEndBy<P, Sep, B>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
    Sep: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Vec<A>> {
        let mut progress = Progress::new(state);
        let mut items = match progress.run(&self.parser) {
            Ok(first) => vec![first],
            Err(failure) if self.allow_empty => {
                return failure_step(failure).or_else(|| empty_list(state))
            }
            Err(failure) => return failure_step(failure),
        };

        loop {
            let mut round = progress.branch();
            match round.run_optional(&self.separator) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    progress.absorb(round);
                    break;
                }
                Err(failure) => return failure_step(failure),
            }
            match round.run_optional(&self.parser) {
                Ok(Some(item)) => {
                    round.guard("sep_end_by");
                    progress.absorb(round);
                    items.push(item);
                }
                Ok(None) => {
                    progress.absorb(round);
                    break;
                }
                Err(failure) => return failure_step(failure),
            }
        }
        progress.finish(items)
    }
}

/// Operands separated by operators, folded left-associatively.
///
/// The operator parser yields the function that combines its two neighbours. With a
/// default, zero operands produce the default instead of failing.
#[derive(Clone)]
pub struct ChainLeft<P, Op, F, A> {
    parser: P,
    operator: Op,
    default: Option<A>,
    _phantom: PhantomData<F>,
}

impl<P, Op, F, A> ChainLeft<P, Op, F, A> {
    pub fn new(parser: P, operator: Op, default: A) -> Self {
        Self::with_default(parser, operator, Some(default))
    }

    pub fn one_or_more(parser: P, operator: Op) -> Self {
        Self::with_default(parser, operator, None)
    }

    fn with_default(parser: P, operator: Op, default: Option<A>) -> Self {
        Self {
            parser,
            operator,
            default,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, F, P, Op> Parser<S, U, A> for ChainLeft<P, Op, F, A>
where
    S: Stream,
    U: Clone,
    A: Clone,
    P: Parser<S, U, A>,
    Op: Parser<S, U, F>,
    F: FnOnce(A, A) -> A,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, A> {
        let step = chain::<S, U, A, F, P, Op, _>(
            state,
            &self.parser,
            &self.operator,
            "chain_left",
            |first, rest| rest.into_iter().fold(first, |left, (f, right)| f(left, right)),
        );
        with_default(step, state, self.default.as_ref())
    }
}

/// Operands separated by operators, folded right-associatively.
#[derive(Clone)]
pub struct ChainRight<P, Op, F, A> {
    parser: P,
    operator: Op,
    default: Option<A>,
    _phantom: PhantomData<F>,
}

impl<P, Op, F, A> ChainRight<P, Op, F, A> {
    pub fn new(parser: P, operator: Op, default: A) -> Self {
        Self::with_default(parser, operator, Some(default))
    }

    pub fn one_or_more(parser: P, operator: Op) -> Self {
        Self::with_default(parser, operator, None)
    }

    fn with_default(parser: P, operator: Op, default: Option<A>) -> Self {
        Self {
            parser,
            operator,
            default,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, F, P, Op> Parser<S, U, A> for ChainRight<P, Op, F, A>
where
    S: Stream,
    U: Clone,
    A: Clone,
    P: Parser<S, U, A>,
    Op: Parser<S, U, F>,
    F: FnOnce(A, A) -> A,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, A> {
        let step = chain::<S, U, A, F, P, Op, _>(
            state,
            &self.parser,
            &self.operator,
            "chain_right",
            |first, rest| {
                // (f1, x1), (f2, x2) ... を右から畳み込む
                let mut pending = Vec::with_capacity(rest.len());
                let mut last = first;
                for (f, operand) in rest {
                    pending.push((f, last));
                    last = operand;
                }
                pending
                    .into_iter()
                    .rev()
                    .fold(last, |right, (f, left)| f(left, right))
            },
        );
        with_default(step, state, self.default.as_ref())
    }
}

fn with_default<S, U, A>(
    step: Step<S, U, A>,
    state: &ParseState<S, U>,
    default: Option<&A>,
) -> Step<S, U, A>
where
    S: Clone,
    U: Clone,
    A: Clone,
{
    match default {
        Some(default) => {
            step.or_else(|| Step::empty_ok(default.clone(), state.clone(), state.unknown_error()))
        }
        None => step,
    }
}

/// Parses `operand (operator operand)*` and hands the pieces to `fold`.
///
/// A round whose operator or operand fails without consuming ends the chain at the
/// operands read so far.
fn chain<S, U, A, F, P, Op, R>(
    state: &ParseState<S, U>,
    parser: &P,
    operator: &Op,
    combinator: &'static str,
    fold: R,
) -> Step<S, U, A>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
    Op: Parser<S, U, F>,
    R: FnOnce(A, Vec<(F, A)>) -> A,
{
    let mut progress = Progress::new(state);
    let first = match progress.run(parser) {
        Ok(first) => first,
        Err(failure) => return failure_step(failure),
    };

    let mut rest = Vec::new();
    loop {
        let mut round = progress.branch();
        let pair = round
            .run(operator)
            .and_then(|f| round.run(parser).map(|operand| (f, operand)));
        match pair {
            Ok(pair) => {
                round.guard(combinator);
                progress.absorb(round);
                rest.push(pair);
            }
            Err(failure) => {
                if let Err(failure) = progress.fallback(failure) {
                    return failure_step(failure);
                }
                break;
            }
        }
    }
    progress.finish(fold(first, rest))
}

/// Repeats `parser` until `end` succeeds; `end`'s value is dropped.
#[derive(Clone)]
pub struct ManyTill<P, E, B> {
    parser: P,
    end: E,
    _phantom: PhantomData<B>,
}

impl<P, E, B> ManyTill<P, E, B> {
    pub fn new(parser: P, end: E) -> Self {
        Self {
            parser,
            end,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, E> Parser<S, U, Vec<A>> for ManyTill<P, E, B>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
    E: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, Vec<A>> {
        let mut progress = Progress::new(state);
        let mut items = Vec::new();
        loop {
            let step = match self.end.parse(progress.state()) {
                Consumption::Empty(Outcome::Failure(error)) => {
                    Step::<S, U, A>::empty_error(error)
                        .or_else(|| self.parser.parse(progress.state()))
                }
                ended => {
                    return match progress.step(ended) {
                        Ok(_) => progress.finish(items),
                        Err(failure) => failure_step(failure),
                    }
                }
            };
            if matches!(step, Consumption::Empty(Outcome::Success { .. })) {
                empty_loop("many_till");
            }
            match progress.step(step) {
                Ok(item) => items.push(item),
                Err(failure) => return failure_step(failure),
            }
        }
    }
}

/// Succeeds without consuming only when `parser` fails.
///
/// When `parser` succeeds, fails with `Unexpected(value)`. This is the longest-match
/// rule: `reserved("let")` followed by `not_followed_by(alpha_num())` rejects `letter`.
#[derive(Clone)]
pub struct NotFollowedBy<P, A> {
    parser: P,
    _phantom: PhantomData<A>,
}

impl<P, A> NotFollowedBy<P, A> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, P> Parser<S, U, ()> for NotFollowedBy<P, A>
where
    S: Stream,
    U: Clone,
    A: fmt::Display,
    P: Parser<S, U, A>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, ()> {
        let step = Attempt::new(ByRef::new(&self.parser))
            .parse(state)
            .and_then(|value, next| {
                Step::<S, U, ()>::empty_error(ParseError::new(
                    next.position.clone(),
                    Message::Unexpected(value.to_string()),
                ))
            })
            .or_else(|| Step::empty_ok((), state.clone(), state.unknown_error()));
        match step {
            Consumption::Consumed(Outcome::Failure(error)) => Step::empty_error(error),
            step => step,
        }
    }
}

/// Accepts any single token without moving the position.
pub fn any_token<S, U>() -> impl Parser<S, U, S::Token> + Clone
where
    S: Stream,
    S::Token: fmt::Display,
    U: Clone,
{
    TokenPrim::new(
        |position: &SourcePosition, _: &S::Token, _: &S| position.clone(),
        None::<UserUpdate<S, U>>,
        |token: &S::Token| Some(token.clone()),
    )
}

/// Succeeds only at the end of input.
pub fn eof<S, U>() -> impl Parser<S, U, ()> + Clone
where
    S: Stream,
    S::Token: fmt::Display,
    U: Clone,
{
    Labels::new(NotFollowedBy::new(any_token::<S, U>()), ["end of input"])
}
