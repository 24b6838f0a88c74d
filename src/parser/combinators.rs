//! Core operations: functor, applicative, monad, alternation, backtracking, labelling
//! and the accumulating loop. Every struct here only rewires the four outcomes of the
//! parsers it wraps.

use std::marker::PhantomData;

use super::core::{Consumption, Outcome, ParseState, Parser, Step};
use crate::error::empty_loop;
use crate::stream::Stream;

// Map: 成功値に関数を適用する
#[derive(Clone)]
pub struct Map<P, F, A> {
    parser: P,
    f: F,
    _phantom: PhantomData<A>,
}

impl<P, F, A> Map<P, F, A> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, F> Parser<S, U, B> for Map<P, F, A>
where
    S: Stream,
    P: Parser<S, U, A>,
    F: Fn(A) -> B,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, B> {
        self.parser.parse(state).map_value(&self.f)
    }
}

/// Applies the function produced by one parser to the value of the next.
#[derive(Clone)]
pub struct Apply<PF, PA, F, A> {
    function: PF,
    argument: PA,
    _phantom: PhantomData<(F, A)>,
}

impl<PF, PA, F, A> Apply<PF, PA, F, A> {
    pub fn new(function: PF, argument: PA) -> Self {
        Self {
            function,
            argument,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, F, PF, PA> Parser<S, U, B> for Apply<PF, PA, F, A>
where
    S: Stream,
    PF: Parser<S, U, F>,
    PA: Parser<S, U, A>,
    F: FnOnce(A) -> B,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, B> {
        self.function
            .parse(state)
            .and_then(|f, next| self.argument.parse(next).map_value(f))
    }
}

// Bind: 結果の値から次のパーサーを作って続ける
#[derive(Clone)]
pub struct Bind<P, F, A> {
    parser: P,
    f: F,
    _phantom: PhantomData<A>,
}

impl<P, F, A> Bind<P, F, A> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, F, Q> Parser<S, U, B> for Bind<P, F, A>
where
    S: Stream,
    P: Parser<S, U, A>,
    F: Fn(A) -> Q,
    Q: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, B> {
        self.parser
            .parse(state)
            .and_then(|value, next| (self.f)(value).parse(next))
    }
}

/// Runs both parsers in sequence and keeps the second value.
#[derive(Clone)]
pub struct Then<P1, P2, A> {
    first: P1,
    second: P2,
    _phantom: PhantomData<A>,
}

impl<P1, P2, A> Then<P1, P2, A> {
    pub fn new(first: P1, second: P2) -> Self {
        Self {
            first,
            second,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P1, P2> Parser<S, U, B> for Then<P1, P2, A>
where
    S: Stream,
    P1: Parser<S, U, A>,
    P2: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, B> {
        self.first
            .parse(state)
            .and_then(|_, next| self.second.parse(next))
    }
}

/// Runs both parsers in sequence and keeps the first value.
#[derive(Clone)]
pub struct Skip<P1, P2, B> {
    first: P1,
    second: P2,
    _phantom: PhantomData<B>,
}

impl<P1, P2, B> Skip<P1, P2, B> {
    pub fn new(first: P1, second: P2) -> Self {
        Self {
            first,
            second,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P1, P2> Parser<S, U, A> for Skip<P1, P2, B>
where
    S: Stream,
    P1: Parser<S, U, A>,
    P2: Parser<S, U, B>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, A> {
        self.first.parse(state).and_then(|value, next| {
            self.second.parse(next).map_value(|_| value)
        })
    }
}

/// Combines two values parsed in sequence.
#[derive(Clone)]
pub struct Map2<P1, P2, F, A, B> {
    first: P1,
    second: P2,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P1, P2, F, A, B> Map2<P1, P2, F, A, B> {
    pub fn new(first: P1, second: P2, f: F) -> Self {
        Self {
            first,
            second,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, C, P1, P2, F> Parser<S, U, C> for Map2<P1, P2, F, A, B>
where
    S: Stream,
    P1: Parser<S, U, A>,
    P2: Parser<S, U, B>,
    F: Fn(A, B) -> C,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, C> {
        self.first.parse(state).and_then(|a, next| {
            self.second.parse(next).map_value(|b| (self.f)(a, b))
        })
    }
}

/// Combines three values parsed in sequence.
#[derive(Clone)]
pub struct Map3<P1, P2, P3, F, A, B, C> {
    first: P1,
    second: P2,
    third: P3,
    f: F,
    _phantom: PhantomData<(A, B, C)>,
}

impl<P1, P2, P3, F, A, B, C> Map3<P1, P2, P3, F, A, B, C> {
    pub fn new(first: P1, second: P2, third: P3, f: F) -> Self {
        Self {
            first,
            second,
            third,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, C, D, P1, P2, P3, F> Parser<S, U, D> for Map3<P1, P2, P3, F, A, B, C>
where
    S: Stream,
    P1: Parser<S, U, A>,
    P2: Parser<S, U, B>,
    P3: Parser<S, U, C>,
    F: Fn(A, B, C) -> D,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, D> {
        self.first.parse(state).and_then(|a, next| {
            self.second.parse(next).and_then(|b, next| {
                self.third.parse(next).map_value(|c| (self.f)(a, b, c))
            })
        })
    }
}

/// Left-biased choice: `right` runs only after `left` fails without consuming input.
#[derive(Clone)]
pub struct Plus<P1, P2> {
    left: P1,
    right: P2,
}

impl<P1, P2> Plus<P1, P2> {
    pub fn new(left: P1, right: P2) -> Self {
        Self { left, right }
    }
}

impl<S, U, O, P1, P2> Parser<S, U, O> for Plus<P1, P2>
where
    S: Stream,
    P1: Parser<S, U, O>,
    P2: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        self.left.parse(state).or_else(|| self.right.parse(state))
    }
}

/// Reports a failure after consumption as a failure without consumption.
#[derive(Clone)]
pub struct Attempt<P> {
    parser: P,
}

impl<P> Attempt<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<S, U, O, P> Parser<S, U, O> for Attempt<P>
where
    S: Stream,
    P: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        match self.parser.parse(state) {
            Consumption::Consumed(Outcome::Failure(error)) => Step::empty_error(error),
            step => step,
        }
    }
}

/// Parses without consuming: any success is reported as an empty success at the
/// original state. A failure after consumption is not protected.
#[derive(Clone)]
pub struct LookAhead<P> {
    parser: P,
}

impl<P> LookAhead<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<S, U, O, P> Parser<S, U, O> for LookAhead<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        match self.parser.parse(state) {
            Consumption::Consumed(Outcome::Success { value, .. })
            | Consumption::Empty(Outcome::Success { value, .. }) => {
                Step::empty_ok(value, state.clone(), state.unknown_error())
            }
            failure => failure,
        }
    }
}

/// Replaces the expectations of an empty outcome with the given labels.
#[derive(Clone)]
pub struct Labels<P> {
    parser: P,
    labels: Vec<String>,
}

impl<P> Labels<P> {
    pub fn new<L: Into<String>>(parser: P, labels: impl IntoIterator<Item = L>) -> Self {
        Self {
            parser,
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S, U, O, P> Parser<S, U, O> for Labels<P>
where
    S: Stream,
    P: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        match self.parser.parse(state) {
            Consumption::Empty(outcome) => Consumption::Empty(outcome.map_error(|error| {
                if error.is_unknown() {
                    error
                } else {
                    error.set_expected(self.labels.as_slice())
                }
            })),
            consumed => consumed,
        }
    }
}

/// Runs a parser until it fails without consuming, folding every value into an
/// accumulator that starts at `B::default()`.
///
/// A body that succeeds without consuming would loop forever; that is a defect in the
/// grammar and aborts the parse with `GrammarError::EmptyLoop`.
#[derive(Clone)]
pub struct ManyAccum<P, F, A> {
    parser: P,
    combine: F,
    combinator: &'static str,
    _phantom: PhantomData<A>,
}

impl<P, F, A> ManyAccum<P, F, A> {
    pub fn new(parser: P, combine: F) -> Self {
        Self::named(parser, combine, "many_accum")
    }

    pub(crate) fn named(parser: P, combine: F, combinator: &'static str) -> Self {
        Self {
            parser,
            combine,
            combinator,
            _phantom: PhantomData,
        }
    }
}

impl<S, U, A, B, P, F> Parser<S, U, B> for ManyAccum<P, F, A>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, A>,
    F: Fn(B, A) -> B,
    B: Default,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, B> {
        let mut accumulated = B::default();
        let mut current = state.clone();
        let mut consumed = false;

        loop {
            match self.parser.parse(&current) {
                Consumption::Consumed(Outcome::Success { value, state, .. }) => {
                    accumulated = (self.combine)(accumulated, value);
                    current = state;
                    consumed = true;
                }
                Consumption::Consumed(Outcome::Failure(error)) => {
                    return Step::consumed_error(error)
                }
                Consumption::Empty(Outcome::Success { .. }) => empty_loop(self.combinator),
                Consumption::Empty(Outcome::Failure(error)) => {
                    return Consumption::tagged(
                        consumed,
                        Outcome::Success {
                            value: accumulated,
                            state: current,
                            error,
                        },
                    )
                }
            }
        }
    }
}

/// Collects every value in order.
pub type Many<P, A> = ManyAccum<P, fn(Vec<A>, A) -> Vec<A>, A>;

/// Runs the loop for its effect and drops the values.
pub type SkipMany<P, A> = ManyAccum<P, fn((), A), A>;

fn push<A>(mut items: Vec<A>, item: A) -> Vec<A> {
    items.push(item);
    items
}

fn discard<A>(_: (), _: A) {}

impl<P, A> ManyAccum<P, fn(Vec<A>, A) -> Vec<A>, A> {
    pub fn many(parser: P) -> Self {
        Self::named(parser, push, "many")
    }

    pub(crate) fn collecting(parser: P, combinator: &'static str) -> Self {
        Self::named(parser, push, combinator)
    }
}

impl<P, A> ManyAccum<P, fn((), A), A> {
    pub fn skip_many(parser: P) -> Self {
        Self::named(parser, discard, "skip_many")
    }
}

/// Defers building a parser until it runs, for recursive grammars.
#[derive(Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<F> Lazy<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<S, U, O, F, P> Parser<S, U, O> for Lazy<F>
where
    S: Stream,
    F: Fn() -> P,
    P: Parser<S, U, O>,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, O> {
        (self.f)().parse(state)
    }
}
