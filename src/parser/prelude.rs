use std::fmt;

use super::combinators::*;
use super::core::{BoxedParser, ByRef, ParseState, Parser};
use super::derived::*;
use super::primitives::*;
use crate::position::SourcePosition;
use crate::stream::Stream;

pub use super::derived::{any_token, eof};
pub use super::primitives::{
    get_input, get_position, get_state, get_user, modify_user, put_user, set_input,
    set_position, set_state,
};

pub fn pure<O: Clone>(value: O) -> Pure<O> {
    Pure::new(value)
}

pub fn zero<O>() -> Zero<O> {
    Zero::new()
}

pub fn fail<O>(message: impl Into<String>) -> Fail<O> {
    Fail::new(message)
}

pub fn unexpected<O>(message: impl Into<String>) -> Fail<O> {
    Fail::unexpected(message)
}

pub fn map<P, F, A, B>(parser: P, f: F) -> Map<P, F, A>
where
    F: Fn(A) -> B,
{
    Map::new(parser, f)
}

pub fn apply<PF, PA, F, A>(function: PF, argument: PA) -> Apply<PF, PA, F, A> {
    Apply::new(function, argument)
}

pub fn bind<P, F, A, Q>(parser: P, f: F) -> Bind<P, F, A>
where
    F: Fn(A) -> Q,
{
    Bind::new(parser, f)
}

pub fn then<P1, P2, A>(first: P1, second: P2) -> Then<P1, P2, A> {
    Then::new(first, second)
}

pub fn skip<P1, P2, B>(first: P1, second: P2) -> Skip<P1, P2, B> {
    Skip::new(first, second)
}

/// Runs `parser` and yields `value` in place of its result.
pub fn replace<P, A, O: Clone>(parser: P, value: O) -> Map<P, impl Fn(A) -> O + Clone, A> {
    Map::new(parser, move |_: A| value.clone())
}

pub fn map2<P1, P2, F, A, B, C>(first: P1, second: P2, f: F) -> Map2<P1, P2, F, A, B>
where
    F: Fn(A, B) -> C,
{
    Map2::new(first, second, f)
}

pub fn map3<P1, P2, P3, F, A, B, C, D>(
    first: P1,
    second: P2,
    third: P3,
    f: F,
) -> Map3<P1, P2, P3, F, A, B, C>
where
    F: Fn(A, B, C) -> D,
{
    Map3::new(first, second, third, f)
}

pub fn plus<P1, P2>(left: P1, right: P2) -> Plus<P1, P2> {
    Plus::new(left, right)
}

pub fn attempt<P>(parser: P) -> Attempt<P> {
    Attempt::new(parser)
}

pub fn look_ahead<P>(parser: P) -> LookAhead<P> {
    LookAhead::new(parser)
}

pub fn label<P>(parser: P, text: impl Into<String>) -> Labels<P> {
    let text: String = text.into();
    Labels::new(parser, [text])
}

pub fn labels<P, L: Into<String>>(parser: P, labels: impl IntoIterator<Item = L>) -> Labels<P> {
    Labels::new(parser, labels)
}

pub fn many_accum<P, F, A, B>(parser: P, combine: F) -> ManyAccum<P, F, A>
where
    F: Fn(B, A) -> B,
    B: Default,
{
    ManyAccum::new(parser, combine)
}

pub fn many<P, A>(parser: P) -> Many<P, A> {
    Many::many(parser)
}

pub fn skip_many<P, A>(parser: P) -> SkipMany<P, A> {
    SkipMany::skip_many(parser)
}

pub fn many1<P>(parser: P) -> Many1<P> {
    Many1::new(parser)
}

pub fn skip_many1<P, A>(parser: P) -> SkipMany1<P, A> {
    SkipMany1::new(parser)
}

pub fn lazy<F>(f: F) -> Lazy<F> {
    Lazy::new(f)
}

pub fn by_ref<P: ?Sized>(parser: &P) -> ByRef<'_, P> {
    ByRef::new(parser)
}

pub fn boxed<'a, S, U, O, P>(parser: P) -> BoxedParser<'a, S, U, O>
where
    S: Stream,
    P: Parser<S, U, O> + 'a,
{
    Box::new(parser)
}

pub fn update_state<S, U, F>(f: F) -> UpdateState<F>
where
    F: Fn(ParseState<S, U>) -> ParseState<S, U>,
{
    UpdateState::new(f)
}

pub fn token_prim<S, U, O, N, T>(next_position: N, test: T) -> TokenPrim<N, UserUpdate<S, U>, T>
where
    S: Stream,
    N: Fn(&SourcePosition, &S::Token, &S) -> SourcePosition,
    T: Fn(&S::Token) -> Option<O>,
{
    TokenPrim::new(next_position, None, test)
}

/// [`token_prim`] that also derives a new user value from each accepted token.
pub fn token_prim_ex<N, W, T>(next_position: N, update_user: W, test: T) -> TokenPrim<N, W, T> {
    TokenPrim::new(next_position, Some(update_user), test)
}

/// Single-token parser for token streams that carry their own positions.
///
/// After a match the position moves to the position of the following token, or stays
/// on the matched token at the end of input.
pub fn token<S, U, O, L, T>(token_position: L, test: T) -> impl Parser<S, U, O> + Clone
where
    S: Stream,
    S::Token: fmt::Display,
    U: Clone,
    L: Fn(&S::Token) -> SourcePosition + Clone,
    T: Fn(&S::Token) -> Option<O> + Clone,
{
    let next_position = move |_: &SourcePosition, token: &S::Token, rest: &S| {
        match rest.uncons() {
            Some((next, _)) => token_position(&next),
            None => token_position(token),
        }
    };
    TokenPrim::new(next_position, None::<UserUpdate<S, U>>, test)
}

pub fn tokens<T, R, N>(show: R, next_position: N, expected: Vec<T>) -> Tokens<T, R, N>
where
    R: Fn(&[T]) -> String,
    N: Fn(&SourcePosition, &[T]) -> SourcePosition,
{
    Tokens::new(show, next_position, expected)
}

pub fn choice<'a, S, U, O>(parsers: Vec<BoxedParser<'a, S, U, O>>) -> Choice<'a, S, U, O> {
    Choice::new(parsers)
}

pub fn option<P, O>(default: O, parser: P) -> OptionOr<P, O> {
    OptionOr::new(default, parser)
}

pub fn option_maybe<P>(parser: P) -> OptionMaybe<P> {
    OptionMaybe::new(parser)
}

pub fn optional<P, A>(parser: P) -> Optional<P, A> {
    Optional::new(parser)
}

pub fn between<L, R, P, A, B>(open: L, close: R, parser: P) -> Between<L, R, P, A, B> {
    Between::new(open, close, parser)
}

pub fn sep_by<P, Sep, B>(parser: P, separator: Sep) -> SepBy<P, Sep, B> {
    SepBy::new(parser, separator)
}

pub fn sep_by1<P, Sep, B>(parser: P, separator: Sep) -> SepBy<P, Sep, B> {
    SepBy::one_or_more(parser, separator)
}

pub fn end_by<P, Sep, B>(parser: P, separator: Sep) -> EndBy<P, Sep, B> {
    EndBy::new(parser, separator)
}

pub fn end_by1<P, Sep, B>(parser: P, separator: Sep) -> EndBy<P, Sep, B> {
    EndBy::one_or_more(parser, separator)
}

pub fn sep_end_by<P, Sep, B>(parser: P, separator: Sep) -> SepEndBy<P, Sep, B> {
    SepEndBy::new(parser, separator)
}

pub fn sep_end_by1<P, Sep, B>(parser: P, separator: Sep) -> SepEndBy<P, Sep, B> {
    SepEndBy::one_or_more(parser, separator)
}

pub fn chain_left<P, Op, F, A>(parser: P, operator: Op, default: A) -> ChainLeft<P, Op, F, A>
where
    F: FnOnce(A, A) -> A,
{
    ChainLeft::new(parser, operator, default)
}

pub fn chain_left1<P, Op, F, A>(parser: P, operator: Op) -> ChainLeft<P, Op, F, A>
where
    F: FnOnce(A, A) -> A,
{
    ChainLeft::one_or_more(parser, operator)
}

pub fn chain_right<P, Op, F, A>(parser: P, operator: Op, default: A) -> ChainRight<P, Op, F, A>
where
    F: FnOnce(A, A) -> A,
{
    ChainRight::new(parser, operator, default)
}

pub fn chain_right1<P, Op, F, A>(parser: P, operator: Op) -> ChainRight<P, Op, F, A>
where
    F: FnOnce(A, A) -> A,
{
    ChainRight::one_or_more(parser, operator)
}

pub fn many_till<P, E, B>(parser: P, end: E) -> ManyTill<P, E, B> {
    ManyTill::new(parser, end)
}

pub fn not_followed_by<P, A>(parser: P) -> NotFollowedBy<P, A> {
    NotFollowedBy::new(parser)
}
