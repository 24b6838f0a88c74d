//! # Character Parsers
//!
//! Single-character and string parsers over any stream of `char` tokens. Every parser
//! here is built on [`TokenPrim`] or [`Tokens`] and moves the position with
//! [`SourcePosition::update_char`], so tabs and newlines are accounted for.

use crate::parser::combinators::{Labels, Map, Plus, Skip, SkipMany, Then};
use crate::parser::core::{ByRef, Parser};
use crate::parser::derived::eof;
use crate::parser::error::ParseError;
use crate::parser::primitives::{TokenPrim, Tokens, UserUpdate};
use crate::parser::runner::run;
use crate::position::SourcePosition;
use crate::stream::Stream;

fn next_char<S>(position: &SourcePosition, ch: &char, _: &S) -> SourcePosition {
    position.update_char(*ch)
}

/// Accepts a character for which `predicate` holds.
pub fn satisfy<S, U, F>(predicate: F) -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
    F: Fn(char) -> bool + Clone,
{
    TokenPrim::new(
        next_char::<S>,
        None::<UserUpdate<S, U>>,
        move |ch: &char| predicate(*ch).then_some(*ch),
    )
}

fn labelled<S, U, F>(predicate: F, label: &str) -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
    F: Fn(char) -> bool + Clone,
{
    Labels::new(satisfy::<S, U, F>(predicate), [label])
}

/// Accepts exactly `expected`.
pub fn char<S, U>(expected: char) -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(move |ch| ch == expected, &format!("{:?}", expected))
}

pub fn one_of<S, U>(chars: &str) -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    let chars = chars.to_owned();
    satisfy::<S, U, _>(move |ch| chars.contains(ch))
}

pub fn none_of<S, U>(chars: &str) -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    let chars = chars.to_owned();
    satisfy::<S, U, _>(move |ch| !chars.contains(ch))
}

pub fn any_char<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    satisfy::<S, U, _>(|_| true)
}

/// An ASCII decimal digit.
pub fn digit<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(|ch| ch.is_ascii_digit(), "digit")
}

pub fn hex_digit<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(|ch| ch.is_ascii_hexdigit(), "hexadecimal digit")
}

pub fn oct_digit<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(|ch| ('0'..='7').contains(&ch), "octal digit")
}

pub fn letter<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(char::is_alphabetic, "letter")
}

pub fn alpha_num<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(char::is_alphanumeric, "letter or digit")
}

pub fn upper<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(char::is_uppercase, "uppercase letter")
}

pub fn lower<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(char::is_lowercase, "lowercase letter")
}

pub fn space<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    labelled::<S, U, _>(char::is_whitespace, "space")
}

/// Skips zero or more white space characters.
pub fn spaces<S, U>() -> impl Parser<S, U, ()> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    Labels::new(SkipMany::<_, char>::skip_many(space::<S, U>()), ["white space"])
}

pub fn newline<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    Labels::new(char::<S, U>('\n'), ["lf newline"])
}

/// `"\r\n"`, yielding `'\n'`.
pub fn crlf<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    Labels::new(
        Then::<_, _, char>::new(char::<S, U>('\r'), char::<S, U>('\n')),
        ["crlf newline"],
    )
}

pub fn end_of_line<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    Labels::new(Plus::new(newline::<S, U>(), crlf::<S, U>()), ["new-line"])
}

pub fn tab<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    Labels::new(char::<S, U>('\t'), ["tab"])
}

fn show_text(chars: &[char]) -> String {
    format!("{:?}", chars.iter().collect::<String>())
}

fn next_text(position: &SourcePosition, chars: &[char]) -> SourcePosition {
    position.update_chars(chars.iter().copied())
}

fn collect_text(chars: Vec<char>) -> String {
    chars.into_iter().collect()
}

/// Matches `text` exactly.
///
/// Fails without consuming when the first character differs; a later mismatch has
/// consumed input, so wrap it in `attempt` to try alternatives sharing a prefix.
pub fn string<S, U>(text: &str) -> impl Parser<S, U, String> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    let expected: Vec<char> = text.chars().collect();
    Map::<_, _, Vec<char>>::new(Tokens::new(show_text, next_text, expected), collect_text)
}

/// Runs `parser` over `text` with no user value.
pub fn parse_str<'a, O, P>(parser: &P, name: &str, text: &'a str) -> Result<O, ParseError>
where
    P: Parser<&'a str, (), O> + ?Sized,
{
    run(parser, (), name, text)
}

/// Like [`parse_str`], but also requires the whole of `text` to be consumed.
pub fn parse_str_to_end<'a, O, P>(parser: &P, name: &str, text: &'a str) -> Result<O, ParseError>
where
    P: Parser<&'a str, (), O> + ?Sized,
{
    let whole = Skip::<_, _, ()>::new(ByRef::new(parser), eof::<&'a str, ()>());
    run(&whole, (), name, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::combinators::Many;
    use crate::parser::derived::Many1;
    use crate::parser::error::Message;
    use crate::parser::primitives::get_position;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_char_success_moves_one_column() {
        let plus = char::<&str, ()>('+');
        assert_eq!(parse_str(&plus, "", "+"), Ok('+'));
    }

    #[test]
    fn test_char_on_empty_input() {
        let error = parse_str(&char::<&str, ()>('a'), "", "").unwrap_err();
        assert_eq!(error.position(), &SourcePosition::initial(""));
        assert_eq!(
            error.messages(),
            &[
                Message::Expected("'a'".into()),
                Message::SystemUnexpected(String::new()),
            ]
        );
        assert_eq!(error.to_string(), "(1, 1):\nexpecting 'a'\nunexpected end of input");
    }

    #[test]
    fn test_digit_label() {
        let error = parse_str(&digit::<&str, ()>(), "n", "x").unwrap_err();
        assert_eq!(error.to_string(), "n(1, 1):\nexpecting digit\nunexpected x");
    }

    #[test]
    fn test_character_classes() {
        assert_eq!(parse_str(&hex_digit::<&str, ()>(), "", "F"), Ok('F'));
        assert!(parse_str(&oct_digit::<&str, ()>(), "", "8").is_err());
        assert_eq!(parse_str(&one_of::<&str, ()>("+-"), "", "-"), Ok('-'));
        assert!(parse_str(&none_of::<&str, ()>("+-"), "", "-").is_err());
        assert_eq!(parse_str(&upper::<&str, ()>(), "", "Q"), Ok('Q'));
        assert!(parse_str(&lower::<&str, ()>(), "", "Q").is_err());
        assert_eq!(parse_str(&alpha_num::<&str, ()>(), "", "7"), Ok('7'));
    }

    #[test]
    fn test_spaces_and_tab_position() {
        let p = Then::<_, _, ()>::new(spaces::<&str, ()>(), get_position::<&str, ()>());
        let position = parse_str(&p, "", " \t\nx").unwrap();
        assert_eq!((position.line(), position.column()), (2, 1));

        // タブは次のタブストップまで進む
        let p = Then::<_, _, char>::new(tab::<&str, ()>(), get_position::<&str, ()>());
        let position = parse_str(&p, "", "\tx").unwrap();
        assert_eq!(position.column(), 9);
    }

    #[test]
    fn test_end_of_line() {
        assert_eq!(parse_str(&end_of_line::<&str, ()>(), "", "\r\n"), Ok('\n'));
        assert_eq!(parse_str(&end_of_line::<&str, ()>(), "", "\n"), Ok('\n'));
        let error = parse_str(&end_of_line::<&str, ()>(), "", "x").unwrap_err();
        assert_eq!(error.to_string(), "(1, 1):\nexpecting new-line\nunexpected x");
    }

    #[test]
    fn test_string() {
        let p = string::<&str, ()>("let");
        assert_eq!(parse_str(&p, "", "let x"), Ok("let".to_string()));

        let error = parse_str(&p, "", "lex").unwrap_err();
        assert_eq!(error.position(), &SourcePosition::initial(""));
        assert_eq!(error.to_string(), "(1, 1):\nexpecting \"let\"\nunexpected x");
    }

    #[test]
    fn test_digits_to_integer() {
        let number = Map::<_, _, Vec<char>>::new(
            Many1::new(digit::<&str, ()>()),
            |digits: Vec<char>| {
                digits
                    .iter()
                    .fold(0u64, |n, d| n * 10 + u64::from(d.to_digit(10).unwrap_or(0)))
            },
        );
        assert_eq!(parse_str_to_end(&number, "", "123"), Ok(123));

        let error = parse_str_to_end(&number, "", "12a").unwrap_err();
        assert_eq!(error.position(), &SourcePosition::new("", 1, 3));
    }

    #[test]
    fn test_many_letters_stop_at_digit() {
        let word = Many::<_, char>::many(letter::<&str, ()>());
        assert_eq!(parse_str(&word, "", "ab1"), Ok(vec!['a', 'b']));
    }
}
