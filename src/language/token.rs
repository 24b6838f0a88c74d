use std::rc::Rc;

use super::def::{CharClass, LanguageDef};
use crate::character::{self, satisfy};
use crate::parser::combinators::{Attempt, Labels, Many, Map, Map2, Plus, Skip, SkipMany, Then};
use crate::parser::core::{failure_step, Failure, ParseState, Parser, Progress, Step};
use crate::parser::derived::{Between, Many1, NotFollowedBy, SepBy, SkipMany1};
use crate::parser::error::{Message, ParseError};
use crate::parser::primitives::Pure;
use crate::stream::Stream;

/// Lexical parsers derived from a [`LanguageDef`].
///
/// Every token parser is a lexeme: it skips the white space and comments that follow
/// it. Call [`TokenParser::white_space`] once at the start of the input to skip any
/// leading blanks.
#[derive(Debug, Clone)]
pub struct TokenParser {
    def: Rc<LanguageDef>,
}

impl TokenParser {
    pub fn new(def: LanguageDef) -> Self {
        Self { def: Rc::new(def) }
    }

    pub fn definition(&self) -> &LanguageDef {
        &self.def
    }

    /// Skips blanks, line comments and block comments.
    pub fn white_space<S, U>(&self) -> impl Parser<S, U, ()> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let line = Some(self.def.comment_line.clone()).filter(|marker| !marker.is_empty());
        let block = (!self.def.comment_start.is_empty()).then(|| BlockComment {
            start: self.def.comment_start.clone(),
            end: self.def.comment_end.clone(),
            nested: self.def.nested_comments,
        });
        SkipMany::<_, ()>::skip_many(Labels::new(Blank { line, block }, [""]))
    }

    /// Runs `parser`, then skips trailing white space.
    pub fn lexeme<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, A> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        Skip::<_, _, ()>::new(parser, self.white_space::<S, U>())
    }

    pub fn symbol<S, U>(&self, text: &str) -> impl Parser<S, U, String> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        self.lexeme::<S, U, String, _>(character::string::<S, U>(text))
    }

    /// An identifier that is not a reserved word.
    pub fn identifier<S, U>(&self) -> impl Parser<S, U, String> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let def = Rc::clone(&self.def);
        let ident = word::<S, U>(&self.def.identifier_start, &self.def.identifier_continue);
        let ident = Labels::new(ident, ["identifier"]);
        let checked = move |state: &ParseState<S, U>| -> Step<S, U, String> {
            ident.parse(state).and_then(|name, next| {
                if def.is_reserved_name(&name) {
                    reject(next, format!("reserved word {:?}", name))
                } else {
                    Step::empty_ok(name, next.clone(), next.unknown_error())
                }
            })
        };
        self.lexeme::<S, U, String, _>(Attempt::new(checked))
    }

    /// The reserved word `name`, not followed by an identifier letter.
    pub fn reserved<S, U>(&self, name: &str) -> impl Parser<S, U, ()> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let keyword = self.case_string::<S, U>(name);
        let boundary = Labels::new(
            NotFollowedBy::<_, char>::new(class::<S, U>(&self.def.identifier_continue)),
            [format!("end of {:?}", name)],
        );
        self.lexeme::<S, U, (), _>(Attempt::new(Then::<_, _, String>::new(keyword, boundary)))
    }

    /// An operator that is not a reserved operator.
    pub fn operator<S, U>(&self) -> impl Parser<S, U, String> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let def = Rc::clone(&self.def);
        let symbol = word::<S, U>(&self.def.operator_start, &self.def.operator_continue);
        let symbol = Labels::new(symbol, ["operator"]);
        let checked = move |state: &ParseState<S, U>| -> Step<S, U, String> {
            symbol.parse(state).and_then(|name, next| {
                if def.is_reserved_operator(&name) {
                    reject(next, format!("reserved operator {:?}", name))
                } else {
                    Step::empty_ok(name, next.clone(), next.unknown_error())
                }
            })
        };
        self.lexeme::<S, U, String, _>(Attempt::new(checked))
    }

    /// The reserved operator `name`, not followed by an operator letter.
    pub fn reserved_op<S, U>(&self, name: &str) -> impl Parser<S, U, ()> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let boundary = Labels::new(
            NotFollowedBy::<_, char>::new(class::<S, U>(&self.def.operator_continue)),
            [format!("end of {:?}", name)],
        );
        let op = Then::<_, _, String>::new(character::string::<S, U>(name), boundary);
        self.lexeme::<S, U, (), _>(Attempt::new(op))
    }

    /// A decimal, `0x` hexadecimal or `0o` octal natural number.
    pub fn natural<S, U>(&self) -> impl Parser<S, U, u64> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        Labels::new(self.lexeme::<S, U, u64, _>(nat::<S, U>()), ["natural"])
    }

    /// A natural number with an optional sign; white space may follow the sign.
    pub fn integer<S, U>(&self) -> impl Parser<S, U, i64> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let minus = Map::<_, _, char>::new(character::char::<S, U>('-'), |_: char| true);
        let plus = Map::<_, _, char>::new(character::char::<S, U>('+'), |_: char| false);
        let sign = Plus::new(Plus::new(minus, plus), Pure::new(false));
        let signed = Map2::<_, _, _, bool, u64>::new(
            self.lexeme::<S, U, bool, _>(sign),
            nat::<S, U>(),
            |negative: bool, n: u64| {
                let n = i64::try_from(n).ok()?;
                Some(if negative { -n } else { n })
            },
        );
        Labels::new(
            self.lexeme::<S, U, i64, _>(in_range::<S, U, i64, _>(signed)),
            ["integer"],
        )
    }

    pub fn string_literal<S, U>(&self) -> impl Parser<S, U, String> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let letter = satisfy::<S, U, _>(|ch| ch != '"' && ch != '\\' && ch > '\u{1a}');
        let string_char = Labels::new(Plus::new(letter, escape::<S, U>()), ["string character"]);
        let body = Between::<_, _, _, char, char>::new(
            character::char::<S, U>('"'),
            Labels::new(character::char::<S, U>('"'), ["end of string"]),
            Many::<_, char>::many(string_char),
        );
        let literal = Map::<_, _, Vec<char>>::new(body, |chars: Vec<char>| {
            chars.into_iter().collect::<String>()
        });
        Labels::new(self.lexeme::<S, U, String, _>(literal), ["literal string"])
    }

    pub fn char_literal<S, U>(&self) -> impl Parser<S, U, char> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let letter = satisfy::<S, U, _>(|ch| ch != '\'' && ch != '\\' && ch > '\u{1a}');
        let char_char = Labels::new(Plus::new(letter, escape::<S, U>()), ["literal character"]);
        let literal = Between::<_, _, _, char, char>::new(
            character::char::<S, U>('\''),
            Labels::new(character::char::<S, U>('\''), ["end of character"]),
            char_char,
        );
        Labels::new(self.lexeme::<S, U, char, _>(literal), ["character"])
    }

    pub fn parens<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, A> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        self.enclosed("(", ")", parser)
    }

    pub fn braces<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, A> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        self.enclosed("{", "}", parser)
    }

    pub fn brackets<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, A> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        self.enclosed("[", "]", parser)
    }

    pub fn angles<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, A> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        self.enclosed("<", ">", parser)
    }

    pub fn comma_sep<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, Vec<A>> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        SepBy::<_, _, String>::new(parser, self.comma::<S, U>())
    }

    pub fn comma_sep1<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, Vec<A>> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        SepBy::<_, _, String>::one_or_more(parser, self.comma::<S, U>())
    }

    pub fn semi_sep<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, Vec<A>> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        SepBy::<_, _, String>::new(parser, self.semi::<S, U>())
    }

    pub fn semi_sep1<S, U, A, P>(&self, parser: P) -> impl Parser<S, U, Vec<A>> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        SepBy::<_, _, String>::one_or_more(parser, self.semi::<S, U>())
    }

    pub fn comma<S: Stream<Token = char>, U: Clone>(&self) -> impl Parser<S, U, String> + Clone {
        self.symbol::<S, U>(",")
    }

    pub fn semi<S: Stream<Token = char>, U: Clone>(&self) -> impl Parser<S, U, String> + Clone {
        self.symbol::<S, U>(";")
    }

    pub fn colon<S: Stream<Token = char>, U: Clone>(&self) -> impl Parser<S, U, String> + Clone {
        self.symbol::<S, U>(":")
    }

    pub fn dot<S: Stream<Token = char>, U: Clone>(&self) -> impl Parser<S, U, String> + Clone {
        self.symbol::<S, U>(".")
    }

    fn enclosed<S, U, A, P>(
        &self,
        open: &str,
        close: &str,
        parser: P,
    ) -> impl Parser<S, U, A> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
        P: Parser<S, U, A> + Clone,
    {
        Between::<_, _, _, String, String>::new(
            self.symbol::<S, U>(open),
            self.symbol::<S, U>(close),
            parser,
        )
    }

    /// `name` matched exactly, or ignoring case when the language is case-insensitive.
    fn case_string<S, U>(&self, name: &str) -> impl Parser<S, U, String> + Clone
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let name = name.to_string();
        let case_sensitive = self.def.case_sensitive;
        move |state: &ParseState<S, U>| -> Step<S, U, String> {
            if case_sensitive {
                return character::string::<S, U>(&name).parse(state);
            }
            let label = format!("{:?}", name);
            let mut progress = Progress::new(state);
            for expected in name.chars() {
                let letter = satisfy::<S, U, _>(move |ch: char| {
                    ch.to_lowercase().eq(expected.to_lowercase())
                });
                if let Err(failure) = progress.run(&Labels::new(letter, [label.as_str()])) {
                    return failure_step(failure);
                }
            }
            progress.finish(name.clone())
        }
    }
}

fn class<S, U>(class: &CharClass) -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    let class = class.clone();
    satisfy::<S, U, _>(move |ch| class.matches(ch))
}

/// A start character followed by any number of continuation characters.
fn word<S, U>(start: &CharClass, rest: &CharClass) -> impl Parser<S, U, String> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    Map2::<_, _, _, char, Vec<char>>::new(
        class::<S, U>(start),
        Many::<_, char>::many(class::<S, U>(rest)),
        |first: char, rest: Vec<char>| std::iter::once(first).chain(rest).collect::<String>(),
    )
}

fn reject<S, U, A>(state: &ParseState<S, U>, message: String) -> Step<S, U, A> {
    Step::empty_error(ParseError::new(
        state.position.clone(),
        Message::Unexpected(message),
    ))
}

/// Fails with "number out of range" where `parser` yields `None`.
fn in_range<S, U, A, P>(parser: P) -> impl Parser<S, U, A> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
    P: Parser<S, U, Option<A>> + Clone,
{
    move |state: &ParseState<S, U>| -> Step<S, U, A> {
        parser.parse(state).and_then(|value, next| match value {
            Some(value) => Step::empty_ok(value, next.clone(), next.unknown_error()),
            None => Step::empty_error(ParseError::new(
                next.position.clone(),
                Message::Generic("number out of range".to_string()),
            )),
        })
    }
}

fn digits_value(digits: &[char], base: u32) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, ch| {
        acc.checked_mul(u64::from(base))?
            .checked_add(u64::from(ch.to_digit(base)?))
    })
}

fn number<S, U, D>(base: u32, digit: D) -> impl Parser<S, U, u64> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
    D: Parser<S, U, char> + Clone,
{
    in_range::<S, U, u64, _>(Map::<_, _, Vec<char>>::new(
        Many1::new(digit),
        move |digits: Vec<char>| digits_value(&digits, base),
    ))
}

fn nat<S, U>() -> impl Parser<S, U, u64> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    let decimal = || number::<S, U, _>(10, character::digit::<S, U>());
    let hexadecimal = Then::<_, _, char>::new(
        character::one_of::<S, U>("xX"),
        number::<S, U, _>(16, character::hex_digit::<S, U>()),
    );
    let octal = Then::<_, _, char>::new(
        character::one_of::<S, U>("oO"),
        number::<S, U, _>(8, character::oct_digit::<S, U>()),
    );
    let after_zero = Plus::new(
        Plus::new(Plus::new(hexadecimal, octal), decimal()),
        Pure::new(0u64),
    );
    let zero_number = Labels::new(
        Then::<_, _, char>::new(character::char::<S, U>('0'), after_zero),
        [""],
    );
    Plus::new(zero_number, decimal())
}

fn escape<S, U>() -> impl Parser<S, U, char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    let code = Labels::new(
        Map::<_, _, char>::new(character::one_of::<S, U>("abfnrtv\\\"'0"), decode_escape),
        ["escape code"],
    );
    Then::<_, _, char>::new(character::char::<S, U>('\\'), code)
}

fn decode_escape(code: char) -> char {
    match code {
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        '0' => '\0',
        other => other,
    }
}

/// One run of blanks, one line comment or one block comment.
#[derive(Clone)]
struct Blank {
    line: Option<String>,
    block: Option<BlockComment>,
}

impl<S, U> Parser<S, U, ()> for Blank
where
    S: Stream<Token = char>,
    U: Clone,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, ()> {
        let spaces = SkipMany1::<_, char>::new(satisfy::<S, U, _>(char::is_whitespace));
        let mut step = spaces.parse(state);
        if let Some(marker) = &self.line {
            step = step.or_else(|| {
                let start = Attempt::new(character::string::<S, U>(marker));
                let rest = SkipMany::<_, char>::skip_many(satisfy::<S, U, _>(|ch| ch != '\n'));
                Then::<_, _, String>::new(start, rest).parse(state)
            });
        }
        if let Some(block) = &self.block {
            step = step.or_else(|| block.parse(state));
        }
        step
    }
}

#[derive(Clone)]
struct BlockComment {
    start: String,
    end: String,
    nested: bool,
}

impl BlockComment {
    fn body<S, U>(&self, progress: &mut Progress<S, U>) -> Result<(), Failure>
    where
        S: Stream<Token = char>,
        U: Clone,
    {
        let close = Attempt::new(character::string::<S, U>(&self.end));
        let open = Attempt::new(character::string::<S, U>(&self.start));
        let delimiters = format!("{}{}", self.start, self.end);
        let text = SkipMany1::<_, char>::new(character::none_of::<S, U>(&delimiters));
        let stray = Labels::new(character::one_of::<S, U>(&delimiters), ["end of comment"]);

        let mut depth = 1usize;
        while depth > 0 {
            if progress.run_optional(&close)?.is_some() {
                depth -= 1;
            } else if self.nested && progress.run_optional(&open)?.is_some() {
                depth += 1;
            } else if progress.run_optional(&text)?.is_none() {
                progress.run(&stray)?;
            }
        }
        Ok(())
    }
}

impl<S, U> Parser<S, U, ()> for BlockComment
where
    S: Stream<Token = char>,
    U: Clone,
{
    fn parse(&self, state: &ParseState<S, U>) -> Step<S, U, ()> {
        let mut progress = Progress::new(state);
        let open = Attempt::new(character::string::<S, U>(&self.start));
        match progress.run(&open).and_then(|_| self.body(&mut progress)) {
            Ok(()) => progress.finish(()),
            Err(failure) => failure_step(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{parse_str, parse_str_to_end};
    use pretty_assertions::assert_eq;

    fn c_lexer() -> TokenParser {
        TokenParser::new(LanguageDef::c_style())
    }

    #[test]
    fn test_identifier_skips_trailing_blanks() {
        let lexer = c_lexer();
        let ident = lexer.identifier::<&str, ()>();
        let pair = Map2::<_, _, _, String, String>::new(
            ident.clone(),
            ident,
            |a: String, b: String| (a, b),
        );
        assert_eq!(
            parse_str(&pair, "", "foo  bar_1"),
            Ok(("foo".to_string(), "bar_1".to_string()))
        );
    }

    #[test]
    fn test_identifier_rejects_reserved_word() {
        let lexer = c_lexer();
        let error = parse_str(&lexer.identifier::<&str, ()>(), "", "while").unwrap_err();

        assert_eq!(error.position().column(), 6);
        assert!(error
            .messages()
            .contains(&Message::Unexpected("reserved word \"while\"".into())));
    }

    #[test]
    fn test_reserved_needs_word_boundary() {
        let lexer = c_lexer();
        assert_eq!(parse_str(&lexer.reserved::<&str, ()>("while"), "", "while (x)"), Ok(()));

        // 予約語の途中で失敗しても入力は消費されない
        let keyword = Map::<_, _, ()>::new(lexer.reserved::<&str, ()>("while"), |_: ()| {
            "keyword".to_string()
        });
        let p = Plus::new(keyword, lexer.identifier::<&str, ()>());
        assert_eq!(parse_str(&p, "", "whilex"), Ok("whilex".to_string()));
    }

    #[test]
    fn test_reserved_ignores_case_when_insensitive() {
        let lexer = TokenParser::new(LanguageDef {
            reserved_names: vec!["select".to_string()],
            case_sensitive: false,
            ..LanguageDef::default()
        });
        assert_eq!(parse_str(&lexer.reserved::<&str, ()>("select"), "", "SeLeCt *"), Ok(()));
        assert!(parse_str(&lexer.identifier::<&str, ()>(), "", "SELECT").is_err());
        assert!(parse_str(&lexer.reserved::<&str, ()>("select"), "", "selected").is_err());
    }

    #[test]
    fn test_operators() {
        let lexer = c_lexer();
        assert_eq!(parse_str(&lexer.operator::<&str, ()>(), "", "+= 1"), Ok("+=".to_string()));

        let error = parse_str(&lexer.operator::<&str, ()>(), "", "== 1").unwrap_err();
        assert!(error
            .messages()
            .contains(&Message::Unexpected("reserved operator \"==\"".into())));

        assert_eq!(parse_str(&lexer.reserved_op::<&str, ()>("="), "", "= 1"), Ok(()));
        assert!(parse_str(&lexer.reserved_op::<&str, ()>("="), "", "==").is_err());
    }

    #[test]
    fn test_natural_bases() {
        let lexer = c_lexer();
        let natural = lexer.natural::<&str, ()>();
        assert_eq!(parse_str(&natural, "", "42 "), Ok(42));
        assert_eq!(parse_str(&natural, "", "0x1F"), Ok(31));
        assert_eq!(parse_str(&natural, "", "0o17"), Ok(15));
        assert_eq!(parse_str(&natural, "", "0"), Ok(0));
        assert_eq!(parse_str(&natural, "", "007"), Ok(7));

        let error = parse_str(&natural, "", "x").unwrap_err();
        assert_eq!(error.to_string(), "(1, 1):\nexpecting natural\nunexpected x");
    }

    #[test]
    fn test_natural_out_of_range() {
        let lexer = c_lexer();
        let natural = lexer.natural::<&str, ()>();
        let error = parse_str(&natural, "", "99999999999999999999").unwrap_err();
        assert!(error
            .messages()
            .contains(&Message::Generic("number out of range".into())));
    }

    #[test]
    fn test_integer_sign() {
        let lexer = c_lexer();
        let integer = lexer.integer::<&str, ()>();
        assert_eq!(parse_str(&integer, "", "-42"), Ok(-42));
        assert_eq!(parse_str(&integer, "", "- 7"), Ok(-7));
        assert_eq!(parse_str(&integer, "", "+3"), Ok(3));
        assert_eq!(parse_str(&integer, "", "0x10"), Ok(16));
        assert!(parse_str(&integer, "", "9223372036854775808").is_err());
    }

    #[test]
    fn test_string_literal_escapes() {
        let lexer = c_lexer();
        let literal = lexer.string_literal::<&str, ()>();
        assert_eq!(
            parse_str(&literal, "", r#""a\tb\"c" rest"#),
            Ok("a\tb\"c".to_string())
        );

        let error = parse_str(&literal, "", "\"abc").unwrap_err();
        assert_eq!(error.position().column(), 5);

        assert_eq!(parse_str(&lexer.char_literal::<&str, ()>(), "", r"'\n'"), Ok('\n'));
        assert_eq!(parse_str(&lexer.char_literal::<&str, ()>(), "", "'q'"), Ok('q'));
    }

    #[test]
    fn test_white_space_skips_comments() {
        let lexer = c_lexer();
        let p = Then::<_, _, ()>::new(
            lexer.white_space::<&str, ()>(),
            lexer.identifier::<&str, ()>(),
        );
        assert_eq!(
            parse_str(&p, "", "  // note\n /* a * b */\tx"),
            Ok("x".to_string())
        );
    }

    #[test]
    fn test_block_comments_nesting() {
        let source = "/* a /* b */ c */ x";

        // ネストしない場合は最初の */ で閉じる
        let flat = c_lexer();
        let p = Then::<_, _, ()>::new(
            flat.white_space::<&str, ()>(),
            flat.identifier::<&str, ()>(),
        );
        assert_eq!(parse_str(&p, "", source), Ok("c".to_string()));

        let nested = TokenParser::new(LanguageDef {
            nested_comments: true,
            ..LanguageDef::c_style()
        });
        let p = Then::<_, _, ()>::new(
            nested.white_space::<&str, ()>(),
            nested.identifier::<&str, ()>(),
        );
        assert_eq!(parse_str(&p, "", source), Ok("x".to_string()));
    }

    #[test]
    fn test_unterminated_comment() {
        let lexer = c_lexer();
        let error = parse_str(&lexer.white_space::<&str, ()>(), "", "/* abc").unwrap_err();

        assert_eq!(error.position().column(), 7);
        assert!(error
            .messages()
            .contains(&Message::Expected("end of comment".into())));
    }

    #[test]
    fn test_lone_slash_is_not_a_comment() {
        let lexer = c_lexer();
        let p = Then::<_, _, ()>::new(
            lexer.white_space::<&str, ()>(),
            lexer.operator::<&str, ()>(),
        );
        assert_eq!(parse_str(&p, "", " / 2"), Ok("/".to_string()));
    }

    #[test]
    fn test_parens_with_comma_sep() {
        let lexer = c_lexer();
        let list = lexer.parens::<&str, (), Vec<u64>, _>(
            lexer.comma_sep::<&str, (), u64, _>(lexer.natural::<&str, ()>()),
        );
        assert_eq!(parse_str_to_end(&list, "", "( 1, 2 ,3 )"), Ok(vec![1, 2, 3]));
        assert_eq!(parse_str_to_end(&list, "", "()"), Ok(vec![]));

        let block = lexer.braces::<&str, (), Vec<String>, _>(
            lexer.semi_sep1::<&str, (), String, _>(lexer.identifier::<&str, ()>()),
        );
        assert_eq!(
            parse_str_to_end(&block, "", "{ a; b }"),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
        assert!(parse_str_to_end(&block, "", "{ }").is_err());
    }
}
