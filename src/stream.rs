//! # Token Streams
//!
//! A [`Stream`] is anything that can be split into its first token and the rest.
//! Splitting must be pure: calling [`Stream::uncons`] on the same value always yields
//! the same result, and an older stream value can be kept around to rewind the parse.
//! Backtracking in the parser core relies on this property and never saves or restores
//! anything explicitly.
//!
//! Implementations are provided for string slices (`char` tokens), token slices, and
//! [`TokenBuffer`], a shared buffer with a read offset.

use std::fmt;
use std::rc::Rc;

/// The split-or-end capability consumed by the parser core.
pub trait Stream: Clone {
    type Token: Clone;

    /// Splits off the first token, or returns `None` at the end of input.
    fn uncons(&self) -> Option<(Self::Token, Self)>;

    /// Returns `true` when no tokens remain.
    fn is_exhausted(&self) -> bool {
        self.uncons().is_none()
    }
}

impl<'a> Stream for &'a str {
    type Token = char;

    fn uncons(&self) -> Option<(char, &'a str)> {
        let mut chars = self.chars();
        let head = chars.next()?;
        Some((head, chars.as_str()))
    }
}

impl<'a, T: Clone> Stream for &'a [T] {
    type Token = T;

    fn uncons(&self) -> Option<(T, &'a [T])> {
        self.split_first().map(|(head, rest)| (head.clone(), rest))
    }
}

/// An owned token sequence shared between stream values.
///
/// Cloning a buffer or advancing it never copies the tokens; each value is an
/// offset into the same reference-counted slice.
pub struct TokenBuffer<T> {
    tokens: Rc<[T]>,
    offset: usize,
}

impl<T> TokenBuffer<T> {
    pub fn new(tokens: impl Into<Rc<[T]>>) -> Self {
        Self {
            tokens: tokens.into(),
            offset: 0,
        }
    }

    /// Number of tokens already consumed from the underlying buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The tokens not yet consumed.
    pub fn remaining(&self) -> &[T] {
        &self.tokens[self.offset..]
    }
}

impl<T> Clone for TokenBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            tokens: Rc::clone(&self.tokens),
            offset: self.offset,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TokenBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBuffer")
            .field("offset", &self.offset)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl<T> From<Vec<T>> for TokenBuffer<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self::new(tokens)
    }
}

impl<T: Clone> Stream for TokenBuffer<T> {
    type Token = T;

    fn uncons(&self) -> Option<(T, Self)> {
        let head = self.tokens.get(self.offset)?.clone();
        let rest = Self {
            tokens: Rc::clone(&self.tokens),
            offset: self.offset + 1,
        };
        Some((head, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_uncons() {
        let input = "ab";
        let (head, rest) = input.uncons().unwrap();
        assert_eq!(head, 'a');
        assert_eq!(rest, "b");

        // 同じ値から何度分割しても結果は同じ
        assert_eq!(input.uncons(), Some(('a', "b")));
        assert!("".uncons().is_none());
    }

    #[test]
    fn test_str_multibyte() {
        let (head, rest) = "λx".uncons().unwrap();
        assert_eq!(head, 'λ');
        assert_eq!(rest, "x");
    }

    #[test]
    fn test_slice_uncons() {
        let tokens = [1, 2, 3];
        let stream: &[i32] = &tokens;
        let (head, rest) = stream.uncons().unwrap();
        assert_eq!(head, 1);
        assert_eq!(rest, &[2, 3]);
        let tail: &[i32] = &stream[3..];
        assert!(tail.is_exhausted());
    }

    #[test]
    fn test_token_buffer_rewind() {
        let buffer = TokenBuffer::from(vec!["let", "x", "="]);
        let (first, rest) = buffer.uncons().unwrap();
        assert_eq!(first, "let");
        assert_eq!(rest.offset(), 1);
        assert_eq!(rest.remaining(), &["x", "="]);

        // 古い値を保持すれば巻き戻せる
        let (again, _) = buffer.uncons().unwrap();
        assert_eq!(again, "let");
        assert_eq!(buffer.offset(), 0);
    }
}
