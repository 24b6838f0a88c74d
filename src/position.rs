//! # Source Positions
//!
//! A [`SourcePosition`] names a point in the input as `(name, line, column)`.
//! Positions are immutable values: every update produces a new position.
//!
//! ## Update Rules
//!
//! * `'\n'` moves to the next line and resets the column to 1
//! * `'\t'` advances the column to the next tab stop (multiples of 8, plus 1)
//! * any other character advances the column by 1
//!
//! Positions are ordered by `(line, column)` only; the source name is informational
//! and does not take part in [`SourcePosition::compare`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Width of a tab stop in columns.
pub const TAB_WIDTH: usize = 8;

/// A line/column coordinate inside a named source.
///
/// Lines and columns are 1-based and never drop below 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    name: Arc<str>,
    line: usize,
    column: usize,
}

impl SourcePosition {
    /// Creates a position, clamping line and column to at least 1.
    pub fn new(name: impl Into<Arc<str>>, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            line: line.max(1),
            column: column.max(1),
        }
    }

    /// The position of the first character of a source: `(name, 1, 1)`.
    pub fn initial(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, 1, 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Compares two positions by `(line, column)`, ignoring the source name.
    pub fn compare(&self, other: &SourcePosition) -> Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }

    pub fn with_name(&self, name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_line(&self, line: usize) -> Self {
        Self::new(self.name.clone(), line, self.column)
    }

    pub fn with_column(&self, column: usize) -> Self {
        Self::new(self.name.clone(), self.line, column)
    }

    /// Moves down `lines` lines, keeping the column.
    pub fn advance_lines(&self, lines: usize) -> Self {
        self.with_line(self.line + lines)
    }

    /// Moves right `columns` columns, keeping the line.
    pub fn advance_columns(&self, columns: usize) -> Self {
        self.with_column(self.column + columns)
    }

    /// Returns the position after reading `ch`.
    pub fn update_char(&self, ch: char) -> Self {
        match ch {
            '\n' => Self::new(self.name.clone(), self.line + 1, 1),
            '\t' => {
                let column = self.column + TAB_WIDTH - ((self.column - 1) % TAB_WIDTH);
                self.with_column(column)
            }
            _ => self.advance_columns(1),
        }
    }

    /// Returns the position after reading every character of `text` in order.
    pub fn update_str(&self, text: &str) -> Self {
        self.update_chars(text.chars())
    }

    pub fn update_chars<I>(&self, chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        chars
            .into_iter()
            .fold(self.clone(), |position, ch| position.update_char(ch))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "({}, {})", self.line, self.column)
        } else {
            write!(f, "{}({}, {})", self.name, self.line, self.column)
        }
    }
}
