//! # Parse Errors
//!
//! A [`ParseError`] is a position plus an ordered list of [`Message`]s, most recent
//! first. An error with no messages is *unknown*: it records where a parser stopped
//! without saying anything about why.
//!
//! ## Merging
//!
//! [`ParseError::merge`] combines the errors of competing branches:
//!
//! 1. a known error always beats an unknown one, wherever they are
//! 2. otherwise the error at the later position wins outright
//! 3. on a position tie the message lists are concatenated, left operand first
//!
//! ## Equality
//!
//! Two errors are equal when their positions are equal and their messages have the
//! same *texts* in the same order. The message variant does not take part in the
//! comparison, so `Expected("x")` and `Generic("x")` compare equal.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::SourcePosition;

/// A single piece of error information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Message {
    /// Generated by primitive token parsers on a mismatch; an empty text means end of input.
    SystemUnexpected(String),
    /// Raised explicitly by combinators such as `not_followed_by`.
    Unexpected(String),
    /// Added by labels.
    Expected(String),
    /// A free-form failure message supplied by the grammar.
    Generic(String),
}

impl Message {
    /// The message text, without its variant.
    pub fn text(&self) -> &str {
        match self {
            Message::SystemUnexpected(text)
            | Message::Unexpected(text)
            | Message::Expected(text)
            | Message::Generic(text) => text,
        }
    }

    pub fn is_expected(&self) -> bool {
        matches!(self, Message::Expected(_))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::SystemUnexpected(text) if text.is_empty() => {
                write!(f, "unexpected end of input")
            }
            Message::SystemUnexpected(text) | Message::Unexpected(text) => {
                write!(f, "unexpected {}", text)
            }
            Message::Expected(text) => write!(f, "expecting {}", text),
            Message::Generic(text) => write!(f, "{}", text),
        }
    }
}

/// A positioned parse failure.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{position}:{}", render_messages(.messages))]
pub struct ParseError {
    position: SourcePosition,
    messages: Vec<Message>,
}

impl ParseError {
    /// An error without messages at `position`.
    pub fn unknown(position: SourcePosition) -> Self {
        Self {
            position,
            messages: Vec::new(),
        }
    }

    pub fn new(position: SourcePosition, message: Message) -> Self {
        Self {
            position,
            messages: vec![message],
        }
    }

    pub fn with_messages(position: SourcePosition, messages: Vec<Message>) -> Self {
        Self { position, messages }
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    /// Messages in insertion order, most recent first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_unknown(&self) -> bool {
        self.messages.is_empty()
    }

    /// Prepends `message`.
    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.insert(0, message);
        self
    }

    /// Prepends `message` after removing any message identical to it.
    pub fn set_message(mut self, message: Message) -> Self {
        self.messages.retain(|existing| existing != &message);
        self.messages.insert(0, message);
        self
    }

    pub fn set_position(self, position: SourcePosition) -> Self {
        Self { position, ..self }
    }

    /// Replaces every `Expected` message with one `Expected` per label, in label order.
    ///
    /// An empty label list leaves a single `Expected("")`, which hides the expectation
    /// when rendered.
    pub fn set_expected<L: AsRef<str>>(mut self, labels: &[L]) -> Self {
        self.messages.retain(|message| !message.is_expected());
        let expected: Vec<Message> = if labels.is_empty() {
            vec![Message::Expected(String::new())]
        } else {
            labels
                .iter()
                .map(|label| Message::Expected(label.as_ref().to_string()))
                .collect()
        };
        self.messages.splice(0..0, expected);
        self
    }

    /// Combines the errors of two branches; see the module documentation.
    pub fn merge(self, other: ParseError) -> ParseError {
        match (self.is_unknown(), other.is_unknown()) {
            (false, true) => self,
            (true, false) => other,
            _ => match self.position.compare(&other.position) {
                Ordering::Less => other,
                Ordering::Greater => self,
                Ordering::Equal => {
                    let mut messages = self.messages;
                    messages.extend(other.messages);
                    ParseError {
                        position: self.position,
                        messages,
                    }
                }
            },
        }
    }
}

impl PartialEq for ParseError {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.messages.len() == other.messages.len()
            && self
                .messages
                .iter()
                .zip(&other.messages)
                .all(|(a, b)| a.text() == b.text())
    }
}

fn render_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "\nunknown parse error".to_string();
    }
    let mut lines: Vec<String> = Vec::with_capacity(messages.len());
    for message in messages {
        if matches!(message, Message::Expected(text) if text.is_empty()) {
            continue;
        }
        // 同じ行は一度だけ出す
        let line = message.to_string();
        if !lines.contains(&line) {
            lines.push(line);
        }
    }
    lines.iter().map(|line| format!("\n{}", line)).collect()
}
