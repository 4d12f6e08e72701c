// SPDX-License-Identifier: MIT

//! Tokens and operators of the condition language

use crate::error::ConditionError;
use std::str::FromStr;

/// Kind of a materialized token
///
/// Whitespace is recognised by the tokenizer but never emitted, so it has no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `=`, `!=`, `<`, `<=`, `>`, `>=`, `&` or `|`
    Operator,
    /// A column name, resolved against the row
    ColumnOperand,
    /// A single-quoted string literal
    LiteralOperand,
    /// `(`
    OpeningBracket,
    /// `)`
    ClosingBracket,
}

/// A classified lexical unit of a condition string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The matched text, quotes included for literals
    pub content: String,
    pub kind: TokenKind,
    /// Byte offset of the token in the condition string
    pub offset: usize,
}

impl Token {
    pub fn new(content: impl Into<String>, kind: TokenKind, offset: usize) -> Self {
        Self {
            content: content.into(),
            kind,
            offset,
        }
    }

    /// The value this token contributes as an operand.
    ///
    /// For a literal this is the text between the quotes; every other kind
    /// returns its content unchanged.
    pub fn value(&self) -> &str {
        match self.kind {
            TokenKind::LiteralOperand => self
                .content
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(&self.content),
            TokenKind::Operator
            | TokenKind::ColumnOperand
            | TokenKind::OpeningBracket
            | TokenKind::ClosingBracket => &self.content,
        }
    }
}

/// Binary operators: six string comparisons and two boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// =
    Eq,
    /// !=
    Ne,
    /// <
    Lt,
    /// <=
    Le,
    /// >
    Gt,
    /// >=
    Ge,
    /// &
    And,
    /// |
    Or,
}

impl Operator {
    /// True for `&` and `|`, whose operands are booleans rather than strings
    pub fn is_connective(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    /// Compare two strings. Ordering is lexicographic on bytes, never numeric.
    ///
    /// Returns `None` for the boolean connectives.
    pub fn compare(self, left: &str, right: &str) -> Option<bool> {
        match self {
            Operator::Eq => Some(left == right),
            Operator::Ne => Some(left != right),
            Operator::Lt => Some(left < right),
            Operator::Le => Some(left <= right),
            Operator::Gt => Some(left > right),
            Operator::Ge => Some(left >= right),
            Operator::And | Operator::Or => None,
        }
    }

    /// Combine two booleans. Returns `None` for the comparisons.
    pub fn connect(self, left: bool, right: bool) -> Option<bool> {
        match self {
            Operator::And => Some(left && right),
            Operator::Or => Some(left || right),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "&" => Ok(Operator::And),
            "|" => Ok(Operator::Or),
            other => Err(ConditionError::UnknownOperator(other.to_string())),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::Ne => write!(f, "!="),
            Operator::Lt => write!(f, "<"),
            Operator::Le => write!(f, "<="),
            Operator::Gt => write!(f, ">"),
            Operator::Ge => write!(f, ">="),
            Operator::And => write!(f, "&"),
            Operator::Or => write!(f, "|"),
        }
    }
}
