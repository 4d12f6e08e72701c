// SPDX-License-Identifier: MIT

//! Condition engine for filtering stored rows
//!
//! Conditions are fully parenthesized expressions like:
//! - `(id='1')`
//! - `((id='1')&(name='bob'))`
//! - `((age>'10')|(age<'5'))`
//!
//! All values are strings and all comparisons are string comparisons.

mod evaluator;
mod lexer;
mod row;
mod types;

pub use evaluator::evaluate;
pub use lexer::tokenize;
pub use row::{EmptyRow, Row};
pub use types::{Operator, Token, TokenKind};

use crate::error::ConditionError;

/// Decide whether `row` satisfies `condition`
pub fn resolve_condition<R: Row + ?Sized>(condition: &str, row: &R) -> Result<bool, ConditionError> {
    let tokens = tokenize(condition)?;
    evaluate(&tokens, row)
}

/// A condition tokenized once for a single table scan.
///
/// Which stack operations the evaluator performs depends only on the token
/// kinds, never on the row's values, so a stream that evaluates cleanly
/// against an empty row evaluates cleanly against every row.
#[derive(Debug, Clone)]
pub struct Condition {
    source: String,
    tokens: Vec<Token>,
}

impl Condition {
    /// Tokenize `source` and reject it if it is malformed
    pub fn parse(source: &str) -> Result<Self, ConditionError> {
        let tokens = tokenize(source)?;
        evaluate(&tokens, &EmptyRow)?;
        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    /// Evaluate against one row
    pub fn matches<R: Row + ?Sized>(&self, row: &R) -> Result<bool, ConditionError> {
        evaluate(&self.tokens, row)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_resolve_condition() {
        let mut row = HashMap::new();
        row.insert("id".to_string(), "1".to_string());
        assert_eq!(resolve_condition("(id='1')", &row), Ok(true));

        row.insert("id".to_string(), "2".to_string());
        assert_eq!(resolve_condition("(id='1')", &row), Ok(false));
    }

    #[test]
    fn test_resolve_condition_reports_lex_error() {
        assert!(matches!(
            resolve_condition("(id=\"1\")", &EmptyRow),
            Err(ConditionError::Lex { position: 4, .. })
        ));
    }

    #[test]
    fn test_condition_parse_rejects_malformed() {
        assert!(matches!(
            Condition::parse("(id='1'"),
            Err(ConditionError::MalformedExpression(_))
        ));
        assert!(matches!(
            Condition::parse("(id='1"),
            Err(ConditionError::Lex { .. })
        ));
    }

    #[test]
    fn test_condition_reused_across_rows() {
        let condition = Condition::parse("((age>'10')|(age<'5'))").unwrap();
        let rows: [&[(&str, &str)]; 3] = [&[("age", "3")], &[("age", "7")], &[("age", "50")]];
        let verdicts: Vec<bool> = rows
            .into_iter()
            .map(|row| condition.matches(row).unwrap())
            .collect();
        assert_eq!(verdicts, vec![true, false, true]);
        assert_eq!(condition.to_string(), "((age>'10')|(age<'5'))");
        assert_eq!(condition.tokens().len(), 13);
    }
}
