// SPDX-License-Identifier: MIT

//! Stack-machine evaluator for tokenized conditions
//!
//! Operators and opening brackets wait on the symbol stack until a closing
//! bracket resolves them. Comparisons consume two strings from the operand
//! stack, connectives consume two booleans from the boolean stack, and both
//! push their verdict onto the boolean stack. Nothing is resolved without an
//! explicit `)`, so every binary application must be written as `(A op B)`.

use super::row::Row;
use super::types::{Operator, Token, TokenKind};
use crate::error::ConditionError;

/// Pending entries on the symbol stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Operator(Operator),
    OpeningBracket,
}

/// Evaluate a token stream against one row
pub fn evaluate<R: Row + ?Sized>(tokens: &[Token], row: &R) -> Result<bool, ConditionError> {
    let mut symbols: Vec<Symbol> = Vec::new();
    let mut operands: Vec<&str> = Vec::new();
    let mut booleans: Vec<bool> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Operator => symbols.push(Symbol::Operator(token.content.parse()?)),
            TokenKind::OpeningBracket => symbols.push(Symbol::OpeningBracket),
            TokenKind::ColumnOperand => operands.push(row.get(&token.content).unwrap_or("")),
            TokenKind::LiteralOperand => operands.push(token.value()),
            TokenKind::ClosingBracket => {
                let op = match symbols.pop() {
                    Some(Symbol::Operator(op)) => op,
                    Some(Symbol::OpeningBracket) => {
                        return Err(malformed_at(token, "bracket closes without an operator"));
                    }
                    None => return Err(malformed_at(token, "unbalanced closing bracket")),
                };
                if symbols.pop() != Some(Symbol::OpeningBracket) {
                    return Err(malformed_at(
                        token,
                        format!("operator '{}' is not directly inside a bracket", op),
                    ));
                }

                let result = if op.is_connective() {
                    let (left, right) = pop_pair(&mut booleans).ok_or_else(|| {
                        malformed_at(token, format!("'{}' needs two boolean operands", op))
                    })?;
                    op.connect(left, right)
                } else {
                    let (left, right) = pop_pair(&mut operands).ok_or_else(|| {
                        malformed_at(token, format!("'{}' needs two value operands", op))
                    })?;
                    op.compare(left, right)
                };
                let verdict = result
                    .ok_or_else(|| malformed_at(token, format!("'{}' cannot be applied", op)))?;
                booleans.push(verdict);
            }
        }
    }

    if !symbols.is_empty() {
        return Err(ConditionError::malformed(format!(
            "{} unresolved operator(s) or bracket(s)",
            symbols.len()
        )));
    }
    if !operands.is_empty() {
        return Err(ConditionError::malformed(format!(
            "{} operand(s) not consumed by any comparison",
            operands.len()
        )));
    }
    match booleans.as_slice() {
        [verdict] => Ok(*verdict),
        [] => Err(ConditionError::malformed("expression produced no result")),
        many => Err(ConditionError::malformed(format!(
            "expression produced {} results, expected one",
            many.len()
        ))),
    }
}

/// Pop `(left, right)`, where `left` was pushed first.
fn pop_pair<T>(stack: &mut Vec<T>) -> Option<(T, T)> {
    if stack.len() < 2 {
        return None;
    }
    let right = stack.pop()?;
    let left = stack.pop()?;
    Some((left, right))
}

fn malformed_at(token: &Token, message: impl std::fmt::Display) -> ConditionError {
    ConditionError::malformed(format!("{} at position {}", message, token.offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::lexer::tokenize;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn eval(condition: &str, pairs: &[(&str, &str)]) -> Result<bool, ConditionError> {
        evaluate(&tokenize(condition).unwrap(), &row(pairs))
    }

    #[test]
    fn test_equality() {
        assert!(eval("(id='1')", &[("id", "1")]).unwrap());
        assert!(!eval("(id='1')", &[("id", "2")]).unwrap());
    }

    #[test]
    fn test_not_equal() {
        assert!(eval("(status != 'done')", &[("status", "pending")]).unwrap());
        assert!(!eval("(status != 'done')", &[("status", "done")]).unwrap());
    }

    #[test]
    fn test_left_operand_is_pushed_first() {
        assert!(eval("(a<b)", &[("a", "apple"), ("b", "banana")]).unwrap());
        assert!(!eval("(b<a)", &[("a", "apple"), ("b", "banana")]).unwrap());
        assert!(eval("('b'>a)", &[("a", "a")]).unwrap());
    }

    #[test]
    fn test_ordering_is_lexicographic_not_numeric() {
        assert!(eval("(n<'9')", &[("n", "10")]).unwrap());
        assert!(!eval("(n>'9')", &[("n", "10")]).unwrap());
        assert!(eval("(n>='10')", &[("n", "10")]).unwrap());
        assert!(eval("(n<='10')", &[("n", "10")]).unwrap());
    }

    #[test]
    fn test_and_expression() {
        let condition = "((id='1')&(name='bob'))";
        assert!(eval(condition, &[("id", "1"), ("name", "bob")]).unwrap());
        assert!(!eval(condition, &[("id", "1"), ("name", "alice")]).unwrap());
    }

    #[test]
    fn test_or_expression() {
        let condition = "((age>'10')|(age<'5'))";
        assert!(eval(condition, &[("age", "3")]).unwrap());
        assert!(eval(condition, &[("age", "7")]).unwrap());
        assert!(!eval(condition, &[("age", "10")]).unwrap());
    }

    #[test]
    fn test_nested_connectives() {
        let condition = "(((a='1')|(b='1'))&((c='1')|(d='1')))";
        assert!(eval(condition, &[("b", "1"), ("c", "1")]).unwrap());
        assert!(!eval(condition, &[("a", "1"), ("b", "1")]).unwrap());
    }

    #[test]
    fn test_missing_column_is_empty_string() {
        assert!(eval("(missingcol='')", &[]).unwrap());
        assert!(!eval("(missingcol='x')", &[]).unwrap());
    }

    #[test]
    fn test_column_against_column() {
        assert!(eval("(a=b)", &[("a", "x"), ("b", "x")]).unwrap());
        assert!(eval("(a=b)", &[]).unwrap());
    }

    #[test]
    fn test_literal_with_whitespace() {
        assert!(eval("(name='john smith')", &[("name", "john smith")]).unwrap());
        assert!(!eval("(name='john smith')", &[("name", "john")]).unwrap());
    }

    #[test]
    fn test_incomplete_expression_is_malformed() {
        assert!(matches!(
            eval("(id=", &[("id", "1")]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_unparenthesized_chain_is_rejected() {
        assert!(matches!(
            eval("id='1'", &[("id", "1")]),
            Err(ConditionError::MalformedExpression(_))
        ));
        assert!(matches!(
            eval("(a='1'&b='2')", &[("a", "1"), ("b", "2")]),
            Err(ConditionError::MalformedExpression(_))
        ));
        assert!(matches!(
            eval("(a='1')&(b='2')", &[("a", "1"), ("b", "2")]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_bare_operand_is_malformed() {
        assert!(matches!(
            eval("id", &[("id", "1")]),
            Err(ConditionError::MalformedExpression(_))
        ));
        assert!(matches!(
            eval("(id)", &[("id", "1")]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_empty_condition_is_malformed() {
        assert!(matches!(
            eval("", &[]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_unbalanced_closing_bracket() {
        assert!(matches!(
            eval("(a='1'))", &[]),
            Err(ConditionError::MalformedExpression(_))
        ));
        assert!(matches!(
            eval(")", &[]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_connective_over_strings_is_malformed() {
        assert!(matches!(
            eval("(a&b)", &[]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_comparison_over_booleans_is_malformed() {
        assert!(matches!(
            eval("((a='1')=(b='1'))", &[]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_doubled_operator_is_malformed() {
        assert!(matches!(
            eval("(a = = b)", &[]),
            Err(ConditionError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_unknown_operator_text() {
        let tokens = vec![
            Token::new("(", TokenKind::OpeningBracket, 0),
            Token::new("a", TokenKind::ColumnOperand, 1),
            Token::new("~", TokenKind::Operator, 2),
            Token::new("b", TokenKind::ColumnOperand, 3),
            Token::new(")", TokenKind::ClosingBracket, 4),
        ];
        assert_eq!(
            evaluate(&tokens, &row(&[])),
            Err(ConditionError::UnknownOperator("~".to_string()))
        );
    }
}
