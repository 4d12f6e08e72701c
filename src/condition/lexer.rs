// SPDX-License-Identifier: MIT

//! Condition string tokenizer
//!
//! Turns strings like `((id='1')&(name='bob'))` into a flat token stream.
//! Every rule is anchored at the cursor and the rules' first characters are
//! pairwise disjoint, so at most one rule can match at any position.

use super::types::{Token, TokenKind};
use crate::error::ConditionError;
use once_cell::sync::Lazy;
use regex::Regex;

/// What to do with the text a rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Emit(TokenKind),
    Skip,
}

/// Ordered rule table, compiled once per process.
static RULES: Lazy<Vec<(Lexeme, Regex)>> = Lazy::new(|| {
    [
        (Lexeme::Emit(TokenKind::Operator), r"^(?:[<>]=?|!?=|&|\|)"),
        (Lexeme::Emit(TokenKind::OpeningBracket), r"^\("),
        (Lexeme::Emit(TokenKind::ClosingBracket), r"^\)"),
        (Lexeme::Skip, r"^\s+"),
        (Lexeme::Emit(TokenKind::LiteralOperand), r"^'[^']*'"),
        (Lexeme::Emit(TokenKind::ColumnOperand), r"^[A-Za-z0-9_]+"),
    ]
    .into_iter()
    .map(|(lexeme, pattern)| (lexeme, Regex::new(pattern).expect("valid token rule")))
    .collect()
});

/// Tokenize a condition string.
///
/// Whitespace between tokens is dropped. Fails on the first position where
/// no rule matches, without returning any partial stream.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while cursor < input.len() {
        let remaining = &input[cursor..];
        let (lexeme, len) = match_rule(remaining).ok_or_else(|| {
            log::debug!("no token rule matches at {} in {:?}", cursor, input);
            ConditionError::lex(input, cursor)
        })?;

        if let Lexeme::Emit(kind) = lexeme {
            tokens.push(Token::new(&remaining[..len], kind, cursor));
        }
        cursor += len;
    }

    log::trace!("tokenized {:?} into {} tokens", input, tokens.len());
    Ok(tokens)
}

fn match_rule(remaining: &str) -> Option<(Lexeme, usize)> {
    RULES.iter().find_map(|(lexeme, rule)| {
        rule.find(remaining)
            .filter(|m| m.start() == 0 && !m.is_empty())
            .map(|m| (*lexeme, m.end()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn contents(input: &str) -> Vec<String> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.content)
            .collect()
    }

    #[test]
    fn test_tokenize_simple_comparison() {
        assert_eq!(
            kinds("(id='1')"),
            vec![
                TokenKind::OpeningBracket,
                TokenKind::ColumnOperand,
                TokenKind::Operator,
                TokenKind::LiteralOperand,
                TokenKind::ClosingBracket,
            ]
        );
        assert_eq!(contents("(id='1')"), vec!["(", "id", "=", "'1'", ")"]);
    }

    #[test]
    fn test_tokenize_all_operators() {
        assert_eq!(
            contents("a<b<=c>d>=e=f!=g&h|i"),
            vec![
                "a", "<", "b", "<=", "c", ">", "d", ">=", "e", "=", "f", "!=", "g", "&", "h", "|",
                "i"
            ]
        );
    }

    #[test]
    fn test_whitespace_is_dropped() {
        assert_eq!(
            contents(" ( age \t>=\n'10' ) "),
            vec!["(", "age", ">=", "'10'", ")"]
        );
        assert!(tokenize("   ").unwrap().is_empty());
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_literal_keeps_inner_whitespace() {
        let tokens = tokenize("(name='john smith')").unwrap();
        let literal = &tokens[3];
        assert_eq!(literal.kind, TokenKind::LiteralOperand);
        assert_eq!(literal.content, "'john smith'");
        assert_eq!(literal.value(), "john smith");
        assert_eq!(literal.offset, 6);
    }

    #[test]
    fn test_literal_may_hold_operator_characters() {
        let tokens = tokenize("(x='a(b)|c&d')").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[3].value(), "a(b)|c&d");
    }

    #[test]
    fn test_column_names_use_word_characters() {
        assert_eq!(contents("first_name2"), vec!["first_name2"]);
        assert_eq!(kinds("123"), vec![TokenKind::ColumnOperand]);
    }

    #[test]
    fn test_lex_error_on_unknown_character() {
        let err = tokenize("(id # '1')").unwrap_err();
        assert_eq!(
            err,
            ConditionError::Lex {
                position: 4,
                remaining: "# '1')".to_string()
            }
        );
    }

    #[test]
    fn test_lex_error_on_unterminated_literal() {
        let err = tokenize("(name='bob)").unwrap_err();
        assert!(matches!(err, ConditionError::Lex { position: 6, .. }));
    }

    #[test]
    fn test_lex_error_on_bare_bang() {
        assert!(matches!(
            tokenize("(a ! b)"),
            Err(ConditionError::Lex { position: 3, .. })
        ));
    }

    #[test]
    fn test_lex_error_on_non_ascii_word() {
        assert!(tokenize("(café='x')").is_err());
    }

    #[test]
    fn test_rules_are_disjoint() {
        let corpus = [
            "((id='1')&(name='bob'))",
            "((age>'10')|(age<'5'))",
            "(name != 'john smith')",
            "(a<=b)>=(c)",
            "  \t(x='(|&)')\n",
            "(missingcol='')",
        ];
        for input in corpus {
            for (pos, _) in input.char_indices() {
                let remaining = &input[pos..];
                let matching = RULES
                    .iter()
                    .filter(|(_, rule)| rule.is_match(remaining))
                    .count();
                assert!(
                    matching <= 1,
                    "{} rules match at {} in {:?}",
                    matching,
                    pos,
                    input
                );
            }
        }
    }
}
