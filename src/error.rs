// SPDX-License-Identifier: MIT

//! Typed error handling for rowstore-rs
//!
//! Condition failures, store failures and shell failures each get their own
//! `thiserror` enum. Errors from an inner layer convert into the outer one
//! with `#[from]`, so `?` carries them up to the command loop, which reports
//! them and moves on to the next command.

use thiserror::Error;

/// Errors produced while tokenizing or evaluating a condition string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// No tokenizer rule matched at `position`
    #[error("Unexpected input at position {position}: '{remaining}'")]
    Lex { position: usize, remaining: String },

    /// Unbalanced brackets, stack underflow or leftover stack contents
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// An operator token whose text is not a supported operator
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),
}

impl ConditionError {
    /// Create a lexing error at a byte offset of `input`
    pub fn lex(input: &str, position: usize) -> Self {
        Self::Lex {
            position,
            remaining: input[position..].to_string(),
        }
    }

    /// Create a malformed expression error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedExpression(message.into())
    }
}

/// Errors raised by tables and collections
#[derive(Debug, Error)]
pub enum StoreError {
    /// No table of that name in the collection
    #[error("No table called '{table}' in collection '{collection}'")]
    TableNotFound { table: String, collection: String },

    /// A table of that name already exists
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// The collection directory does not exist
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// A table needs at least one column
    #[error("Table '{0}' must have at least one column")]
    NoColumns(String),

    /// Column does not exist in the table
    #[error("Column '{column}' does not exist in table '{table}'")]
    UnknownColumn { column: String, table: String },

    /// Number of columns and values differ
    #[error("Provided {columns} columns but {values} values")]
    ColumnValueMismatch { columns: usize, values: usize },

    /// The largest stored id leaves no room for another
    #[error("Table '{0}' has no id left above its largest id")]
    IdExhausted(String),

    /// Table or collection names must be plain identifiers
    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    /// Condition could not be resolved
    #[error(transparent)]
    Condition(#[from] ConditionError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Delimited file errors
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// Create a table not found error
    pub fn table_not_found(table: impl Into<String>, collection: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
            collection: collection.into(),
        }
    }

    /// Create an unknown column error
    pub fn unknown_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            table: table.into(),
        }
    }
}

/// Errors raised while parsing or running a shell command
#[derive(Debug, Error)]
pub enum ShellError {
    /// Opcode not recognised
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Wrong number of arguments
    #[error("Expected {expected} arguments, got {got}")]
    WrongArgCount { expected: String, got: usize },

    /// Arguments present but not in the expected shape
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Rendering JSON output failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Create a wrong argument count error
    pub fn wrong_arg_count(expected: impl Into<String>, got: usize) -> Self {
        Self::WrongArgCount {
            expected: expected.into(),
            got,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Delimiter must be a single ASCII character
    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_carries_remaining_input() {
        let err = ConditionError::lex("(id = #x)", 6);
        assert_eq!(
            err,
            ConditionError::Lex {
                position: 6,
                remaining: "#x)".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unexpected input at position 6: '#x)'");
    }

    #[test]
    fn test_condition_error_into_store_error() {
        let err: StoreError = ConditionError::malformed("stack underflow").into();
        assert!(matches!(err, StoreError::Condition(_)));
        assert_eq!(err.to_string(), "Malformed expression: stack underflow");
    }

    #[test]
    fn test_store_error_messages() {
        assert_eq!(
            StoreError::table_not_found("users", "main").to_string(),
            "No table called 'users' in collection 'main'"
        );
        assert_eq!(
            StoreError::ColumnValueMismatch {
                columns: 2,
                values: 1
            }
            .to_string(),
            "Provided 2 columns but 1 values"
        );
    }

    #[test]
    fn test_shell_error_wraps_store_error() {
        let err: ShellError = StoreError::TableExists("users".into()).into();
        assert_eq!(err.to_string(), "Table 'users' already exists");
        assert_eq!(
            ShellError::wrong_arg_count("1", 3).to_string(),
            "Expected 1 arguments, got 3"
        );
    }
}
