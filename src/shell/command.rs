// SPDX-License-Identifier: MIT

//! Command line parsing for the store shell
//!
//! Commands look like:
//! - `createdb users id name age`
//! - `insert users name age | bob 30`
//! - `select users ((age>'10')|(age<'5'))`
//! - `update users age=31 | (name='bob')`
//! - `delete users (id='1')`

use crate::error::ShellError;
use std::str::FromStr;

/// Separates columns from values (insert) and assignments from the condition (update)
pub const SEPARATOR: &str = "|";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `createdb <table> <column>...`
    CreateTable { table: String, columns: Vec<String> },
    /// `dropdb <table>`
    DropTable { table: String },
    /// `renamedb <old> <new>`
    RenameTable { from: String, to: String },
    /// `listdbs`
    ListTables,
    /// `columns <table>`
    Columns { table: String },
    /// `insert <table> <column>... | <value>...`
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<String>,
    },
    /// `select <table> [condition]`
    Select {
        table: String,
        condition: Option<String>,
    },
    /// `update <table> <column>=<value>... [| condition]`
    Update {
        table: String,
        assignments: Vec<(String, String)>,
        condition: Option<String>,
    },
    /// `delete <table> [condition]`
    Delete {
        table: String,
        condition: Option<String>,
    },
    /// `exit`
    Exit,
}

impl FromStr for Command {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (opcode, rest) =
            next_word(line).ok_or_else(|| ShellError::InvalidCommand(String::new()))?;
        let args: Vec<&str> = rest.split_whitespace().collect();

        match opcode {
            "createdb" => {
                if args.len() < 2 {
                    return Err(ShellError::wrong_arg_count("at least 2", args.len()));
                }
                Ok(Command::CreateTable {
                    table: args[0].to_string(),
                    columns: to_strings(&args[1..]),
                })
            }
            "dropdb" => {
                expect_args(&args, 1)?;
                Ok(Command::DropTable {
                    table: args[0].to_string(),
                })
            }
            "renamedb" => {
                expect_args(&args, 2)?;
                Ok(Command::RenameTable {
                    from: args[0].to_string(),
                    to: args[1].to_string(),
                })
            }
            "listdbs" => {
                expect_args(&args, 0)?;
                Ok(Command::ListTables)
            }
            "columns" => {
                expect_args(&args, 1)?;
                Ok(Command::Columns {
                    table: args[0].to_string(),
                })
            }
            "insert" => {
                let (table, rest) = table_and_rest(rest)?;
                let (columns, values) = split_at_separator(rest).ok_or_else(|| {
                    ShellError::InvalidArguments(format!(
                        "insert needs '{}' between columns and values",
                        SEPARATOR
                    ))
                })?;
                Ok(Command::Insert {
                    table,
                    columns: columns.split_whitespace().map(str::to_string).collect(),
                    values: values.split_whitespace().map(str::to_string).collect(),
                })
            }
            "select" => {
                let (table, rest) = table_and_rest(rest)?;
                Ok(Command::Select {
                    table,
                    condition: condition_text(rest),
                })
            }
            "update" => {
                let (table, rest) = table_and_rest(rest)?;
                let (assignments, condition) = match split_at_separator(rest) {
                    Some((assignments, condition)) => (assignments, condition_text(condition)),
                    None => (rest, None),
                };
                let assignments = assignments
                    .split_whitespace()
                    .map(parse_assignment)
                    .collect::<Result<Vec<_>, _>>()?;
                if assignments.is_empty() {
                    return Err(ShellError::InvalidArguments(
                        "update needs at least one <column>=<value>".to_string(),
                    ));
                }
                Ok(Command::Update {
                    table,
                    assignments,
                    condition,
                })
            }
            "delete" => {
                let (table, rest) = table_and_rest(rest)?;
                Ok(Command::Delete {
                    table,
                    condition: condition_text(rest),
                })
            }
            "exit" => Ok(Command::Exit),
            other => Err(ShellError::InvalidCommand(other.to_string())),
        }
    }
}

/// Split off the first whitespace-delimited word
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some((&input[..end], &input[end..]))
}

/// Split at the first standalone separator word
fn split_at_separator(input: &str) -> Option<(&str, &str)> {
    let mut rest = input;
    while let Some((word, after)) = next_word(rest) {
        if word == SEPARATOR {
            let end = input.len() - after.len() - SEPARATOR.len();
            return Some((&input[..end], after));
        }
        rest = after;
    }
    None
}

fn table_and_rest(rest: &str) -> Result<(String, &str), ShellError> {
    next_word(rest)
        .map(|(table, rest)| (table.to_string(), rest))
        .ok_or_else(|| ShellError::wrong_arg_count("at least 1", 0))
}

/// Conditions keep their inner whitespace; an empty one means "every row"
fn condition_text(rest: &str) -> Option<String> {
    let condition = rest.trim();
    (!condition.is_empty()).then(|| condition.to_string())
}

fn parse_assignment(word: &str) -> Result<(String, String), ShellError> {
    word.split_once('=')
        .filter(|(column, _)| !column.is_empty())
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .ok_or_else(|| {
            ShellError::InvalidArguments(format!("expected <column>=<value>, got '{}'", word))
        })
}

fn expect_args(args: &[&str], expected: usize) -> Result<(), ShellError> {
    if args.len() != expected {
        return Err(ShellError::wrong_arg_count(expected.to_string(), args.len()));
    }
    Ok(())
}

fn to_strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
