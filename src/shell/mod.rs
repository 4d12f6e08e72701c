// SPDX-License-Identifier: MIT

//! Line-oriented command shell over one collection

mod command;

pub use command::{Command, SEPARATOR};

use crate::config::OutputFormat;
use crate::error::ShellError;
use crate::store::{Collection, Table};
use std::io::{self, BufRead, Write};

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the user (may be empty)
    Output(String),
    /// Leave the command loop
    Exit,
}

/// Executes commands against the active collection
#[derive(Debug)]
pub struct Shell {
    collection: Collection,
    output: OutputFormat,
}

impl Shell {
    pub fn new(collection: Collection, output: OutputFormat) -> Self {
        Self { collection, output }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Parse and execute one line
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let command: Command = line.parse()?;
        self.execute(command)
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Result<Outcome, ShellError> {
        log::debug!("executing {:?}", command);
        let output = match command {
            Command::CreateTable { table, columns } => {
                self.collection.create_table(&table, columns)?;
                format!("Created table '{}'", table)
            }
            Command::DropTable { table } => {
                self.collection.drop_table(&table)?;
                format!("Dropped table '{}'", table)
            }
            Command::RenameTable { from, to } => {
                self.collection.rename_table(&from, &to)?;
                format!("Renamed table '{}' to '{}'", from, to)
            }
            Command::ListTables => self.collection.table_names().join("\n"),
            Command::Columns { table } => self.collection.table(&table)?.columns().join("\n"),
            Command::Insert {
                table,
                columns,
                values,
            } => {
                let record = self.collection.table(&table)?.insert(&columns, &values)?;
                format!("Inserted 1 row: {}", record.join(", "))
            }
            Command::Select { table, condition } => {
                let table = self.collection.table(&table)?;
                let records = table.select(condition.as_deref())?;
                self.render(table, &records)?
            }
            Command::Update {
                table,
                assignments,
                condition,
            } => {
                let updated = self
                    .collection
                    .table(&table)?
                    .update(&assignments, condition.as_deref())?;
                format!("Updated {} row(s)", updated)
            }
            Command::Delete { table, condition } => {
                let deleted = self
                    .collection
                    .table(&table)?
                    .delete(condition.as_deref())?;
                format!("Deleted {} row(s)", deleted)
            }
            Command::Exit => return Ok(Outcome::Exit),
        };
        Ok(Outcome::Output(output))
    }

    /// Read commands from `input` until `exit` or end of input.
    ///
    /// A failing command is reported on `output` and the loop carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                match self.execute_line(&line) {
                    Ok(Outcome::Exit) => {
                        writeln!(output, "Exiting...")?;
                        return Ok(());
                    }
                    Ok(Outcome::Output(text)) if text.is_empty() => {}
                    Ok(Outcome::Output(text)) => writeln!(output, "{}", text)?,
                    Err(e) => {
                        log::warn!("command rejected: {:?}: {}", line, e);
                        writeln!(output, "ERROR: {}", e)?;
                    }
                }
            }
            write!(output, "> ")?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn render(&self, table: &Table, records: &[Vec<String>]) -> Result<String, ShellError> {
        let lines = match self.output {
            OutputFormat::Table => std::iter::once(table.columns().join(" | "))
                .chain(records.iter().map(|r| r.join(" | ")))
                .collect::<Vec<_>>(),
            OutputFormat::Json => records
                .iter()
                .map(|r| serde_json::to_string(&table.view(r)))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(lines.join("\n"))
    }
}
