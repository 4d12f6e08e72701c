// SPDX-License-Identifier: MIT

//! Delimited-file tables
//!
//! A table is one file: a header line naming the columns, then one record
//! per line. Inserts append; updates and deletes rewrite the file.

use super::record::RecordView;
use crate::condition::Condition;
use crate::error::StoreError;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// File extension of table files
pub const TABLE_EXTENSION: &str = "csv";

/// Column that receives an auto-incremented value when left out of an insert
pub const ID_COLUMN: &str = "id";

/// A table stored as a single delimited file
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    path: PathBuf,
    columns: Vec<String>,
    delimiter: u8,
}

impl Table {
    /// Create a new, empty table file in `dir`
    pub fn create(
        dir: &Path,
        name: &str,
        columns: Vec<String>,
        delimiter: u8,
    ) -> Result<Self, StoreError> {
        validate_name(name)?;
        if columns.is_empty() {
            return Err(StoreError::NoColumns(name.to_string()));
        }
        for (i, column) in columns.iter().enumerate() {
            if !is_column_name(column) || columns[..i].contains(column) {
                return Err(StoreError::InvalidName(column.clone()));
            }
        }

        let path = table_path(dir, name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => StoreError::TableExists(name.to_string()),
                _ => StoreError::Io(e),
            })?;

        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&columns)?;
        writer.flush()?;

        log::info!("created table '{}' with columns {:?}", name, columns);
        Ok(Self {
            name: name.to_string(),
            path,
            columns,
            delimiter,
        })
    }

    /// Open an existing table file, reading its columns from the header line
    pub fn open<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| StoreError::InvalidName(path.display().to_string()))?
            .to_string();

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_path(&path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(StoreError::NoColumns(name));
        }

        log::debug!("opened table '{}' ({} columns)", name, columns.len());
        Ok(Self {
            name,
            path,
            columns,
            delimiter,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Append one record.
    ///
    /// `values[i]` goes into `columns[i]`; table columns not named are left
    /// empty, except `id`, which gets one more than the largest numeric id
    /// already stored. Returns the record as written.
    pub fn insert(&self, columns: &[String], values: &[String]) -> Result<Vec<String>, StoreError> {
        if columns.len() != values.len() {
            return Err(StoreError::ColumnValueMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        for column in columns {
            self.column_index(column)?;
        }

        let mut record = vec![String::new(); self.columns.len()];
        for (column, value) in columns.iter().zip(values) {
            let index = self.column_index(column)?;
            record[index] = value.clone();
        }
        if let Some(index) = self.columns.iter().position(|c| c == ID_COLUMN) {
            if !columns.iter().any(|c| c == ID_COLUMN) {
                record[index] = self.next_id(index)?.to_string();
            }
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&record)?;
        writer.flush()?;

        log::info!("inserted into '{}': {:?}", self.name, record);
        Ok(record)
    }

    /// Records matching `condition`, in file order. No condition matches all.
    pub fn select(&self, condition: Option<&str>) -> Result<Vec<Vec<String>>, StoreError> {
        let condition = parse_condition(condition)?;
        let mut selected = Vec::new();
        for record in self.read_records()? {
            if self.matches(condition.as_ref(), &record)? {
                selected.push(record);
            }
        }
        log::debug!("selected {} record(s) from '{}'", selected.len(), self.name);
        Ok(selected)
    }

    /// Set `assignments` on every record matching `condition`.
    ///
    /// Returns the number of records changed. Every record is evaluated
    /// before the file is rewritten.
    pub fn update(
        &self,
        assignments: &[(String, String)],
        condition: Option<&str>,
    ) -> Result<usize, StoreError> {
        let targets = assignments
            .iter()
            .map(|(column, value)| self.column_index(column).map(|index| (index, value)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        let condition = parse_condition(condition)?;

        let mut records = self.read_records()?;
        let mut updated = 0;
        for record in &mut records {
            if self.matches(condition.as_ref(), record)? {
                for (index, value) in &targets {
                    record[*index] = (*value).clone();
                }
                updated += 1;
            }
        }

        if updated > 0 {
            self.rewrite(&records)?;
        }
        log::info!("updated {} record(s) in '{}'", updated, self.name);
        Ok(updated)
    }

    /// Remove every record matching `condition`; returns how many were removed
    pub fn delete(&self, condition: Option<&str>) -> Result<usize, StoreError> {
        let condition = parse_condition(condition)?;

        let records = self.read_records()?;
        let total = records.len();
        let mut kept = Vec::with_capacity(total);
        for record in records {
            if !self.matches(condition.as_ref(), &record)? {
                kept.push(record);
            }
        }

        let deleted = total - kept.len();
        if deleted > 0 {
            self.rewrite(&kept)?;
        }
        log::info!("deleted {} record(s) from '{}'", deleted, self.name);
        Ok(deleted)
    }

    /// Move the table file to `new_name` in the same directory
    pub fn rename(&mut self, new_name: &str) -> Result<(), StoreError> {
        validate_name(new_name)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let new_path = table_path(dir, new_name);
        if new_path.exists() {
            return Err(StoreError::TableExists(new_name.to_string()));
        }
        fs::rename(&self.path, &new_path)?;

        log::info!("renamed table '{}' to '{}'", self.name, new_name);
        self.name = new_name.to_string();
        self.path = new_path;
        Ok(())
    }

    /// Delete the table file
    pub fn drop_file(&self) -> Result<(), StoreError> {
        fs::remove_file(&self.path)?;
        log::info!("dropped table '{}'", self.name);
        Ok(())
    }

    /// Borrow `values` as a row of this table
    pub fn view<'a>(&'a self, values: &'a [String]) -> RecordView<'a> {
        RecordView::new(&self.columns, values)
    }

    fn matches(&self, condition: Option<&Condition>, values: &[String]) -> Result<bool, StoreError> {
        match condition {
            Some(condition) => Ok(condition.matches(&self.view(values))?),
            None => Ok(true),
        }
    }

    fn column_index(&self, column: &str) -> Result<usize, StoreError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| StoreError::unknown_column(column, &self.name))
    }

    fn next_id(&self, index: usize) -> Result<u64, StoreError> {
        let max = self
            .read_records()?
            .iter()
            .filter_map(|record| record[index].parse::<u64>().ok())
            .max();
        match max {
            None => Ok(1),
            Some(m) => m
                .checked_add(1)
                .ok_or_else(|| StoreError::IdExhausted(self.name.clone())),
        }
    }

    /// All records, padded or truncated to the table's column count
    fn read_records(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let width = self.columns.len();
        let mut records = Vec::new();
        for result in reader.records() {
            let record: StringRecord = result?;
            let mut values: Vec<String> = record.iter().take(width).map(str::to_string).collect();
            values.resize(width, String::new());
            records.push(values);
        }
        Ok(records)
    }

    /// Replace the file contents through a temporary sibling file
    fn rewrite(&self, records: &[Vec<String>]) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension(format!("{}.tmp", TABLE_EXTENSION));
        {
            let file = File::create(&tmp_path)?;
            let mut writer = WriterBuilder::new()
                .delimiter(self.delimiter)
                .has_headers(false)
                .from_writer(file);
            writer.write_record(&self.columns)?;
            for record in records {
                writer.write_record(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Path of the file backing table `name` in `dir`
pub fn table_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, TABLE_EXTENSION))
}

/// Table and collection names: letters, digits, `_` and `-`
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Column names must be referable from a condition
fn is_column_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_condition(condition: Option<&str>) -> Result<Option<Condition>, StoreError> {
    condition
        .filter(|c| !c.trim().is_empty())
        .map(Condition::parse)
        .transpose()
        .map_err(StoreError::from)
}
