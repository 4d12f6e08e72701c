// SPDX-License-Identifier: MIT

//! Borrowed view of one stored record

use crate::condition::Row;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One record paired with its table's column order.
///
/// This is the row type the store hands to the condition engine; it borrows
/// both halves, so a scan never builds a map per record.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> RecordView<'a> {
    pub fn new(columns: &'a [String], values: &'a [String]) -> Self {
        Self { columns, values }
    }

    /// (column, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let values = self.values;
        self.columns
            .iter()
            .enumerate()
            .map(move |(i, c)| (c.as_str(), values.get(i).map_or("", String::as_str)))
    }
}

impl Row for RecordView<'_> {
    fn get(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        Some(self.values.get(index).map_or("", String::as_str))
    }
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
