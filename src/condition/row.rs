// SPDX-License-Identifier: MIT

//! Read-only column lookup used by the evaluator

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A mapping from column name to cell value for one record.
///
/// The evaluator only reads through this trait, so any lookup structure can
/// be evaluated against without copying it into a map first.
pub trait Row {
    /// Value stored under `column`, if the row has that column
    fn get(&self, column: &str) -> Option<&str>;
}

impl<S: BuildHasher> Row for HashMap<String, String, S> {
    fn get(&self, column: &str) -> Option<&str> {
        HashMap::get(self, column).map(String::as_str)
    }
}

impl Row for BTreeMap<String, String> {
    fn get(&self, column: &str) -> Option<&str> {
        BTreeMap::get(self, column).map(String::as_str)
    }
}

impl Row for [(&str, &str)] {
    fn get(&self, column: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }
}

/// A row with no columns; every lookup misses
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRow;

impl Row for EmptyRow {
    fn get(&self, _column: &str) -> Option<&str> {
        None
    }
}
