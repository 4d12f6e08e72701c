// SPDX-License-Identifier: MIT

//! Collections: a directory of tables
//!
//! Every `<name>.csv` file directly inside the collection directory is one
//! table. The collection keeps an index of the tables it has opened so that
//! commands can look them up by name.

use super::table::{table_path, validate_name, Table, TABLE_EXTENSION};
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A named group of tables backed by one directory
#[derive(Debug)]
pub struct Collection {
    name: String,
    path: PathBuf,
    delimiter: u8,
    tables: BTreeMap<String, Table>,
}

impl Collection {
    /// Load an existing collection from `root/name`
    pub fn open(root: &Path, name: &str, delimiter: u8) -> Result<Self, StoreError> {
        validate_name(name)?;
        let path = root.join(name);
        if !path.is_dir() {
            return Err(StoreError::CollectionNotFound(name.to_string()));
        }

        let mut tables = BTreeMap::new();
        for entry in fs::read_dir(&path)? {
            let file = entry?.path();
            let is_table = file.is_file()
                && file.extension().and_then(|e| e.to_str()) == Some(TABLE_EXTENSION);
            if !is_table {
                continue;
            }
            match Table::open(&file, delimiter) {
                Ok(table) => {
                    tables.insert(table.name().to_string(), table);
                }
                Err(e) => log::warn!("skipping unreadable table {}: {}", file.display(), e),
            }
        }

        log::info!("loaded collection '{}' ({} tables)", name, tables.len());
        Ok(Self {
            name: name.to_string(),
            path,
            delimiter,
            tables,
        })
    }

    /// Create a new, empty collection directory at `root/name`
    pub fn create(root: &Path, name: &str, delimiter: u8) -> Result<Self, StoreError> {
        validate_name(name)?;
        fs::create_dir_all(root)?;
        let path = root.join(name);
        fs::create_dir(&path)?;

        log::info!("created collection '{}' at {}", name, path.display());
        Ok(Self {
            name: name.to_string(),
            path,
            delimiter,
            tables: BTreeMap::new(),
        })
    }

    /// Open `root/name`, creating it if it does not exist.
    ///
    /// The flag is `true` when the collection was newly created.
    pub fn open_or_create(
        root: &Path,
        name: &str,
        delimiter: u8,
    ) -> Result<(Self, bool), StoreError> {
        match Self::open(root, name, delimiter) {
            Ok(collection) => Ok((collection, false)),
            Err(StoreError::CollectionNotFound(_)) => Ok((Self::create(root, name, delimiter)?, true)),
            Err(e) => Err(e),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a table and add it to the collection
    pub fn create_table(&mut self, name: &str, columns: Vec<String>) -> Result<&Table, StoreError> {
        if self.tables.contains_key(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }
        let table = Table::create(&self.path, name, columns, self.delimiter)?;
        Ok(&*self.tables.entry(name.to_string()).or_insert(table))
    }

    /// Delete a table's file and remove it from the collection
    pub fn drop_table(&mut self, name: &str) -> Result<(), StoreError> {
        self.table(name)?.drop_file()?;
        self.tables.remove(name);
        Ok(())
    }

    /// Rename a table, moving its file
    pub fn rename_table(&mut self, old_name: &str, new_name: &str) -> Result<(), StoreError> {
        if self.tables.contains_key(new_name) {
            return Err(StoreError::TableExists(new_name.to_string()));
        }
        let mut table = self
            .tables
            .remove(old_name)
            .ok_or_else(|| StoreError::table_not_found(old_name, &self.name))?;

        if let Err(e) = table.rename(new_name) {
            self.tables.insert(old_name.to_string(), table);
            return Err(e);
        }
        self.tables.insert(new_name.to_string(), table);
        Ok(())
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::table_not_found(name, &self.name))
    }

    /// Whether the collection directory has a file for `name`
    pub fn has_table_file(&self, name: &str) -> bool {
        table_path(&self.path, name).is_file()
    }
}
