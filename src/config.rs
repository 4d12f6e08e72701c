// SPDX-License-Identifier: MIT

//! Store configuration
//!
//! Settings come from an optional YAML file, then the `COLLECTIONS_DIR`
//! environment variable (a `.env` file is honoured), then command-line flags,
//! each layer overriding the one before.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the directory that holds collections
pub const COLLECTIONS_DIR_ENV: &str = "COLLECTIONS_DIR";

/// Settings for the store and its shell
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StoreConfig {
    /// Directory holding one sub-directory per collection
    #[serde(default = "default_collections_dir")]
    pub collections_dir: PathBuf,
    /// Cell delimiter used in table files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// How `select` prints rows
    #[serde(default)]
    pub output: OutputFormat,
}

/// Output format for selected rows
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Delimited lines, header first
    #[default]
    Table,
    /// One JSON object per row
    Json,
}

fn default_collections_dir() -> PathBuf {
    PathBuf::from("collections")
}

fn default_delimiter() -> char {
    ','
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collections_dir: default_collections_dir(),
            delimiter: default_delimiter(),
            output: OutputFormat::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `COLLECTIONS_DIR` from the process environment, if set
    pub fn with_env(self) -> Self {
        self.with_collections_dir_override(std::env::var(COLLECTIONS_DIR_ENV).ok())
    }

    /// Replace the collections directory when `dir` is given and non-empty
    pub fn with_collections_dir_override(mut self, dir: Option<String>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.trim().is_empty()) {
            log::debug!("collections directory overridden: {}", dir);
            self.collections_dir = PathBuf::from(dir);
        }
        self
    }

    /// The delimiter as the single byte the table files use
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        self.validate()?;
        Ok(self.delimiter as u8)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let d = self.delimiter;
        if !d.is_ascii() || d.is_ascii_alphanumeric() || matches!(d, '"' | '\n' | '\r') {
            return Err(ConfigError::InvalidDelimiter(d.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.collections_dir, PathBuf::from("collections"));
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.output, OutputFormat::Table);
        assert_eq!(config.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
collections_dir: /var/lib/rowstore
delimiter: ";"
output: json
"#;
        let config = StoreConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.collections_dir, PathBuf::from("/var/lib/rowstore"));
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_parse_yaml_partial_uses_defaults() {
        let config = StoreConfig::parse_yaml("output: table\n").unwrap();
        assert_eq!(config.collections_dir, PathBuf::from("collections"));
        assert_eq!(config.delimiter, ',');
    }

    #[test]
    fn test_invalid_delimiter() {
        let result = StoreConfig::parse_yaml("delimiter: x\n");
        assert!(matches!(result, Err(ConfigError::InvalidDelimiter(_))));

        let result = StoreConfig::parse_yaml("delimiter: \"é\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidDelimiter(_))));
    }

    #[test]
    fn test_collections_dir_override() {
        let config = StoreConfig::default().with_collections_dir_override(Some("/tmp/x".into()));
        assert_eq!(config.collections_dir, PathBuf::from("/tmp/x"));

        let config = StoreConfig::default().with_collections_dir_override(Some("  ".into()));
        assert_eq!(config.collections_dir, PathBuf::from("collections"));

        let config = StoreConfig::default().with_collections_dir_override(None);
        assert_eq!(config.collections_dir, PathBuf::from("collections"));
    }
}
