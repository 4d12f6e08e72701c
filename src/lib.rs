// SPDX-License-Identifier: MIT

//! rowstore-rs: a directory-backed record store with a string condition language

pub mod condition;
pub mod config;
pub mod error;
pub mod shell;
pub mod store;

pub use condition::{resolve_condition, Condition, Row};
pub use error::{ConditionError, ConfigError, ShellError, StoreError};
