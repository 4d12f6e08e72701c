// SPDX-License-Identifier: MIT

//! Record storage
//!
//! This module provides:
//! - `Table` - one delimited file with a header line of column names
//! - `Collection` - a directory of tables
//! - `RecordView` - a stored record exposed to the condition engine as a row

mod collection;
mod record;
mod table;

pub use collection::Collection;
pub use record::RecordView;
pub use table::{table_path, Table, ID_COLUMN, TABLE_EXTENSION};
