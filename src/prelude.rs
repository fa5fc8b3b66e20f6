//! Convenient imports for common functionality.

pub use crate::error::SqlRecordError;
pub use crate::executor::SqlExecutor;
pub use crate::extract::extract_table;
pub use crate::ops::{delete, insert, load, query_all, query_row, update};
pub use crate::record::{Field, Record};
pub use crate::results::{DbRow, ResultSet};
pub use crate::statement::{InsertStatement, Statement};
pub use crate::table::{Column, Table};
pub use crate::value::{SqlValue, ValueKind, ValueSlot};
