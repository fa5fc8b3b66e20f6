//! Map plain record structs to relational rows and back, and synthesize
//! the parameterized CRUD SQL in between.
//!
//! A record type implements [`Record`] once, listing its fields in
//! declaration order with optional annotations (`name,flag,...`). From
//! that, [`extract_table`] derives an ordered column list and primary key,
//! the [`statement`] module builds `$N`-placeholder SQL, and the [`ops`]
//! functions run it against any [`SqlExecutor`]:
//!
//! ```rust,no_run
//! use sql_record::prelude::*;
//!
//! #[derive(Default)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::scalar("id", "", &mut self.id),
//!             Field::scalar("name", "", &mut self.name),
//!         ]
//!     }
//! }
//!
//! # async fn demo(conn: &mut impl SqlExecutor) -> Result<(), SqlRecordError> {
//! let mut user = User { id: 0, name: "alice".into() };
//! insert(conn, "user", &mut user).await?; // id written back via RETURNING
//!
//! let mut found = User::default();
//! load(conn, "user", &mut found, &[SqlValue::Int(user.id)]).await?;
//! # Ok(()) }
//! ```
//!
//! Schemas are re-derived on every call and never cached; an extracted
//! [`Table`] borrows its record mutably, which is what lets generated keys
//! and scanned rows flow back into the caller's struct.

pub mod error;
pub mod executor;
pub mod extract;
pub mod ops;
pub mod prelude;
pub mod record;
pub mod results;
pub mod statement;
pub mod table;
pub mod tag;
pub mod value;

mod scan;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::SqlRecordError;
pub use executor::SqlExecutor;
pub use extract::extract_table;
pub use ops::{delete, insert, load, query_all, query_row, update};
pub use record::{Field, Record};
pub use results::{DbRow, ResultSet};
pub use table::{Column, Table};
pub use value::{SqlValue, ValueKind, ValueSlot};
