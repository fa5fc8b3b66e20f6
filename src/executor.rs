//! The execution handle consumed by the CRUD operations.

use crate::error::SqlRecordError;
use crate::results::{DbRow, ResultSet};
use crate::value::SqlValue;

/// A handle capable of executing statements and queries.
///
/// The crate never implements connection management itself; anything that
/// can run a statement, a multi-row query, and an at-most-one-row query
/// can drive the CRUD operations. Backend errors pass through unchanged as
/// error variants.
pub trait SqlExecutor {
    /// Execute a DML statement and return the number of rows affected.
    #[allow(clippy::manual_async_fn)]
    fn execute_dml(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<u64, SqlRecordError>>;

    /// Execute a query and return all rows.
    #[allow(clippy::manual_async_fn)]
    fn execute_select(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<ResultSet, SqlRecordError>>;

    /// Execute a query expected to return at most one row; the first row
    /// is returned when there are several.
    #[allow(clippy::manual_async_fn)]
    fn execute_select_one(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<Option<DbRow>, SqlRecordError>>;
}
