//! CRUD operations: extraction + statement building + scanning, driven
//! through a caller-supplied [`SqlExecutor`].

use tracing::debug;

use crate::error::SqlRecordError;
use crate::executor::SqlExecutor;
use crate::extract::extract_table;
use crate::record::Record;
use crate::scan::scan_row;
use crate::statement::{delete_statement, insert_statement, load_statement, update_statement};
use crate::value::SqlValue;

/// Insert `record` into `table_name`.
///
/// When the primary keys are server-generated (see
/// [`insert_statement`](crate::statement::insert_statement)), the values
/// returned by the database are written back into the record's key fields.
///
/// # Errors
/// Extraction failures (`NoPrimaryKey`) abort before anything executes;
/// executor failures pass through. A RETURNING clause that yields no row is
/// an `Execution` error.
pub async fn insert<E: SqlExecutor>(
    executor: &mut E,
    table_name: &str,
    record: &mut dyn Record,
) -> Result<(), SqlRecordError> {
    let mut table = extract_table(record, false)?;
    let stmt = insert_statement(&table, table_name);
    debug!(sql = %stmt.sql, "insert");

    if stmt.returns_keys {
        let row = executor
            .execute_select_one(&stmt.sql, &stmt.params)
            .await?
            .ok_or_else(|| {
                SqlRecordError::Execution("INSERT ... RETURNING produced no row".to_string())
            })?;

        // Returned values correspond positionally to the primary-key
        // columns named in the RETURNING clause.
        for (position, column) in table.pk.clone().into_iter().enumerate() {
            let value = row.get_by_index(position).cloned().ok_or_else(|| {
                SqlRecordError::Execution(format!(
                    "RETURNING row is missing key value at position {position}"
                ))
            })?;
            table.store(column, value)?;
        }
    } else {
        executor.execute_dml(&stmt.sql, &stmt.params).await?;
    }

    Ok(())
}

/// Update the row identified by `record`'s current primary-key values.
///
/// # Errors
/// Extraction failures abort before anything executes; executor failures
/// pass through.
pub async fn update<E: SqlExecutor>(
    executor: &mut E,
    table_name: &str,
    record: &mut dyn Record,
) -> Result<u64, SqlRecordError> {
    let table = extract_table(record, false)?;
    let stmt = update_statement(&table, table_name);
    debug!(sql = %stmt.sql, "update");

    executor.execute_dml(&stmt.sql, &stmt.params).await
}

/// Delete the row identified by `record`'s current primary-key values.
///
/// # Errors
/// Extraction failures abort before anything executes; executor failures
/// pass through.
pub async fn delete<E: SqlExecutor>(
    executor: &mut E,
    table_name: &str,
    record: &mut dyn Record,
) -> Result<u64, SqlRecordError> {
    let table = extract_table(record, false)?;
    let stmt = delete_statement(&table, table_name);
    debug!(sql = %stmt.sql, "delete");

    executor.execute_dml(&stmt.sql, &stmt.params).await
}

/// Load one row by primary key into `record`.
///
/// `keys` must supply one value per primary-key column, in key order.
///
/// # Errors
/// `InvalidArgument` on key-arity mismatch, `NotFound` when no row
/// matches; executor failures pass through.
pub async fn load<E: SqlExecutor>(
    executor: &mut E,
    table_name: &str,
    record: &mut dyn Record,
    keys: &[SqlValue],
) -> Result<(), SqlRecordError> {
    let mut table = extract_table(record, false)?;
    let stmt = load_statement(&table, table_name, keys)?;
    debug!(sql = %stmt.sql, "load");

    let row = executor
        .execute_select_one(&stmt.sql, &stmt.params)
        .await?
        .ok_or(SqlRecordError::NotFound)?;

    scan_row(&mut table, &row)
}

/// Run an arbitrary single-row query and scan the result into `record`.
///
/// Result columns with no matching schema column are discarded.
///
/// # Errors
/// `NotFound` when the query matches no row; executor failures pass
/// through.
pub async fn query_row<E: SqlExecutor>(
    executor: &mut E,
    record: &mut dyn Record,
    query: &str,
    params: &[SqlValue],
) -> Result<(), SqlRecordError> {
    let mut table = extract_table(record, false)?;
    debug!(sql = %query, "query_row");

    let row = executor
        .execute_select_one(query, params)
        .await?
        .ok_or(SqlRecordError::NotFound)?;

    scan_row(&mut table, &row)
}

/// Run an arbitrary query and scan every row into a fresh record.
///
/// Zero matching rows is an empty vec, not an error.
///
/// # Errors
/// Extraction or scan failures on any row abort the whole call; executor
/// failures pass through.
pub async fn query_all<E: SqlExecutor, R: Record + Default>(
    executor: &mut E,
    query: &str,
    params: &[SqlValue],
) -> Result<Vec<R>, SqlRecordError> {
    debug!(sql = %query, "query_all");
    let rows = executor.execute_select(query, params).await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows.rows() {
        let mut record = R::default();
        {
            let mut table = extract_table(&mut record, false)?;
            scan_row(&mut table, row)?;
        }
        records.push(record);
    }

    Ok(records)
}
