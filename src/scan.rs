//! Row materialization: binds result columns to schema columns by name.

use crate::error::SqlRecordError;
use crate::results::DbRow;
use crate::table::Table;
use crate::value::SqlValue;

/// Store a result row into the table's record.
///
/// Each returned column is matched against the schema by name; unmatched
/// result columns are discarded. When two schema columns share a name the
/// later one receives the value.
pub(crate) fn scan_row(table: &mut Table<'_>, row: &DbRow) -> Result<(), SqlRecordError> {
    for (index, name) in row.column_names().iter().enumerate() {
        let Some(column) = table.column_index(name) else {
            continue;
        };
        let value = row.get_by_index(index).cloned().unwrap_or(SqlValue::Null);
        table.store(column, value)?;
    }
    Ok(())
}
