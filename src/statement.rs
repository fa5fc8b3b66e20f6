//! CRUD statement synthesis from an extracted [`Table`].
//!
//! All builders are pure: they read the table's filtered views and current
//! values, and return SQL text with `$N` placeholders plus the bound
//! parameters in placeholder order.

use crate::error::SqlRecordError;
use crate::table::{Column, Table};
use crate::value::SqlValue;

/// A synthesized SQL statement and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// An INSERT statement; `returns_keys` is set when the primary keys were
/// omitted from VALUES and a RETURNING clause expects them back.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub returns_keys: bool,
}

/// Wrap an identifier in double quotes, verbatim (no escaping).
#[must_use]
pub fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

/// Render the 1-based positional placeholder `$n`.
#[must_use]
pub fn placeholder(n: usize) -> String {
    format!("${n}")
}

/// Render placeholders `$1 ..= $count`.
#[must_use]
pub fn placeholders(count: usize) -> Vec<String> {
    (1..=count).map(placeholder).collect()
}

/// A primary key counts as caller-supplied only while it is a numeric
/// column holding a value greater than zero.
fn key_is_supplied(col: &Column<'_>) -> bool {
    col.kind().is_numeric() && matches!(col.value(), SqlValue::Int(n) if n > 0)
}

/// Build an INSERT for the table's writable columns.
///
/// Primary keys are included in the column list only when every one of
/// them is caller-supplied; otherwise they are all omitted and a RETURNING
/// clause asks the database for the generated values.
#[must_use]
pub fn insert_statement(table: &Table<'_>, table_name: &str) -> InsertStatement {
    let include_pk = table.primary_keys().into_iter().all(key_is_supplied);

    let names = table.quoted_names(include_pk, false);
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table_name),
        names.join(","),
        placeholders(names.len()).join(","),
    );
    let params = table.values(include_pk, false);

    let returns_keys = !include_pk;
    if returns_keys {
        let keys: Vec<String> = table
            .primary_keys()
            .into_iter()
            .map(|pk| quote(pk.name()))
            .collect();
        sql.push_str(" RETURNING ");
        sql.push_str(&keys.join(","));
    }

    InsertStatement {
        sql,
        params,
        returns_keys,
    }
}

/// Build an UPDATE of every writable non-key column, keyed by the current
/// primary-key values. Placeholder numbering continues from the SET clause
/// into the WHERE clause.
#[must_use]
pub fn update_statement(table: &Table<'_>, table_name: &str) -> Statement {
    let columns = table.quoted_names(false, false);
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{name}={}", placeholder(i + 1)))
        .collect();

    let offset = columns.len();
    let predicates: Vec<String> = table
        .primary_keys()
        .into_iter()
        .enumerate()
        .map(|(i, pk)| format!("{}={}", quote(pk.name()), placeholder(offset + 1 + i)))
        .collect();

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        quote(table_name),
        assignments.join(","),
        predicates.join(" AND "),
    );

    let mut params = table.values(false, false);
    params.extend(table.primary_keys().into_iter().map(Column::value));

    Statement { sql, params }
}

/// Build a DELETE keyed by the current primary-key values.
#[must_use]
pub fn delete_statement(table: &Table<'_>, table_name: &str) -> Statement {
    let predicates: Vec<String> = table
        .primary_keys()
        .into_iter()
        .enumerate()
        .map(|(i, pk)| format!("{}={}", quote(pk.name()), placeholder(i + 1)))
        .collect();

    let sql = format!(
        "DELETE FROM {} WHERE {}",
        quote(table_name),
        predicates.join(" AND "),
    );

    let params = table.primary_keys().into_iter().map(Column::value).collect();

    Statement { sql, params }
}

/// Build a SELECT of every column, keyed by the supplied key values.
///
/// # Errors
/// Returns `SqlRecordError::InvalidArgument` when the number of key values
/// does not match the table's primary-key column count.
pub fn load_statement(
    table: &Table<'_>,
    table_name: &str,
    keys: &[SqlValue],
) -> Result<Statement, SqlRecordError> {
    let pks = table.primary_keys();
    if keys.len() != pks.len() {
        return Err(SqlRecordError::InvalidArgument(format!(
            "load requires {} key value(s), got {}",
            pks.len(),
            keys.len()
        )));
    }

    let predicates: Vec<String> = pks
        .into_iter()
        .enumerate()
        .map(|(i, pk)| format!("{}={}", quote(pk.name()), placeholder(i + 1)))
        .collect();

    let sql = format!(
        "SELECT {} FROM {} WHERE {}",
        table.quoted_names(true, true).join(","),
        quote(table_name),
        predicates.join(" AND "),
    );

    Ok(Statement {
        sql,
        params: keys.to_vec(),
    })
}
