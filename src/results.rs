use std::sync::Arc;

use crate::value::SqlValue;

/// A row from a query result, with access by column name or index.
///
/// Column names are shared across all rows of a result set.
#[derive(Debug, Clone)]
pub struct DbRow {
    column_names: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl DbRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        Self {
            column_names,
            values,
        }
    }

    /// The result's column names, in result order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Index of a column by name, or None if the result does not have it.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Value of the named column, or None if the result does not have it.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value at a column index, or None when out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

/// The rows returned by a query, sharing one set of column names.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    column_names: Option<Arc<Vec<String>>>,
    rows: Vec<DbRow>,
}

impl ResultSet {
    /// Create a result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            column_names: None,
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Set the column names shared by all rows.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_names = Some(column_names);
    }

    /// The shared column names, if any row has been described yet.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row of values under the shared column names.
    ///
    /// Silently drops the row when no column names have been set.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        if let Some(column_names) = &self.column_names {
            self.rows.push(DbRow::new(column_names.clone(), values));
        }
    }

    /// Append a prebuilt row; its column names become the shared set when
    /// none have been set yet.
    pub fn add_row(&mut self, row: DbRow) {
        if self.column_names.is_none() {
            self.column_names = Some(Arc::new(row.column_names().to_vec()));
        }
        self.rows.push(row);
    }

    #[must_use]
    pub fn rows(&self) -> &[DbRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
