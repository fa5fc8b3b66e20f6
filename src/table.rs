use std::fmt;

use crate::error::SqlRecordError;
use crate::record::Record;
use crate::statement::quote;
use crate::tag::READONLY_FLAG;
use crate::value::{SqlValue, ValueKind, ValueSlot};

/// One relational column of an extracted schema.
///
/// A column owns its derived name and flags but only borrows its storage:
/// reading goes through [`Column::value`], writes go through the owning
/// [`Table`] so scanned rows land in the caller's record.
pub struct Column<'a> {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) kind: ValueKind,
    pub(crate) tags: Vec<&'static str>,
    pub(crate) from_embedded: bool,
    pub(crate) slot: &'a mut dyn ValueSlot,
}

impl Column<'_> {
    /// The relational column name (lower-cased field name or annotation
    /// override, prefixed when flattened out of an embedded record).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path of the record field backing this column, e.g.
    /// `address.city` for a flattened embedded field.
    #[must_use]
    pub fn field_path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// All annotation flag tokens, including unrecognized ones.
    #[must_use]
    pub fn tags(&self) -> &[&'static str] {
        &self.tags
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.tags.iter().any(|t| *t == READONLY_FLAG)
    }

    /// Whether the column is still inside a nested record being processed.
    /// Cleared on resolved primary keys once attached to the root table.
    #[must_use]
    pub fn is_from_embedded(&self) -> bool {
        self.from_embedded
    }

    /// Read the current value of the backing record field.
    #[must_use]
    pub fn value(&self) -> SqlValue {
        self.slot.load()
    }

    pub(crate) fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        self.slot.store(value)
    }
}

// Manual Debug because the slot borrow has nothing useful to print.
impl fmt::Debug for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("tags", &self.tags)
            .field("from_embedded", &self.from_embedded)
            .finish()
    }
}

/// The schema extracted from one record: ordered columns plus the resolved
/// primary key (indices into the column list, composite keys allowed).
///
/// A table borrows its record mutably for its whole lifetime, so two
/// operations can never race on the same destination record.
pub struct Table<'a> {
    pub(crate) columns: Vec<Column<'a>>,
    pub(crate) pk: Vec<usize>,
}

impl<'a> Table<'a> {
    /// Extract the schema of `record` as a root table.
    ///
    /// # Errors
    /// Returns `SqlRecordError::NoPrimaryKey` when no primary key can be
    /// resolved.
    pub fn extract(record: &'a mut dyn Record) -> Result<Table<'a>, SqlRecordError> {
        crate::extract::extract_table(record, false)
    }

    /// All columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column<'a>] {
        &self.columns
    }

    /// The resolved primary-key columns, in precedence order.
    #[must_use]
    pub fn primary_keys(&self) -> Vec<&Column<'a>> {
        self.pk.iter().map(|&i| &self.columns[i]).collect()
    }

    fn filtered_indices(&self, include_pk: bool, include_readonly: bool) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, col)| {
                if !include_pk && self.pk.contains(i) {
                    return false;
                }
                if !include_readonly && col.is_readonly() {
                    return false;
                }
                true
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Columns in original order, omitting primary-key columns unless
    /// `include_pk` and read-only columns unless `include_readonly`.
    #[must_use]
    pub fn filtered_columns(&self, include_pk: bool, include_readonly: bool) -> Vec<&Column<'a>> {
        self.filtered_indices(include_pk, include_readonly)
            .into_iter()
            .map(|i| &self.columns[i])
            .collect()
    }

    /// Column names for the filtered view.
    #[must_use]
    pub fn names(&self, include_pk: bool, include_readonly: bool) -> Vec<&str> {
        self.filtered_columns(include_pk, include_readonly)
            .into_iter()
            .map(Column::name)
            .collect()
    }

    /// Identifier-quoted column names for the filtered view.
    #[must_use]
    pub fn quoted_names(&self, include_pk: bool, include_readonly: bool) -> Vec<String> {
        self.names(include_pk, include_readonly)
            .into_iter()
            .map(quote)
            .collect()
    }

    /// One bind value per filtered column, read from the live record.
    #[must_use]
    pub fn values(&self, include_pk: bool, include_readonly: bool) -> Vec<SqlValue> {
        self.filtered_columns(include_pk, include_readonly)
            .into_iter()
            .map(Column::value)
            .collect()
    }

    /// Index of the column matching a result-row name. Later columns shadow
    /// earlier ones with the same name.
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().rposition(|col| col.name == name)
    }

    pub(crate) fn store(&mut self, index: usize, value: SqlValue) -> Result<(), SqlRecordError> {
        self.columns[index].store(value)
    }
}

impl fmt::Debug for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("pk", &self.pk)
            .finish()
    }
}
