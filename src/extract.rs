//! Schema extraction: walks a record's declared fields and derives the
//! ordered column list and primary key for its table.

use crate::error::SqlRecordError;
use crate::record::{FieldKind, Record};
use crate::table::{Column, Table};
use crate::tag::{self, NO_PREFIX_MARKER, PK_FLAG};

/// Field name that makes a column the primary key by convention when no
/// `pk` flag is present anywhere at its level.
const CONVENTION_KEY_FIELD: &str = "id";

/// Derive the table schema of `record`.
///
/// `nested` marks a recursive call for an embedded record; only the root
/// call enforces the primary-key invariant and finalizes the resolved key
/// columns.
///
/// Primary-key resolution per level, in strict precedence order:
/// 1. columns flagged `pk`, in tag-encounter order (composite keys),
/// 2. the column of the first field declared as `id`,
/// 3. the primary keys of the first embedded record that had any.
///
/// # Errors
/// Returns `SqlRecordError::NoPrimaryKey` when the root resolution comes up
/// empty.
pub fn extract_table(record: &mut dyn Record, nested: bool) -> Result<Table<'_>, SqlRecordError> {
    let mut columns: Vec<Column<'_>> = Vec::new();
    let mut explicit_pk: Vec<usize> = Vec::new();
    let mut convention_pk: Option<usize> = None;
    let mut embedded_pk: Option<Vec<usize>> = None;

    for field in record.fields() {
        let parsed = tag::parse(field.tag);
        if parsed.excluded() {
            continue;
        }

        match field.kind {
            FieldKind::Embedded(sub) => {
                let sub_table = extract_table(sub, true)?;

                let prefix = match parsed.name_override() {
                    Some(NO_PREFIX_MARKER) => None,
                    Some(name) => Some(name.to_string()),
                    None => Some(field.name.to_ascii_lowercase()),
                };

                let base = columns.len();
                let sub_pk: Vec<usize> = sub_table.pk.iter().map(|i| base + i).collect();

                for mut col in sub_table.columns {
                    if let Some(prefix) = &prefix {
                        col.name = format!("{prefix}_{}", col.name);
                    }
                    col.path = format!("{}.{}", field.name, col.path);
                    columns.push(col);
                }

                // First embedded record with a primary key becomes the
                // fallback candidate; later ones only contribute columns.
                if embedded_pk.is_none() && !sub_pk.is_empty() {
                    embedded_pk = Some(sub_pk);
                }
            }
            FieldKind::Scalar(slot) => {
                let name = match parsed.name_override() {
                    Some(name) => name.to_string(),
                    None => field.name.to_ascii_lowercase(),
                };
                let index = columns.len();
                let kind = slot.kind();
                columns.push(Column {
                    name,
                    path: field.name.to_string(),
                    kind,
                    tags: parsed.flags().to_vec(),
                    from_embedded: nested,
                    slot,
                });

                if parsed.has_flag(PK_FLAG) {
                    explicit_pk.push(index);
                }
                if convention_pk.is_none() && field.name == CONVENTION_KEY_FIELD {
                    convention_pk = Some(index);
                }
            }
        }
    }

    let pk = if explicit_pk.is_empty() {
        match convention_pk {
            Some(index) => vec![index],
            None => embedded_pk.unwrap_or_default(),
        }
    } else {
        explicit_pk
    };

    let mut table = Table { columns, pk };

    if !nested {
        if table.pk.is_empty() {
            return Err(SqlRecordError::NoPrimaryKey);
        }
        // The resolved key columns are first-class members of the root
        // table no matter where they were declared.
        for index in table.pk.clone() {
            table.columns[index].from_embedded = false;
        }
    }

    Ok(table)
}
