use crate::value::ValueSlot;

/// A struct that can be mapped to a table row.
///
/// Implementations list their fields once, in declaration order, handing
/// out mutably borrowed slots so extracted schemas read and write the
/// record in place:
///
/// ```rust
/// use sql_record::{Field, Record};
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for User {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::scalar("id", "", &mut self.id),
///             Field::scalar("name", "", &mut self.name),
///         ]
///     }
/// }
/// ```
///
/// The second argument is the field's annotation: a name override followed
/// by comma-separated flags (see the [`tag`](crate::tag) module). Fields a
/// record does not list simply do not exist as far as the schema is
/// concerned.
pub trait Record {
    /// Visit the record's fields in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn fields(&mut self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// One declared field of a [`Record`].
pub struct Field<'a> {
    pub(crate) name: &'static str,
    pub(crate) tag: &'static str,
    pub(crate) kind: FieldKind<'a>,
}

pub(crate) enum FieldKind<'a> {
    Scalar(&'a mut dyn ValueSlot),
    Embedded(&'a mut dyn Record),
}

impl<'a> Field<'a> {
    /// An ordinary value field backed by `slot`.
    pub fn scalar(name: &'static str, tag: &'static str, slot: &'a mut dyn ValueSlot) -> Self {
        Field {
            name,
            tag,
            kind: FieldKind::Scalar(slot),
        }
    }

    /// An embedded record whose fields are flattened into the parent's
    /// column list under a name prefix.
    pub fn embedded(name: &'static str, tag: &'static str, record: &'a mut dyn Record) -> Self {
        Field {
            name,
            tag,
            kind: FieldKind::Embedded(record),
        }
    }

    /// A single-level optional embedded record.
    ///
    /// An empty option is filled with a fresh `Default` instance before
    /// embedding, so values scanned through the resulting columns are
    /// observable on the caller's record afterwards.
    pub fn nested<R: Record + Default>(
        name: &'static str,
        tag: &'static str,
        slot: &'a mut Option<R>,
    ) -> Self {
        Field::embedded(name, tag, slot.get_or_insert_with(R::default))
    }
}
