use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlRecordError;

/// Values that can be bound to a statement or read from a result row.
///
/// The same enum is used for both directions so record slots, statement
/// parameters, and result cells never branch on driver types:
/// ```rust
/// use sql_record::prelude::*;
///
/// let params = vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
    /// NULL value
    Null,
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let SqlValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let SqlValue::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// Declared-type classification of a field slot.
///
/// Only consulted to decide whether a primary key counts as caller-supplied
/// on insert; everything else works off runtime [`SqlValue`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Uint,
    Float,
    Text,
    Bool,
    Timestamp,
    Json,
    Blob,
}

impl ValueKind {
    /// Whether a value of this kind participates in the
    /// greater-than-zero primary-key presence check.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Uint)
    }
}

/// Live storage behind one column of a record.
///
/// An extracted [`Table`](crate::Table) holds one slot per column, borrowed
/// mutably from the caller's record, so binding reads the current field
/// value and scanning writes straight back into the record.
pub trait ValueSlot {
    /// Declared-type classification of the slot.
    fn kind(&self) -> ValueKind;

    /// Read the current field value.
    fn load(&self) -> SqlValue;

    /// Write a result-row value into the field.
    ///
    /// # Errors
    /// Returns `SqlRecordError::Conversion` when the value does not fit the
    /// field's type.
    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError>;
}

fn mismatch(expected: &'static str, got: &SqlValue) -> SqlRecordError {
    SqlRecordError::Conversion(format!("cannot store {got:?} into {expected} field"))
}

macro_rules! signed_slot {
    ($($t:ty),* $(,)?) => {$(
        impl ValueSlot for $t {
            fn kind(&self) -> ValueKind {
                ValueKind::Int
            }

            fn load(&self) -> SqlValue {
                SqlValue::Int(i64::from(*self))
            }

            fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
                match value {
                    SqlValue::Int(n) => {
                        *self = <$t>::try_from(n).map_err(|_| {
                            SqlRecordError::Conversion(format!(
                                "integer {n} out of range for {}",
                                stringify!($t)
                            ))
                        })?;
                        Ok(())
                    }
                    other => Err(mismatch(stringify!($t), &other)),
                }
            }
        }
    )*};
}

macro_rules! unsigned_slot {
    ($($t:ty),* $(,)?) => {$(
        impl ValueSlot for $t {
            fn kind(&self) -> ValueKind {
                ValueKind::Uint
            }

            fn load(&self) -> SqlValue {
                SqlValue::Int(i64::from(*self))
            }

            fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
                match value {
                    SqlValue::Int(n) => {
                        *self = <$t>::try_from(n).map_err(|_| {
                            SqlRecordError::Conversion(format!(
                                "integer {n} out of range for {}",
                                stringify!($t)
                            ))
                        })?;
                        Ok(())
                    }
                    other => Err(mismatch(stringify!($t), &other)),
                }
            }
        }
    )*};
}

macro_rules! float_slot {
    ($($t:ty),* $(,)?) => {$(
        impl ValueSlot for $t {
            fn kind(&self) -> ValueKind {
                ValueKind::Float
            }

            fn load(&self) -> SqlValue {
                SqlValue::Float(f64::from(*self))
            }

            fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
                match value {
                    SqlValue::Float(f) => {
                        *self = f as $t;
                        Ok(())
                    }
                    SqlValue::Int(n) => {
                        *self = n as $t;
                        Ok(())
                    }
                    other => Err(mismatch(stringify!($t), &other)),
                }
            }
        }
    )*};
}

signed_slot!(i8, i16, i32, i64);
unsigned_slot!(u8, u16, u32);
float_slot!(f32, f64);

impl ValueSlot for String {
    fn kind(&self) -> ValueKind {
        ValueKind::Text
    }

    fn load(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        match value {
            SqlValue::Text(s) => {
                *self = s;
                Ok(())
            }
            other => Err(mismatch("String", &other)),
        }
    }
}

impl ValueSlot for bool {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn load(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }

    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        match value.as_bool() {
            Some(b) => {
                *self = *b;
                Ok(())
            }
            None => Err(mismatch("bool", &value)),
        }
    }
}

impl ValueSlot for NaiveDateTime {
    fn kind(&self) -> ValueKind {
        ValueKind::Timestamp
    }

    fn load(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }

    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        match value.as_timestamp() {
            Some(dt) => {
                *self = dt;
                Ok(())
            }
            None => Err(mismatch("NaiveDateTime", &value)),
        }
    }
}

impl ValueSlot for JsonValue {
    fn kind(&self) -> ValueKind {
        ValueKind::Json
    }

    fn load(&self) -> SqlValue {
        SqlValue::Json(self.clone())
    }

    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        match value {
            SqlValue::Json(v) => {
                *self = v;
                Ok(())
            }
            other => Err(mismatch("serde_json::Value", &other)),
        }
    }
}

impl ValueSlot for Vec<u8> {
    fn kind(&self) -> ValueKind {
        ValueKind::Blob
    }

    fn load(&self) -> SqlValue {
        SqlValue::Blob(self.clone())
    }

    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        match value {
            SqlValue::Blob(b) => {
                *self = b;
                Ok(())
            }
            other => Err(mismatch("Vec<u8>", &other)),
        }
    }
}

/// Nullable slots: NULL round-trips through `None`, anything else is
/// stored into a freshly defaulted inner value.
impl<T: ValueSlot + Default> ValueSlot for Option<T> {
    fn kind(&self) -> ValueKind {
        match self {
            Some(v) => v.kind(),
            None => T::default().kind(),
        }
    }

    fn load(&self) -> SqlValue {
        match self {
            Some(v) => v.load(),
            None => SqlValue::Null,
        }
    }

    fn store(&mut self, value: SqlValue) -> Result<(), SqlRecordError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).store(value)
    }
}
