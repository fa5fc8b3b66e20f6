//! Per-field annotation parsing.
//!
//! An annotation is a comma-separated string attached to a field when the
//! record registers it: the first segment overrides the column name, the
//! rest are flag tokens. The vocabulary is fixed for the life of the
//! process.

/// Flag marking a field as (part of) the primary key.
pub const PK_FLAG: &str = "pk";

/// Flag marking a column as read-only: selected, never inserted or updated.
pub const READONLY_FLAG: &str = "readonly";

/// Name directive that excludes the field from the schema entirely.
pub const EXCLUDE_MARKER: &str = "-";

/// Name directive on an embedded field that suppresses the column-name
/// prefix instead of replacing it.
pub const NO_PREFIX_MARKER: &str = "_";

/// Parsed form of one field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedTag {
    name: &'static str,
    flags: Vec<&'static str>,
}

impl ParsedTag {
    /// The name override, or `None` when the column name should be derived
    /// from the field name.
    pub(crate) fn name_override(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name)
        }
    }

    /// Whether the field is excluded from the schema.
    pub(crate) fn excluded(&self) -> bool {
        self.name == EXCLUDE_MARKER
    }

    pub(crate) fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| *f == flag)
    }

    /// All flag tokens, recognized or not, in annotation order.
    pub(crate) fn flags(&self) -> &[&'static str] {
        &self.flags
    }
}

/// Split an annotation into its name directive and flag tokens.
///
/// Empty tokens after the name segment are dropped; unrecognized tokens are
/// kept so columns can carry them. Commas cannot appear inside a name
/// override; there is no escaping.
pub(crate) fn parse(tag: &'static str) -> ParsedTag {
    let mut segments = tag.split(',');
    let name = segments.next().unwrap_or("");
    let flags = segments.filter(|t| !t.is_empty()).collect();

    ParsedTag { name, flags }
}
