//! Binding between a typed row struct and its backend table.

use std::fmt::Display;

use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::types::filter::FilterValue;
use crate::types::query::Selection;
use crate::types::sorting::SortField;

/// A typed row of one backend table.
pub trait TableRow: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Backend table name.
    const TABLE: &'static str;

    /// Primary key type.
    type Id: Copy + Display + Into<FilterValue> + Send + Sync + 'static;

    /// Payload accepted on insert.
    type New: Serialize + Validate + Send + Sync + 'static;

    /// Payload accepted on update. Absent fields are left untouched.
    type Patch: Serialize + Send + Sync + 'static;

    /// Columns and embeds to read.
    fn selection() -> Selection {
        Selection::all()
    }

    /// Order applied when the caller does not sort.
    fn default_order() -> Option<SortField> {
        None
    }

    /// Columns holding ids of other rows. A list filter on one of them
    /// matches the whole id instead of a substring.
    fn key_columns() -> &'static [&'static str] {
        &[]
    }

    /// Primary key of this row.
    fn id(&self) -> Self::Id;
}
