//! The book record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog entry.
///
/// `id` is assigned by the store and unique across the collection. Any extra
/// fields a client submits on create ride along verbatim in `extra` — the
/// catalog is deliberately permissive about what else a record carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, unique across the collection.
    pub id: u64,
    /// Title, required on create.
    pub title: String,
    /// Author, required on create. Filtering matches this exactly.
    pub author: String,
    /// Whatever else the client sent, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
