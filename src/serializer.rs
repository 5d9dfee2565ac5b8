//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different on-disk format.

use crate::book::Book;
use crate::error::{Error, Result};

/// Converts collection snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode the collection to bytes. Order is preserved.
    fn serialize(&self, books: &[Book]) -> Result<Vec<u8>>;

    /// Decode bytes back into the collection.
    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Book>>;
}

/// JSON serializer with optional pretty-printing.
///
/// Pretty output is the default contract for the catalog file — the
/// indentation is cosmetic only, both forms load identically.
#[derive(Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, books: &[Book]) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(books)
        } else {
            serde_json::to_vec(books)
        };
        bytes.map_err(Error::from)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Book>> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
