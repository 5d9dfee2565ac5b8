//! Core store type and builder.

use crate::book::Book;
use crate::error::{Error, Result};
use crate::persist::{atomic_write, load};
use crate::serializer::{JsonSerializer, Serializer};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// In-memory book collection mirrored to a JSON file on disk.
///
/// The collection is an ordered sequence — list responses and the on-disk
/// array keep insertion order. Every mutation happens under one write lock
/// and rewrites the whole backing file before returning, so the file and the
/// in-memory state are never out of sync for longer than a failed write
/// (which the caller hears about through the returned `Result`).
pub struct BookStore {
    books: RwLock<Vec<Book>>,
    path: PathBuf,
    serializer: JsonSerializer,
}

impl BookStore {
    /// Open (or create) a catalog at `path` with pretty-printed JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a catalog. Call [`.build()`](BookStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> BookStoreBuilder {
        BookStoreBuilder::new(path)
    }

    // ---- reads ----

    /// The book with the given id, or `None`. Linear scan.
    #[must_use]
    pub fn find(&self, id: u64) -> Option<Book> {
        self.books.read().iter().find(|b| b.id == id).cloned()
    }

    /// Snapshot of the full collection, insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Book> {
        self.books.read().clone()
    }

    /// Books whose author matches `author` exactly (case-sensitive).
    #[must_use]
    pub fn by_author(&self, author: &str) -> Vec<Book> {
        self.books
            .read()
            .iter()
            .filter(|b| b.author == author)
            .cloned()
            .collect()
    }

    /// Number of books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// `true` when the catalog has no books.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---- writes ----

    /// Validate a submitted record, assign it the next free id, append it and
    /// persist. Returns the stored book.
    ///
    /// The record must be a JSON object with string `title` and `author`;
    /// anything else is rejected without touching the collection. Extra
    /// fields ride along verbatim. A client-supplied `id` is discarded — ids
    /// are store-assigned only.
    pub fn add(&self, record: Value) -> Result<Book> {
        let Value::Object(mut fields) = record else {
            return Err(Error::InvalidBook("record must be a JSON object".to_string()));
        };
        let title = take_required_string(&mut fields, "title")?;
        let author = take_required_string(&mut fields, "author")?;
        fields.remove("id");

        let mut books = self.books.write();
        let id = books.iter().map(|b| b.id).max().map_or(1, |max| max + 1);
        let book = Book {
            id,
            title,
            author,
            extra: fields,
        };
        books.push(book.clone());
        self.persist_locked(&books)?;
        tracing::info!(id, title = %book.title, "book added");
        Ok(book)
    }

    /// Merge `patch` into the book with the given id and persist. Returns the
    /// updated book.
    ///
    /// Same-named fields are overwritten, new ones added. `id` in the patch
    /// is ignored. A patch that would leave `title` or `author` as a
    /// non-string is rejected without mutating the collection.
    pub fn update(&self, id: u64, patch: Value) -> Result<Book> {
        let Value::Object(patch) = patch else {
            return Err(Error::InvalidBook("patch must be a JSON object".to_string()));
        };

        let mut books = self.books.write();
        let pos = books
            .iter()
            .position(|b| b.id == id)
            .ok_or(Error::NotFound(id))?;

        let mut doc = serde_json::to_value(&books[pos])?;
        let map = doc
            .as_object_mut()
            .ok_or_else(|| Error::Serialize("book did not serialize to an object".to_string()))?;
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            map.insert(key, value);
        }
        let updated: Book =
            serde_json::from_value(doc).map_err(|e| Error::InvalidBook(e.to_string()))?;

        books[pos] = updated.clone();
        self.persist_locked(&books)?;
        tracing::info!(id, "book updated");
        Ok(updated)
    }

    /// Remove the book with the given id and persist. Returns the removed
    /// book so callers can report its title.
    pub fn remove(&self, id: u64) -> Result<Book> {
        let mut books = self.books.write();
        let pos = books.iter().position(|b| b.id == id).ok_or_else(|| {
            tracing::warn!(id, "book not found");
            Error::NotFound(id)
        })?;
        let removed = books.remove(pos);
        self.persist_locked(&books)?;
        tracing::info!(id, title = %removed.title, "book removed");
        Ok(removed)
    }

    // ---- persistence ----

    /// Write the current collection to disk (atomic temp-file + rename).
    /// Mutating operations call this themselves; this is for an explicit
    /// sync, e.g. after changing the file out-of-band.
    pub fn flush(&self) -> Result<()> {
        let books = self.books.read();
        self.persist_locked(&books)
    }

    fn persist_locked(&self, books: &[Book]) -> Result<()> {
        let bytes = self.serializer.serialize(books)?;
        atomic_write(&self.path, &bytes)
    }
}

impl std::fmt::Debug for BookStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookStore")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn take_required_string(fields: &mut Map<String, Value>, key: &str) -> Result<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(Error::InvalidBook(format!("`{key}` must be a string"))),
        None => Err(Error::InvalidBook(format!("`{key}` is required"))),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`BookStore`].
///
/// ```rust,no_run
/// use bookshelf::BookStore;
///
/// let store = BookStore::builder("books.json")
///     .pretty(false)
///     .build()
///     .unwrap();
/// ```
pub struct BookStoreBuilder {
    path: PathBuf,
    pretty: bool,
}

impl BookStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
        }
    }

    /// Write human-readable JSON with indentation (default: on). The
    /// indentation is cosmetic only — both forms load identically.
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Load (or create) the catalog.
    pub fn build(self) -> Result<BookStore> {
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let books = load(&self.path, &serializer)?;
        tracing::info!(path = %self.path.display(), count = books.len(), "catalog opened");

        Ok(BookStore {
            books: RwLock::new(books),
            path: self.path,
            serializer,
        })
    }
}

impl std::fmt::Debug for BookStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookStoreBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .finish()
    }
}
