//! JSON-file-backed book catalog with a small REST API.
//!
//! The catalog lives in memory as an ordered sequence of [`Book`] records and
//! is mirrored to a JSON file after every mutation. A thin axum router maps
//! the HTTP surface onto store operations.
//!
//! ```rust,no_run
//! use bookshelf::{AppState, BookStore, RateLimitConfig};
//! use std::sync::Arc;
//!
//! let store = Arc::new(BookStore::open("books.json").unwrap());
//! let app = bookshelf::router(AppState::new(store, RateLimitConfig::default()));
//! ```
//!
//! **Single-process only.** If multiple processes open the same file they
//! will clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod error;
pub mod http;
pub mod limit;
pub mod persist;
pub mod serializer;
pub mod store;

pub use book::Book;
pub use error::{Error, Result};
pub use http::{router, ApiError, AppState};
pub use limit::{RateLimitConfig, RateLimiter};
pub use store::{BookStore, BookStoreBuilder};
