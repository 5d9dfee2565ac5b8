//! Disk I/O helpers: load from file and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On network
//! shares or FAT32 there are no hard guarantees; keep backups if that matters.

use crate::book::Book;
use crate::error::{Error, Result};
use crate::serializer::Serializer;
use std::path::Path;

/// Reads and deserializes the catalog file at `path`. A missing or empty file
/// yields an empty collection (logged, not an error) — that is the normal
/// first-run condition.
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Vec<Book>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "catalog file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    serializer.deserialize(&bytes)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`, so a crash
/// mid-write never leaves a half-written catalog behind.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}
