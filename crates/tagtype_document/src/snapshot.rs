//! Binary document snapshots using `MessagePack`.
//!
//! A snapshot holds one [`Document`] exactly as [`encode`](crate::DocumentCodec::encode)
//! produced it, `@@tagName` and `_order` keys included, so loading one and
//! decoding it is the same as reading the document back from a store.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tagtype_foundation::{Error, ErrorKind, Result};
use tracing::debug;

use crate::Document;

/// Serializes a document to `MessagePack` bytes.
///
/// Uses named serialization so keys survive as strings.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(doc).map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a document from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a `MessagePack` map.
pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Saves a document to a file, replacing any existing contents.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |action: &str, e: std::io::Error| {
        Error::new(ErrorKind::IoError(format!(
            "failed to {action} file '{}': {e}",
            path.display()
        )))
    };

    let bytes = to_bytes(doc)?;
    let file = File::create(path).map_err(|e| io_error("create", e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| io_error("write to", e))?;
    writer.flush().map_err(|e| io_error("flush", e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "saved document snapshot");
    Ok(())
}

/// Loads a document from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    from_bytes(&bytes)
}
