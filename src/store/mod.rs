//! File-backed JSON snapshot stores.
//!
//! Each store keeps its whole collection in memory behind a
//! `tokio::sync::Mutex` and rewrites the entire snapshot on every mutation.
//! The read-modify-write cycle happens under the lock, so concurrent writers
//! cannot lose updates, and snapshots are replaced atomically (temp file plus
//! rename) so a crash mid-write never leaves a truncated file.

mod codes;
mod orders;

pub use codes::{CODE_ALPHABET, CODE_LENGTH, CodeStore, MAX_CODES_PER_BATCH};
pub use orders::OrderStore;

use crate::errors::Result;
use serde::Serialize;
use std::path::Path;

/// Atomically replaces `path` with the pretty-printed JSON of `value`.
async fn persist_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json.as_bytes()).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
