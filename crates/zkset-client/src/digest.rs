//! On-disk digest store.
//!
//! A digest is a single JSON object mapping child name to member. It is
//! replaced wholesale via temp-file-plus-rename, so a concurrent reader
//! only ever sees a complete old or complete new file, and its
//! modification time only moves when membership actually changed.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use zkset_api::{Digest, encode};

use crate::error::{ClientError, Result};

/// Load a digest from `path`.
///
/// A missing file is an empty digest. Any other read or parse failure is
/// fatal: silently discarding a corrupt digest would hide membership
/// changes from downstream consumers, so the operator has to intervene.
pub fn load(path: &Path) -> Result<Digest> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Digest::new()),
        Err(err) => return Err(unreadable(path, err)),
    };

    serde_json::from_slice(&bytes).map_err(|err| unreadable(path, err))
}

/// Atomically replace the digest at `path`.
///
/// The serialized digest goes to a temporary sibling first and is then
/// renamed over the target; on any failure the prior file stays intact.
pub fn save(digest: &Digest, path: &Path) -> Result<()> {
    let bytes = encode(digest).map_err(|err| unwritable(path, err))?;
    let tmp = write_sibling(&bytes, path)?;
    tmp.persist(path).map_err(|err| unwritable(path, err))?;
    debug!(path = %path.display(), members = digest.len(), "digest replaced");
    Ok(())
}

/// Write the serialized digest to a temporary file in the target's
/// directory, ready to be renamed over the target.
fn write_sibling(bytes: &[u8], path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| unwritable(path, err))?;
    tmp.write_all(bytes).map_err(|err| unwritable(path, err))?;
    tmp.as_file().sync_all().map_err(|err| unwritable(path, err))?;
    Ok(tmp)
}

fn unreadable(path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::DigestUnreadable {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn unwritable(path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::DigestWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
