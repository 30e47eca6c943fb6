//! Digest-diff reconciliation.
//!
//! Mirrors a serverset into an on-disk digest, re-fetching only children
//! that are not already known. A member record is immutable once
//! published under a given ephemeral child name (names are not reused
//! across process restarts), so a carried-forward entry is never
//! re-read. The digest file is rewritten only when the reconciled
//! mapping differs from the prior one, which keeps its modification
//! time usable as a cheap change signal for other processes.

use std::path::Path;

use tracing::{debug, warn};

use zkset_api::{Digest, decode};

use crate::digest;
use crate::error::Result;
use crate::store::{Store, StoreError, join_path};

/// Reconcile the set at `path` into `digest_file`.
pub async fn reconcile<S: Store>(store: &S, path: &str, digest_file: &Path) -> Result<()> {
    let prior = digest::load(digest_file)?;

    let children = match store.children(path).await {
        Ok(children) => children,
        Err(StoreError::NoNode) => {
            // The whole set is gone; record that as an empty digest.
            debug!(path, "set does not exist, writing empty digest");
            return digest::save(&Digest::new(), digest_file);
        }
        Err(err) => return Err(err.into()),
    };

    let mut next = Digest::new();
    for child in children {
        if let Some(member) = prior.get(&child) {
            next.insert(child, member.clone());
            continue;
        }
        let child_path = join_path(path, &child);
        match store.get(&child_path).await {
            Ok(bytes) => match decode(&bytes) {
                Ok(member) => {
                    next.insert(child, member);
                }
                Err(err) => warn!(path = %child_path, "skipping member: {err}"),
            },
            Err(StoreError::NoNode) => {
                debug!(path = %child_path, "member disappeared mid-pass");
            }
            Err(err) => warn!(path = %child_path, "failed to read member: {err}"),
        }
    }

    if next != prior {
        debug!(path, members = next.len(), "membership changed, persisting digest");
        digest::save(&next, digest_file)?;
    }
    Ok(())
}
