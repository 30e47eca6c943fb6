//! Raw content publisher.

use tracing::debug;

use crate::error::{ClientError, Result};
use crate::store::{Store, StoreError};

/// Write `content` at `path`, creating the node if it does not exist
/// yet. The parent node must already exist.
pub async fn publish<S: Store>(store: &S, path: &str, content: &[u8]) -> Result<()> {
    match store.set(path, content).await {
        Ok(()) => Ok(()),
        Err(StoreError::NoNode) => {
            debug!(path, "node absent, creating it");
            match store.create(path, content).await {
                Ok(()) => Ok(()),
                Err(StoreError::NoNode) => Err(ClientError::MissingParent {
                    path: path.to_string(),
                }),
                Err(err) => Err(err.into()),
            }
        }
        Err(err) => Err(err.into()),
    }
}
