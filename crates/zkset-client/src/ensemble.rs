//! Ensemble connector.
//!
//! Establishes a session against a comma-separated list of ZooKeeper
//! addresses and hands back the store plus a stream of session-lifecycle
//! events. The caller must keep draining the stream for the life of the
//! session or risk missing the expiry notice.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::error::{ClientError, Result};
use crate::store::{SessionEvent, ZkStore};

/// Fixed session timeout for every command invocation.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(15);

const SESSION_EVENT_BUFFER: usize = 16;

/// Stream of session-lifecycle events. The stream closing means the
/// session is gone.
pub type SessionEvents = mpsc::Receiver<SessionEvent>;

/// Connect to the ensemble given as comma-separated `host:port` pairs.
/// Whitespace around entries is tolerated.
///
/// There is no retry at this layer: a failed initial connect is fatal to
/// the invoking command, and the operator re-invokes it.
pub async fn connect(ensemble: &str) -> Result<(ZkStore, SessionEvents)> {
    let cluster = normalize(ensemble);

    info!(%cluster, "connecting to ensemble");

    let store = ZkStore::connect(&cluster, SESSION_TIMEOUT)
        .await
        .map_err(|err| ClientError::Connect(err.to_string()))?;

    let (tx, rx) = mpsc::channel(SESSION_EVENT_BUFFER);
    store.forward_session_events(tx);

    Ok((store, rx))
}

/// Trim whitespace around each ensemble member and drop empty entries.
fn normalize(ensemble: &str) -> String {
    ensemble
        .split(',')
        .map(str::trim)
        .filter(|member| !member.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_members() {
        assert_eq!(
            normalize(" zk1:2181 , zk2:2181,zk3:2181 "),
            "zk1:2181,zk2:2181,zk3:2181"
        );
    }

    #[test]
    fn test_normalize_drops_empty_entries() {
        assert_eq!(normalize("zk1:2181,,zk2:2181,"), "zk1:2181,zk2:2181");
        assert_eq!(normalize("127.0.0.1:2181"), "127.0.0.1:2181");
    }
}
