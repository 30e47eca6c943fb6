//! Coordination-store abstraction.
//!
//! The wire protocol and session keep-alive machinery live in the backing
//! client crate; this module narrows it to the handful of operations the
//! serverset commands consume and translates its notifications into the
//! crate's own event model.

mod zk;

#[cfg(test)]
pub(crate) mod memory;

pub use zk::ZkStore;

use async_trait::async_trait;
use tokio::sync::oneshot;

/// Session-lifecycle notification delivered on the connector's event
/// stream for the life of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session established or re-established.
    Connected,
    /// Connection lost; the client is reconnecting within the session
    /// timeout.
    Suspended,
    /// Session timed out on the server side. Terminal.
    Expired,
    /// Session-level failure. Terminal.
    Faulted(String),
}

/// One-shot change notification from an armed watch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchEvent {
    NodeCreated,
    NodeDeleted,
    ChildrenChanged,
    DataChanged,
    /// Session state marker surfaced through the watch channel; not a
    /// node change.
    SessionMarker,
    /// The watch was invalidated before observing a node change.
    Invalidated,
}

/// Receiver half of a one-shot watch.
pub type WatchReceiver = oneshot::Receiver<WatchEvent>;

/// Errors surfaced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("node does not exist")]
    NoNode,

    #[error("session expired")]
    SessionExpired,

    #[error("store operation failed: {0}")]
    Backend(String),
}

/// The narrow coordination-store surface consumed by the serverset
/// commands.
///
/// `children_watch` and `exists_watch` arm the watch in the same call
/// that returns the current state, so a mutation issued after the call
/// returns is guaranteed to fire the watch.
#[async_trait]
pub trait Store: Send + Sync {
    /// List the children of `path`.
    async fn children(&self, path: &str) -> Result<Vec<String>, StoreError>;

    /// List the children of `path` and arm a one-shot watch on its child
    /// list.
    async fn children_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, WatchReceiver), StoreError>;

    /// Check whether `path` exists and arm a one-shot watch on it.
    async fn exists_watch(&self, path: &str) -> Result<(bool, WatchReceiver), StoreError>;

    /// Fetch the content of `path`.
    async fn get(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Replace the content of `path`.
    async fn set(&self, path: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Create `path` with the given content and an open ACL.
    async fn create(&self, path: &str, data: &[u8]) -> Result<(), StoreError>;
}

/// Join a set path and a child name.
pub(crate) fn join_path(parent: &str, child: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/svc/web", "member_01"), "/svc/web/member_01");
        assert_eq!(join_path("/svc/web/", "member_01"), "/svc/web/member_01");
        assert_eq!(join_path("/", "top"), "/top");
    }
}
