//! ZooKeeper backend for the store abstraction.
//!
//! All use of the `zookeeper-client` crate is confined to this module;
//! the rest of the crate sees only [`Store`], [`WatchEvent`] and
//! [`SessionEvent`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use zookeeper_client as zk;

use super::{SessionEvent, Store, StoreError, WatchEvent, WatchReceiver};

/// Store implementation backed by a live ZooKeeper session.
#[derive(Clone)]
pub struct ZkStore {
    client: zk::Client,
}

impl ZkStore {
    /// Establish a session against `cluster`, a comma-separated
    /// `host:port` connection string.
    ///
    /// No retry here; session establishment is the caller's to repeat.
    pub async fn connect(cluster: &str, session_timeout: Duration) -> Result<Self, StoreError> {
        let client = zk::Client::connector()
            .session_timeout(session_timeout)
            .connect(cluster)
            .await
            .map_err(map_error)?;
        Ok(Self { client })
    }

    /// Spawn a task draining the session state watcher into `tx`.
    ///
    /// The task ends after forwarding a terminal state or once the
    /// receiver side is dropped.
    pub(crate) fn forward_session_events(&self, tx: mpsc::Sender<SessionEvent>) {
        let mut states = self.client.state_watcher();
        tokio::spawn(async move {
            loop {
                let state = states.changed().await;
                let terminal = state.is_terminated();
                if tx.send(map_session_state(state)).await.is_err() {
                    return;
                }
                if terminal {
                    return;
                }
            }
        });
    }
}

#[async_trait]
impl Store for ZkStore {
    async fn children(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.client.list_children(path).await.map_err(map_error)
    }

    async fn children_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, WatchReceiver), StoreError> {
        let (children, _stat, watcher) = self
            .client
            .get_and_watch_children(path)
            .await
            .map_err(map_error)?;
        Ok((children, forward_watch(watcher)))
    }

    async fn exists_watch(&self, path: &str) -> Result<(bool, WatchReceiver), StoreError> {
        let (stat, watcher) = self
            .client
            .check_and_watch_stat(path)
            .await
            .map_err(map_error)?;
        Ok((stat.is_some(), forward_watch(watcher)))
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let (data, _stat) = self.client.get_data(path).await.map_err(map_error)?;
        Ok(data)
    }

    async fn set(&self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        self.client
            .set_data(path, data, None)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn create(&self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        let options = zk::CreateMode::Persistent.with_acls(zk::Acls::anyone_all());
        self.client
            .create(path, data, &options)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

/// Bridge a one-shot backend watcher onto the crate's watch channel.
fn forward_watch(watcher: zk::OneshotWatcher) -> WatchReceiver {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let event = watcher.changed().await;
        debug!(path = %event.path, "watch fired: {:?}", event.event_type);
        let _ = tx.send(map_watch_event(&event));
    });
    rx
}

fn map_watch_event(event: &zk::WatchedEvent) -> WatchEvent {
    match event.event_type {
        zk::EventType::NodeCreated => WatchEvent::NodeCreated,
        zk::EventType::NodeDeleted => WatchEvent::NodeDeleted,
        zk::EventType::NodeChildrenChanged => WatchEvent::ChildrenChanged,
        zk::EventType::NodeDataChanged => WatchEvent::DataChanged,
        // A terminal session state on the watch channel means the watch
        // will never observe a node change anymore.
        zk::EventType::Session if event.session_state.is_terminated() => WatchEvent::Invalidated,
        zk::EventType::Session => WatchEvent::SessionMarker,
    }
}

fn map_session_state(state: zk::SessionState) -> SessionEvent {
    match state {
        zk::SessionState::SyncConnected => SessionEvent::Connected,
        zk::SessionState::Disconnected => SessionEvent::Suspended,
        zk::SessionState::Expired => SessionEvent::Expired,
        other => SessionEvent::Faulted(format!("{other:?}")),
    }
}

fn map_error(err: zk::Error) -> StoreError {
    match err {
        zk::Error::NoNode => StoreError::NoNode,
        zk::Error::SessionExpired => StoreError::SessionExpired,
        other => StoreError::Backend(other.to_string()),
    }
}
