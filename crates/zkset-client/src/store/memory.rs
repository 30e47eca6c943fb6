//! Scripted in-memory store used by the unit tests.
//!
//! Nodes live in a flat path map. Watches are handed back as one-shot
//! channels whose sender side stays with the store, so a test can fire
//! or drop them at a chosen point in the scenario.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{Store, StoreError, WatchEvent, WatchReceiver};

#[derive(Default)]
pub(crate) struct MemoryStore {
    nodes: Mutex<BTreeMap<String, Vec<u8>>>,
    armed: Mutex<Vec<oneshot::Sender<WatchEvent>>>,
    vanished: Mutex<BTreeSet<String>>,
    poisoned: Mutex<BTreeSet<String>>,
    staged: Mutex<BTreeMap<String, Vec<Result<Vec<u8>, StoreError>>>>,
    children_errors: Mutex<BTreeMap<String, Vec<StoreError>>>,
    exists_errors: Mutex<BTreeMap<String, Vec<StoreError>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, path: &str, data: &[u8]) {
        self.nodes
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
    }

    pub fn data(&self, path: &str) -> Option<Vec<u8>> {
        self.nodes.lock().unwrap().get(path).cloned()
    }

    pub fn remove(&self, path: &str) {
        self.nodes.lock().unwrap().remove(path);
    }

    /// Make reads of `path` fail with `NoNode` even while it is listed,
    /// simulating a child that vanished between listing and fetch.
    pub fn vanish_on_get(&self, path: &str) {
        self.vanished.lock().unwrap().insert(path.to_string());
    }

    /// Make reads of `path` fail with a backend error.
    pub fn poison_get(&self, path: &str) {
        self.poisoned.lock().unwrap().insert(path.to_string());
    }

    /// Queue a result served by the next read of `path`, ahead of the
    /// node's actual data. Queued results are served in insertion order.
    pub fn stage_get(&self, path: &str, result: Result<Vec<u8>, StoreError>) {
        self.staged
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(result);
    }

    /// Queue an error served by the next children listing of `path`.
    pub fn stage_children_error(&self, path: &str, err: StoreError) {
        self.children_errors
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(err);
    }

    /// Queue an error served by the next existence check of `path`.
    pub fn stage_exists_error(&self, path: &str, err: StoreError) {
        self.exists_errors
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(err);
    }

    /// Fire the most recently armed watch.
    pub fn fire(&self, event: WatchEvent) {
        let tx = self.armed.lock().unwrap().pop().expect("an armed watch");
        let _ = tx.send(event);
    }

    /// Drop the most recently armed watch without firing it.
    pub fn drop_watch(&self) {
        self.armed.lock().unwrap().pop().expect("an armed watch");
    }

    fn arm(&self) -> WatchReceiver {
        let (tx, rx) = oneshot::channel();
        self.armed.lock().unwrap().push(tx);
        rx
    }

    fn child_names(&self, path: &str) -> Result<Vec<String>, StoreError> {
        if let Some(queue) = self.children_errors.lock().unwrap().get_mut(path)
            && !queue.is_empty()
        {
            return Err(queue.remove(0));
        }
        let nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path) {
            return Err(StoreError::NoNode);
        }
        let prefix = format!("{}/", path.trim_end_matches('/'));
        Ok(nodes
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn children(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.child_names(path)
    }

    async fn children_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, WatchReceiver), StoreError> {
        let children = self.child_names(path)?;
        Ok((children, self.arm()))
    }

    async fn exists_watch(&self, path: &str) -> Result<(bool, WatchReceiver), StoreError> {
        if let Some(queue) = self.exists_errors.lock().unwrap().get_mut(path)
            && !queue.is_empty()
        {
            return Err(queue.remove(0));
        }
        let exists = self.nodes.lock().unwrap().contains_key(path);
        Ok((exists, self.arm()))
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        if let Some(queue) = self.staged.lock().unwrap().get_mut(path)
            && !queue.is_empty()
        {
            return queue.remove(0);
        }
        if self.vanished.lock().unwrap().contains(path) {
            return Err(StoreError::NoNode);
        }
        if self.poisoned.lock().unwrap().contains(path) {
            return Err(StoreError::Backend("poisoned read".to_string()));
        }
        self.nodes
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or(StoreError::NoNode)
    }

    async fn set(&self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.get_mut(path) {
            Some(slot) => {
                *slot = data.to_vec();
                Ok(())
            }
            None => Err(StoreError::NoNode),
        }
    }

    async fn create(&self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut nodes = self.nodes.lock().unwrap();
        let parent = match path.rfind('/') {
            Some(0) => "/",
            Some(idx) => &path[..idx],
            None => return Err(StoreError::Backend("relative path".to_string())),
        };
        if parent != "/" && !nodes.contains_key(parent) {
            return Err(StoreError::NoNode);
        }
        nodes.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
