//! Blocking membership watch.
//!
//! Arms a one-shot watch on a set and suspends until either the watch
//! fires or the session becomes unusable. One invocation observes at
//! most one change; the watch is never re-armed.

use tracing::{debug, info};

use crate::ensemble::SessionEvents;
use crate::error::{ClientError, Result};
use crate::store::{SessionEvent, Store, StoreError, WatchEvent, WatchReceiver};

/// Successful watch outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The set changed while we were watching.
    Changed,
    /// The set did not exist when the watch was requested but had
    /// appeared by the time the fallback existence watch was armed; the
    /// wait is already satisfied.
    AlreadyPresent,
}

/// Block until the child list of `path` changes, the path is created,
/// or the session is lost.
///
/// The watch is armed by the same call that returns the current state,
/// so a mutation racing this function still fires it.
pub async fn await_change<S: Store>(
    store: &S,
    session: &mut SessionEvents,
    path: &str,
) -> Result<WatchOutcome> {
    let watch = match store.children_watch(path).await {
        Ok((children, watch)) => {
            debug!(path, children = children.len(), "watching set membership");
            watch
        }
        Err(StoreError::NoNode) => {
            let (exists, watch) = store.exists_watch(path).await?;
            if exists {
                info!(path, "set appeared before the existence watch was armed");
                return Ok(WatchOutcome::AlreadyPresent);
            }
            debug!(path, "set absent, watching for creation");
            watch
        }
        Err(err) => return Err(err.into()),
    };

    armed(session, watch).await
}

/// Wait on the session stream and the one-shot watch; the first
/// decisive event wins.
async fn armed(session: &mut SessionEvents, mut watch: WatchReceiver) -> Result<WatchOutcome> {
    let mut watch_live = true;
    loop {
        tokio::select! {
            event = session.recv() => match event {
                Some(SessionEvent::Expired) | None => return Err(ClientError::SessionExpired),
                Some(SessionEvent::Faulted(reason)) => {
                    return Err(ClientError::SessionFault(reason));
                }
                Some(event) => info!("session event while watching: {event:?}"),
            },
            fired = &mut watch, if watch_live => {
                // One-shot: whatever fired, this watch never re-arms.
                watch_live = false;
                match fired {
                    Ok(
                        WatchEvent::NodeCreated
                        | WatchEvent::NodeDeleted
                        | WatchEvent::ChildrenChanged,
                    ) => return Ok(WatchOutcome::Changed),
                    Ok(WatchEvent::SessionMarker) => {
                        debug!("session marker on watch channel, still waiting");
                    }
                    Ok(_) | Err(_) => return Err(ClientError::WatchLost),
                }
            }
        }
    }
}
