//! Serverset observation and reconciliation client.
//!
//! This crate provides:
//! - a narrow `Store` abstraction over the coordination store, with a
//!   ZooKeeper backend isolated to one module
//! - the ensemble connector and its session-lifecycle event stream
//! - random member selection with bounded retry under churn
//! - a blocking watcher that suspends until a set changes or the session
//!   becomes unusable
//! - digest-diff reconciliation against an on-disk snapshot
//! - a raw content publisher

pub mod digest;
pub mod ensemble;
pub mod error;
pub mod publish;
pub mod reconcile;
pub mod select;
pub mod store;
pub mod watch;

pub use ensemble::{SESSION_TIMEOUT, SessionEvents, connect};
pub use error::{ClientError, Result};
pub use publish::publish;
pub use reconcile::reconcile;
pub use select::select_member;
pub use store::{SessionEvent, Store, StoreError, WatchEvent, ZkStore};
pub use watch::{WatchOutcome, await_change};
