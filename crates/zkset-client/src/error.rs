//! Client error types for serverset operations.

use crate::store::StoreError;

/// Error type for serverset client operations.
///
/// Anything surfaced here is fatal to the invoking command. Per-item
/// failures (one child failing to decode, a child vanishing between the
/// listing and the fetch) are logged and skipped where they occur and
/// never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to connect to ensemble: {0}")]
    Connect(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("uninitialized serverset at {path}")]
    UninitializedSet { path: String },

    #[error("no servers found in set {path}")]
    EmptySet { path: String },

    #[error("no member of {path} resolved after {attempts} attempts")]
    SelectionExhausted { path: String, attempts: usize },

    #[error("endpoint missing {port} port")]
    MissingPort { port: String },

    #[error("parent node of {path} does not exist")]
    MissingParent { path: String },

    #[error("session expired")]
    SessionExpired,

    #[error("session error: {0}")]
    SessionFault(String),

    #[error("watch invalidated before a change was observed")]
    WatchLost,

    #[error("failed to read digest {path}: {reason}")]
    DigestUnreadable { path: String, reason: String },

    #[error("failed to write digest {path}: {reason}")]
    DigestWrite { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;
