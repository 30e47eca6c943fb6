//! Member and endpoint models for serverset entries.
//!
//! A serverset child node carries a JSON document describing one live
//! process instance. Field names on the wire are camelCase
//! (`serviceEndpoint`, `additionalEndpoints`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A network endpoint advertised by a member.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One registered process instance in a serverset.
///
/// Fields missing from the payload decode to their defaults, matching the
/// lenient readers used by serverset publishers. Absence of a key in
/// `additional_endpoints` means that named port does not exist for this
/// member; callers must report the miss rather than substitute a default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    pub status: String,
    pub additional_endpoints: BTreeMap<String, Endpoint>,
    pub service_endpoint: Endpoint,
    pub shard: i64,
}

impl Member {
    /// Endpoint registered under a logical port name, if any.
    pub fn named_endpoint(&self, port_name: &str) -> Option<&Endpoint> {
        self.additional_endpoints.get(port_name)
    }
}

/// Last-known reconciled state of one serverset: child name to member.
pub type Digest = BTreeMap<String, Member>;

/// Error decoding a member payload.
///
/// Non-fatal to multi-node operations: callers skip the offending node
/// and continue over the rest of the set.
#[derive(Debug, thiserror::Error)]
#[error("malformed member payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Decode one serverset child payload.
pub fn decode(data: &[u8]) -> Result<Member, DecodeError> {
    Ok(serde_json::from_slice(data)?)
}

/// Encode a digest as a single JSON object keyed by child name.
pub fn encode(digest: &Digest) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(digest)
}
