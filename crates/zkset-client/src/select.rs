//! Random member selection.
//!
//! Lists the set, picks one child uniformly at random, and resolves it
//! to a connection endpoint. Under concurrent churn a child can vanish
//! between the listing and the read; that race is retried a bounded
//! number of times against a fresh listing.

use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::warn;

use zkset_api::{Endpoint, decode};

use crate::error::{ClientError, Result};
use crate::store::{Store, StoreError, join_path};

/// Attempt cap for the list-pick-fetch loop.
const SELECT_ATTEMPTS: usize = 8;

/// Base delay between attempts; grows linearly with the attempt number.
const RETRY_DELAY: Duration = Duration::from_millis(200);

/// Pick one live member of the set at `path` uniformly at random and
/// resolve it to an endpoint.
///
/// With `port_name` the member's `additionalEndpoints` entry of that
/// name is resolved instead of the service endpoint; a member lacking
/// the name is a data-shape problem and fails immediately, never
/// retried. An absent or empty set is fatal.
pub async fn select_member<S, R>(
    store: &S,
    rng: &mut R,
    path: &str,
    port_name: Option<&str>,
) -> Result<Endpoint>
where
    S: Store,
    R: Rng + ?Sized,
{
    for attempt in 1..=SELECT_ATTEMPTS {
        let children = match store.children(path).await {
            Ok(children) => children,
            Err(StoreError::NoNode) => {
                return Err(ClientError::UninitializedSet {
                    path: path.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        if children.is_empty() {
            return Err(ClientError::EmptySet {
                path: path.to_string(),
            });
        }

        let child = children.choose(&mut *rng).expect("children is non-empty");
        let child_path = join_path(path, child);

        match store.get(&child_path).await {
            Ok(bytes) => match decode(&bytes) {
                Ok(member) => {
                    return match port_name {
                        None => Ok(member.service_endpoint),
                        Some(port) => {
                            member.named_endpoint(port).cloned().ok_or_else(|| {
                                ClientError::MissingPort {
                                    port: port.to_string(),
                                }
                            })
                        }
                    };
                }
                Err(err) => warn!(path = %child_path, attempt, "failed to decode member: {err}"),
            },
            Err(StoreError::NoNode) => {
                warn!(path = %child_path, attempt, "member vanished before read");
            }
            // Session-scoped failures are not a selection race; give up.
            Err(err) => return Err(err.into()),
        }

        if attempt < SELECT_ATTEMPTS {
            tokio::time::sleep(RETRY_DELAY * attempt as u32).await;
        }
    }

    Err(ClientError::SelectionExhausted {
        path: path.to_string(),
        attempts: SELECT_ATTEMPTS,
    })
}
