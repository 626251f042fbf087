//! Concurrent fan-out of Banner ID lookups.
//!
//! Every identifier gets its own tokio task. Tasks share nothing but a
//! read-only handle to the lookup, never wait on each other, and report back
//! in completion order. One identifier failing (or its task panicking) is
//! reported for that identifier alone; siblings always run to completion.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

use crate::client::DuckIdLookup;
use crate::error::BannerError;
use crate::model::Resolution;

/// Split a comma-separated list of Banner IDs.
///
/// Tokens are trimmed. Duplicates and empty tokens are kept so that every
/// token yields exactly one outcome.
pub fn parse_banner_ids(input: &str) -> Vec<String> {
    input.split(',').map(|id| id.trim().to_string()).collect()
}

/// Resolve every identifier concurrently, handing each [`Resolution`] to
/// `emit` as soon as its task finishes.
///
/// Returns once all tasks have completed. `emit` runs on the calling task,
/// so it needs no synchronization of its own.
pub async fn resolve_all<L, F>(lookup: Arc<L>, banner_ids: Vec<String>, mut emit: F)
where
    L: DuckIdLookup,
    F: FnMut(Resolution),
{
    let total = banner_ids.len();
    let mut tasks = JoinSet::new();
    let mut pending: HashMap<Id, String> = HashMap::with_capacity(total);

    for banner_id in banner_ids {
        let lookup = Arc::clone(&lookup);
        let owned_id = banner_id.clone();
        let handle = tasks.spawn(async move {
            let outcome = lookup.duck_id(&owned_id).await;
            Resolution {
                banner_id: owned_id,
                outcome,
            }
        });
        pending.insert(handle.id(), banner_id);
    }
    debug!(total, "spawned duckid lookups");

    let mut resolved = 0usize;
    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next_with_id().await {
        let resolution = match joined {
            Ok((id, resolution)) => {
                pending.remove(&id);
                resolution
            }
            Err(join_err) => {
                let banner_id = pending.remove(&join_err.id()).unwrap_or_default();
                warn!(banner_id = %banner_id, "lookup task aborted: {join_err}");
                Resolution {
                    outcome: Err(BannerError::TaskFailed {
                        banner_id: banner_id.clone(),
                        detail: join_err.to_string(),
                    }),
                    banner_id,
                }
            }
        };

        match &resolution.outcome {
            Ok(duck_id) => {
                resolved += 1;
                debug!(banner_id = %resolution.banner_id, duck_id = %duck_id, "resolved");
            }
            Err(err) => {
                failed += 1;
                debug!(
                    banner_id = %resolution.banner_id,
                    error_type = err.error_type(),
                    "lookup failed: {}",
                    err.render_chain()
                );
            }
        }
        emit(resolution);
    }

    info!(total, resolved, failed, "duckid batch complete");
}
