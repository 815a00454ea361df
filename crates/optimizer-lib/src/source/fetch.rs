//! Concurrent fetch phase
//!
//! Fans one fetch task per resource onto a `JoinSet`, each bounded by a
//! configurable timeout. Per-resource failures and timeouts land in the
//! missing set instead of aborting the run; a broadcast shutdown signal
//! stops issuing new work and keeps whatever already completed.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{FetchOutcome, FetchWindow, MetricsSource};
use crate::error::OptimizerError;
use crate::models::{ResourceInfo, ResourceSample};

/// Configuration for the fetch phase
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-resource fetch timeout
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Merged outcome of the fetch phase across all sources
#[derive(Debug, Default)]
pub struct FetchResult {
    /// Inventory of every source that answered
    pub resources: Vec<ResourceInfo>,
    /// All samples, concatenated; grouping happens in the analyzer
    pub samples: Vec<ResourceSample>,
    /// Resource ids that produced no samples (timeout, failure, or no data)
    pub missing: Vec<String>,
    /// True when a shutdown signal interrupted the phase
    pub cancelled: bool,
}

/// Fetch samples for every resource known to the given sources
///
/// Inventories each source, then runs one bounded fetch task per resource.
/// Never fails as a whole: unreachable sources are skipped with a warning
/// and their resources never enter the result.
pub async fn fetch_all(
    sources: &[Arc<dyn MetricsSource>],
    window: FetchWindow,
    config: &FetchConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> FetchResult {
    let mut result = FetchResult::default();
    let mut targets: Vec<(ResourceInfo, Arc<dyn MetricsSource>)> = Vec::new();

    for source in sources {
        match tokio::time::timeout(config.timeout, source.inventory()).await {
            Ok(Ok(resources)) => {
                debug!(
                    provider = %source.provider(),
                    resources = resources.len(),
                    "Inventoried source"
                );
                for info in resources {
                    targets.push((info.clone(), Arc::clone(source)));
                    result.resources.push(info);
                }
            }
            Ok(Err(e)) => {
                warn!(provider = %source.provider(), error = %e, "Source inventory failed");
            }
            Err(_) => {
                warn!(provider = %source.provider(), "Source inventory timed out");
            }
        }
    }

    let mut pending: HashSet<String> = targets
        .iter()
        .map(|(info, _)| info.resource_id.clone())
        .collect();

    let mut set = JoinSet::new();
    for (info, source) in targets {
        let id = info.resource_id.clone();
        let timeout = config.timeout;
        set.spawn(async move {
            let ids = vec![id.clone()];
            let outcome = tokio::time::timeout(timeout, source.fetch(&ids, window)).await;
            (id, outcome)
        });
    }

    let mut shutdown_closed = false;
    loop {
        tokio::select! {
            biased;
            signal = shutdown.recv(), if !shutdown_closed => {
                match signal {
                    Err(broadcast::error::RecvError::Closed) => {
                        // Sender gone without signalling; keep fetching
                        shutdown_closed = true;
                    }
                    _ => {
                        info!("Fetch phase cancelled, keeping completed results");
                        result.cancelled = true;
                        set.abort_all();
                        // Drain tasks that finished before the abort landed
                        while let Some(joined) = set.join_next().await {
                            if let Ok((id, Ok(Ok(outcome)))) = joined {
                                pending.remove(&id);
                                merge_outcome(&mut result, outcome);
                            }
                        }
                        break;
                    }
                }
            }
            joined = set.join_next() => {
                match joined {
                    None => break,
                    Some(Ok((id, Ok(Ok(outcome))))) => {
                        pending.remove(&id);
                        merge_outcome(&mut result, outcome);
                    }
                    Some(Ok((id, Ok(Err(e))))) => {
                        warn!(resource_id = %id, error = %e, "Fetch failed");
                        pending.remove(&id);
                        result.missing.push(id);
                    }
                    Some(Ok((id, Err(_)))) => {
                        warn!(resource_id = %id, "Fetch timed out");
                        pending.remove(&id);
                        result.missing.push(id);
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Fetch task failed to join");
                    }
                }
            }
        }
    }

    result.missing.extend(pending);
    result.missing.sort();
    result.missing.dedup();

    if !result.missing.is_empty() {
        let partial = OptimizerError::PartialData(result.missing.len());
        warn!(error = %partial, "Fetch phase returned partial data");
    }

    result
}

fn merge_outcome(result: &mut FetchResult, outcome: FetchOutcome) {
    result.samples.extend(outcome.samples);
    result.missing.extend(outcome.missing);
}
