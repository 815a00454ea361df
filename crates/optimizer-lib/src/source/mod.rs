//! Metrics source boundary
//!
//! Provider-specific metrics and billing collectors live behind the
//! [`MetricsSource`] trait so the analyzer and recommendation engine never
//! branch on provider identity. This crate ships a file-backed
//! [`ReplaySource`] for exported metric data; live SDK adapters implement
//! the same contract out of tree.

mod fetch;
mod replay;

pub use fetch::{fetch_all, FetchConfig, FetchResult};
pub use replay::{MetricExport, ReplaySource};

use crate::error::{OptimizerError, Result};
use crate::models::{ResourceInfo, ResourceSample};

pub use async_trait::async_trait;

/// Half-open time interval: start inclusive, end exclusive (unix seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: i64,
    pub end: i64,
}

impl FetchWindow {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start >= end {
            return Err(OptimizerError::InvalidRequest(format!(
                "window start {} must precede end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start) as f64 / 3600.0
    }
}

/// Result of one fetch pass
///
/// `missing` lists requested resource ids that returned no samples; the
/// samples that did arrive are still usable (partial data is non-fatal).
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub samples: Vec<ResourceSample>,
    pub missing: Vec<String>,
}

/// Trait for provider metrics source implementations
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Provider this source reports for
    fn provider(&self) -> crate::models::Provider;

    /// List resources known to this source
    async fn inventory(&self) -> Result<Vec<ResourceInfo>>;

    /// Fetch samples for the given resources over a half-open window
    ///
    /// The id set must be non-empty. One finite pass per call; callers may
    /// call again with a fresh window.
    async fn fetch(&self, resource_ids: &[String], window: FetchWindow) -> Result<FetchOutcome>;
}
