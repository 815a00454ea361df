//! File-backed metrics source
//!
//! Serves the [`MetricsSource`] contract from a JSON metric export, the
//! format produced by the provider collection tooling. Useful for offline
//! analysis runs and as the reference implementation of the fetch contract.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{async_trait, FetchOutcome, FetchWindow, MetricsSource};
use crate::error::{OptimizerError, Result};
use crate::models::{Provider, ResourceInfo, ResourceSample};

/// On-disk export shape: one provider's inventory plus its samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricExport {
    pub provider: Provider,
    pub resources: Vec<ResourceInfo>,
    pub samples: Vec<ResourceSample>,
}

/// Metrics source replaying a previously exported data set
pub struct ReplaySource {
    export: MetricExport,
}

impl ReplaySource {
    pub fn new(export: MetricExport) -> Self {
        Self { export }
    }

    /// Load an export file written by the collection tooling
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let export: MetricExport = serde_json::from_str(&raw)?;
        debug!(
            provider = %export.provider,
            resources = export.resources.len(),
            samples = export.samples.len(),
            "Loaded metric export"
        );
        Ok(Self::new(export))
    }
}

#[async_trait]
impl MetricsSource for ReplaySource {
    fn provider(&self) -> Provider {
        self.export.provider
    }

    async fn inventory(&self) -> Result<Vec<ResourceInfo>> {
        Ok(self.export.resources.clone())
    }

    async fn fetch(&self, resource_ids: &[String], window: FetchWindow) -> Result<FetchOutcome> {
        if resource_ids.is_empty() {
            return Err(OptimizerError::InvalidRequest(
                "fetch requires a non-empty resource id set".to_string(),
            ));
        }

        let requested: HashSet<&str> = resource_ids.iter().map(String::as_str).collect();
        let samples: Vec<ResourceSample> = self
            .export
            .samples
            .iter()
            .filter(|s| requested.contains(s.resource_id.as_str()) && window.contains(s.timestamp))
            .cloned()
            .collect();

        let returned: HashSet<&str> = samples.iter().map(|s| s.resource_id.as_str()).collect();
        let missing: Vec<String> = resource_ids
            .iter()
            .filter(|id| !returned.contains(id.as_str()))
            .cloned()
            .collect();

        Ok(FetchOutcome { samples, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricName, ResourceType};
    use std::io::Write;

    fn sample(id: &str, ts: i64, value: f64) -> ResourceSample {
        ResourceSample {
            resource_id: id.to_string(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            timestamp: ts,
            metric_name: MetricName::CpuPct,
            value,
        }
    }

    fn resource(id: &str) -> ResourceInfo {
        ResourceInfo {
            resource_id: id.to_string(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            shape_id: "t3.medium".to_string(),
            region: None,
            tags: Default::default(),
        }
    }

    fn export() -> MetricExport {
        MetricExport {
            provider: Provider::Aws,
            resources: vec![resource("vm-1"), resource("vm-2")],
            samples: vec![
                sample("vm-1", 100, 10.0),
                sample("vm-1", 200, 20.0),
                sample("vm-2", 500, 30.0),
            ],
        }
    }

    #[tokio::test]
    async fn fetch_filters_by_id_and_window() {
        let source = ReplaySource::new(export());
        let window = FetchWindow::new(0, 300).unwrap();
        let outcome = source
            .fetch(&["vm-1".to_string()], window)
            .await
            .unwrap();
        assert_eq!(outcome.samples.len(), 2);
        assert!(outcome.missing.is_empty());
    }

    #[tokio::test]
    async fn fetch_reports_missing_ids() {
        let source = ReplaySource::new(export());
        let window = FetchWindow::new(0, 300).unwrap();
        let outcome = source
            .fetch(&["vm-1".to_string(), "vm-2".to_string()], window)
            .await
            .unwrap();
        // vm-2's only sample is at t=500, outside the window
        assert_eq!(outcome.missing, vec!["vm-2".to_string()]);
        assert_eq!(outcome.samples.len(), 2);
    }

    #[tokio::test]
    async fn fetch_rejects_empty_id_set() {
        let source = ReplaySource::new(export());
        let window = FetchWindow::new(0, 300).unwrap();
        let result = source.fetch(&[], window).await;
        assert!(matches!(result, Err(OptimizerError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn fetch_is_restartable() {
        let source = ReplaySource::new(export());
        let window = FetchWindow::new(0, 300).unwrap();
        let first = source.fetch(&["vm-1".to_string()], window).await.unwrap();
        let second = source.fetch(&["vm-1".to_string()], window).await.unwrap();
        assert_eq!(first.samples, second.samples);
    }

    #[tokio::test]
    async fn from_path_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&export()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let source = ReplaySource::from_path(file.path()).unwrap();
        assert_eq!(source.provider(), Provider::Aws);
        let inventory = source.inventory().await.unwrap();
        assert_eq!(inventory.len(), 2);
    }
}
