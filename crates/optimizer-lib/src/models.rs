//! Core data models for the cost optimizer

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cloud provider a resource lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    DigitalOcean,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Aws => write!(f, "aws"),
            Provider::Azure => write!(f, "azure"),
            Provider::Gcp => write!(f, "gcp"),
            Provider::DigitalOcean => write!(f, "digital_ocean"),
        }
    }
}

/// Billable resource category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Compute,
    Disk,
    Database,
    LoadBalancer,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Compute => write!(f, "compute"),
            ResourceType::Disk => write!(f, "disk"),
            ResourceType::Database => write!(f, "database"),
            ResourceType::LoadBalancer => write!(f, "load_balancer"),
        }
    }
}

/// Utilization metric reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    CpuPct,
    MemoryPct,
    NetworkBytes,
    Iops,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricName::CpuPct => write!(f, "cpu_pct"),
            MetricName::MemoryPct => write!(f, "memory_pct"),
            MetricName::NetworkBytes => write!(f, "network_bytes"),
            MetricName::Iops => write!(f, "iops"),
        }
    }
}

/// Single utilization observation for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub resource_id: String,
    pub provider: Provider,
    pub resource_type: ResourceType,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub metric_name: MetricName,
    pub value: f64,
}

/// Inventory record describing a resource's current shape and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub resource_id: String,
    pub provider: Provider,
    pub resource_type: ResourceType,
    /// Provider-specific size identifier, e.g. "t3.medium" or "s-2vcpu-4gb"
    pub shape_id: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Rolling utilization statistics for one resource and metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationProfile {
    pub resource_id: String,
    pub metric: MetricName,
    /// First observed sample timestamp (unix seconds)
    pub window_start: i64,
    /// Last observed sample timestamp (unix seconds)
    pub window_end: i64,
    /// Number of samples the profile was computed from
    pub samples: usize,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    /// Fraction of samples below the configured idle threshold
    pub idle_fraction: f64,
    /// Idle fraction over off-hours samples only; None if the window
    /// contained no off-hours samples
    pub off_hours_idle_fraction: Option<f64>,
}

impl UtilizationProfile {
    /// Covered window duration in hours
    pub fn window_hours(&self) -> f64 {
        (self.window_end - self.window_start).max(0) as f64 / 3600.0
    }
}

/// Price-table row for one shape of one resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub provider: Provider,
    pub resource_type: ResourceType,
    pub shape_id: String,
    /// Resize family the shape belongs to; derived from shape_id when empty
    #[serde(default)]
    pub family: String,
    pub monthly_cost: f64,
}

/// Optimization action suggested for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    RightsizeDown,
    RightsizeUp,
    ScheduleOffHours,
    DeleteUnused,
    PurchaseCommitment,
    NoAction,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::RightsizeDown => write!(f, "rightsize_down"),
            Action::RightsizeUp => write!(f, "rightsize_up"),
            Action::ScheduleOffHours => write!(f, "schedule_off_hours"),
            Action::DeleteUnused => write!(f, "delete_unused"),
            Action::PurchaseCommitment => write!(f, "purchase_commitment"),
            Action::NoAction => write!(f, "no_action"),
        }
    }
}

/// Confidence attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Optimization recommendation for a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub resource_id: String,
    pub provider: Provider,
    pub resource_type: ResourceType,
    pub action: Action,
    pub current_shape: String,
    pub recommended_shape: Option<String>,
    /// Negative values represent an accepted cost increase (rightsize_up)
    pub estimated_monthly_savings: f64,
    pub confidence: Confidence,
    pub rationale: String,
}

/// Aggregated optimization report across all resources and providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Sorted descending by estimated savings, ties by resource_id
    pub recommendations: Vec<Recommendation>,
    /// Sum of the non-negative savings entries only
    pub total_potential_savings: f64,
    /// True when the run was cancelled before every fetch completed
    pub partial: bool,
    /// Resource ids that produced no samples during the run
    pub missing_resources: Vec<String>,
}
