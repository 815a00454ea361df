//! Recommendation policy
//!
//! Every threshold the decision rules consult lives here, with serde
//! defaults so a policy file or environment overlay only needs to name
//! the fields it changes.

use serde::{Deserialize, Serialize};

use crate::analyzer::OffHours;
use crate::models::MetricName;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// A sample below this value counts as idle (percent for cpu/memory)
    #[serde(default = "default_idle_threshold_pct")]
    pub idle_threshold_pct: f64,

    /// Mean utilization below this triggers rightsize_down
    #[serde(default = "default_idle_cpu_pct_below")]
    pub idle_cpu_pct_below: f64,

    /// p95 below this upgrades a rightsize_down to high confidence
    #[serde(default = "default_oversized_cpu_pct_below")]
    pub oversized_cpu_pct_below: f64,

    /// Mean utilization above this triggers rightsize_up
    #[serde(default = "default_undersized_cpu_pct_above")]
    pub undersized_cpu_pct_above: f64,

    /// Idle fraction at or above this marks a disk as unused
    #[serde(default = "default_delete_idle_fraction")]
    pub delete_idle_fraction: f64,

    /// Minimum covered window before any action is recommended
    #[serde(default = "default_min_observation_hours")]
    pub min_observation_hours: f64,

    /// Tag key whose presence permits schedule_off_hours
    #[serde(default = "default_schedule_eligible_tag")]
    pub schedule_eligible_tag: String,

    /// Off-hours idle fraction above this triggers schedule_off_hours
    #[serde(default = "default_off_hours_idle_above")]
    pub off_hours_idle_above: f64,

    /// Share of the month treated as off-hours for savings estimates
    #[serde(default = "default_off_hours_fraction")]
    pub off_hours_fraction: f64,

    /// Minimum covered window before purchase_commitment is considered
    #[serde(default = "default_commitment_min_observation_hours")]
    pub commitment_min_observation_hours: f64,

    /// Maximum idle fraction for a workload to count as steady
    #[serde(default = "default_commitment_max_idle_fraction")]
    pub commitment_max_idle_fraction: f64,

    /// Metric that drives decisions when a resource reports several
    #[serde(default = "default_primary_metric")]
    pub primary_metric: MetricName,

    #[serde(default)]
    pub off_hours: OffHours,
}

fn default_idle_threshold_pct() -> f64 {
    5.0
}

fn default_idle_cpu_pct_below() -> f64 {
    20.0
}

fn default_oversized_cpu_pct_below() -> f64 {
    40.0
}

fn default_undersized_cpu_pct_above() -> f64 {
    80.0
}

fn default_delete_idle_fraction() -> f64 {
    0.95
}

fn default_min_observation_hours() -> f64 {
    24.0
}

fn default_schedule_eligible_tag() -> String {
    "auto-schedule".to_string()
}

fn default_off_hours_idle_above() -> f64 {
    0.8
}

fn default_off_hours_fraction() -> f64 {
    0.65
}

fn default_commitment_min_observation_hours() -> f64 {
    720.0
}

fn default_commitment_max_idle_fraction() -> f64 {
    0.10
}

fn default_primary_metric() -> MetricName {
    MetricName::CpuPct
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            idle_threshold_pct: default_idle_threshold_pct(),
            idle_cpu_pct_below: default_idle_cpu_pct_below(),
            oversized_cpu_pct_below: default_oversized_cpu_pct_below(),
            undersized_cpu_pct_above: default_undersized_cpu_pct_above(),
            delete_idle_fraction: default_delete_idle_fraction(),
            min_observation_hours: default_min_observation_hours(),
            schedule_eligible_tag: default_schedule_eligible_tag(),
            off_hours_idle_above: default_off_hours_idle_above(),
            off_hours_fraction: default_off_hours_fraction(),
            commitment_min_observation_hours: default_commitment_min_observation_hours(),
            commitment_max_idle_fraction: default_commitment_max_idle_fraction(),
            primary_metric: default_primary_metric(),
            off_hours: OffHours::default(),
        }
    }
}
