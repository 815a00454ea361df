//! Utilization analysis
//!
//! Computes rolling statistics over a lookback window of samples: mean,
//! nearest-rank percentiles, idle-time fraction, and the off-hours idle
//! fraction feeding the scheduling rule. One profile is produced per
//! (resource_id, metric) pair; policy decides later which metric drives
//! a recommendation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{MetricName, ResourceSample, UtilizationProfile};

/// Off-hours classification for the scheduling rule
///
/// The window wraps midnight when start_hour > end_hour, e.g. 20..8.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffHours {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_include_weekends")]
    pub include_weekends: bool,
}

fn default_start_hour() -> u32 {
    20
}

fn default_end_hour() -> u32 {
    8
}

fn default_include_weekends() -> bool {
    true
}

impl Default for OffHours {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            include_weekends: default_include_weekends(),
        }
    }
}

impl OffHours {
    /// Classify a unix timestamp as off-hours (UTC)
    pub fn is_off_hours(&self, timestamp: i64) -> bool {
        let Some(dt) = DateTime::from_timestamp(timestamp, 0) else {
            return false;
        };
        if self.include_weekends
            && matches!(dt.weekday(), Weekday::Sat | Weekday::Sun)
        {
            return true;
        }
        let hour = dt.hour();
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

/// Compute one utilization profile per (resource_id, metric) pair
///
/// Samples are sorted internally by (timestamp, value), so the output is
/// independent of input order. A sample counts as idle when its value is
/// strictly below `idle_threshold`. Resources absent from `samples`
/// produce no profile; the caller treats their absence as insufficient
/// data.
pub fn analyze(
    samples: &[ResourceSample],
    idle_threshold: f64,
    off_hours: &OffHours,
) -> Vec<UtilizationProfile> {
    let mut groups: BTreeMap<(&str, MetricName), Vec<&ResourceSample>> = BTreeMap::new();
    for sample in samples {
        groups
            .entry((sample.resource_id.as_str(), sample.metric_name))
            .or_default()
            .push(sample);
    }

    let mut profiles = Vec::with_capacity(groups.len());
    for ((resource_id, metric), mut group) in groups {
        group.sort_by(|a, b| {
            a.timestamp.cmp(&b.timestamp).then(
                a.value
                    .partial_cmp(&b.value)
                    .unwrap_or(Ordering::Equal),
            )
        });

        let values: Vec<f64> = group.iter().map(|s| s.value).collect();
        let mut sorted_values = values.clone();
        sorted_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let idle_count = values.iter().filter(|v| **v < idle_threshold).count();
        let off: Vec<f64> = group
            .iter()
            .filter(|s| off_hours.is_off_hours(s.timestamp))
            .map(|s| s.value)
            .collect();
        let off_hours_idle_fraction = if off.is_empty() {
            None
        } else {
            let idle = off.iter().filter(|v| **v < idle_threshold).count();
            Some(idle as f64 / off.len() as f64)
        };

        let profile = UtilizationProfile {
            resource_id: resource_id.to_string(),
            metric,
            window_start: group[0].timestamp,
            window_end: group[group.len() - 1].timestamp,
            samples: values.len(),
            mean: mean(&values),
            p50: percentile(&sorted_values, 50.0),
            p95: percentile(&sorted_values, 95.0),
            idle_fraction: idle_count as f64 / values.len() as f64,
            off_hours_idle_fraction,
        };
        debug!(
            resource_id = %profile.resource_id,
            metric = %profile.metric,
            samples = profile.samples,
            mean = profile.mean,
            "Computed utilization profile"
        );
        profiles.push(profile);
    }
    profiles
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Nearest-rank percentile over an ascending-sorted slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
