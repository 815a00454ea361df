//! Cost anomaly detection
//!
//! Scans a per-provider daily cost series and flags points whose z-score
//! against the trailing history exceeds a configurable threshold. Purely
//! statistical and deterministic: the same series always yields the same
//! anomalies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Provider;

/// Minimum history before detection is meaningful
const MIN_HISTORY_DEFAULT: usize = 14;

/// One observed cost data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPoint {
    pub provider: Provider,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub cost: f64,
}

/// Severity bands for a detected anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Warning,
    High,
    Critical,
}

/// A cost point flagged as anomalous against its trailing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnomaly {
    pub provider: Provider,
    pub timestamp: i64,
    pub observed: f64,
    pub expected: f64,
    pub z_score: f64,
}

impl CostAnomaly {
    /// Percentage above the expected cost
    pub fn percentage_above_expected(&self) -> f64 {
        if self.expected < f64::EPSILON {
            return 0.0;
        }
        ((self.observed - self.expected) / self.expected) * 100.0
    }

    pub fn severity(&self) -> AnomalySeverity {
        if self.z_score >= 5.0 {
            AnomalySeverity::Critical
        } else if self.z_score >= 4.0 {
            AnomalySeverity::High
        } else {
            AnomalySeverity::Warning
        }
    }
}

/// Detects cost spikes exceeding a standard deviation threshold
pub struct CostAnomalyDetector {
    /// Number of standard deviations to consider a spike
    pub z_threshold: f64,
    /// Points of history required before a point is judged
    pub min_history: usize,
}

impl CostAnomalyDetector {
    pub fn new(z_threshold: f64) -> Self {
        Self {
            z_threshold,
            min_history: MIN_HISTORY_DEFAULT,
        }
    }

    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    /// Scan a cost series, one pass per provider
    pub fn detect(&self, series: &[CostPoint]) -> Vec<CostAnomaly> {
        let mut by_provider: BTreeMap<Provider, Vec<&CostPoint>> = BTreeMap::new();
        for point in series {
            by_provider.entry(point.provider).or_default().push(point);
        }

        let mut anomalies = Vec::new();
        for (provider, mut points) in by_provider {
            points.sort_by_key(|p| p.timestamp);
            for i in self.min_history..points.len() {
                let history: Vec<f64> = points[..i].iter().map(|p| p.cost).collect();
                let mean = mean(&history);
                let std_dev = std_dev(&history, mean);
                if std_dev < f64::EPSILON {
                    continue;
                }
                let z_score = (points[i].cost - mean) / std_dev;
                if z_score > self.z_threshold {
                    debug!(
                        provider = %provider,
                        timestamp = points[i].timestamp,
                        z_score,
                        "Cost anomaly detected"
                    );
                    anomalies.push(CostAnomaly {
                        provider,
                        timestamp: points[i].timestamp,
                        observed: points[i].cost,
                        expected: mean,
                        z_score,
                    });
                }
            }
        }
        anomalies
    }
}

impl Default for CostAnomalyDetector {
    fn default() -> Self {
        Self::new(3.0)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (Bessel's correction)
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn series(provider: Provider, costs: &[f64]) -> Vec<CostPoint> {
        costs
            .iter()
            .enumerate()
            .map(|(i, cost)| CostPoint {
                provider,
                timestamp: i as i64 * DAY,
                cost: *cost,
            })
            .collect()
    }

    #[test]
    fn stable_series_has_no_anomalies() {
        let mut costs = Vec::new();
        for i in 0..30 {
            costs.push(1000.0 + (i % 5) as f64 * 10.0);
        }
        let detector = CostAnomalyDetector::new(3.0);
        assert!(detector.detect(&series(Provider::Aws, &costs)).is_empty());
    }

    #[test]
    fn spike_is_detected() {
        let mut costs = Vec::new();
        for i in 0..29 {
            costs.push(1000.0 + (i % 5) as f64 * 10.0);
        }
        costs.push(2500.0);
        let detector = CostAnomalyDetector::new(3.0);
        let anomalies = detector.detect(&series(Provider::Aws, &costs));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].timestamp, 29 * DAY);
        assert!(anomalies[0].z_score > 3.0);
    }

    #[test]
    fn insufficient_history_is_skipped() {
        let costs = vec![100.0, 110.0, 90.0, 5000.0];
        let detector = CostAnomalyDetector::new(3.0);
        assert!(detector.detect(&series(Provider::Gcp, &costs)).is_empty());
    }

    #[test]
    fn zero_variance_history_is_skipped() {
        let mut costs = vec![100.0; 20];
        costs.push(5000.0);
        let detector = CostAnomalyDetector::new(3.0).with_min_history(10);
        assert!(detector.detect(&series(Provider::Azure, &costs)).is_empty());
    }

    #[test]
    fn providers_are_scanned_independently() {
        let mut points = Vec::new();
        for i in 0..20 {
            points.push(CostPoint {
                provider: Provider::Aws,
                timestamp: i * DAY,
                cost: 1000.0 + (i % 4) as f64 * 25.0,
            });
            points.push(CostPoint {
                provider: Provider::DigitalOcean,
                timestamp: i * DAY,
                cost: 200.0 + (i % 4) as f64 * 5.0,
            });
        }
        points.push(CostPoint {
            provider: Provider::DigitalOcean,
            timestamp: 20 * DAY,
            cost: 900.0,
        });
        let detector = CostAnomalyDetector::new(3.0);
        let anomalies = detector.detect(&points);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].provider, Provider::DigitalOcean);
    }

    #[test]
    fn severity_bands() {
        let anomaly = CostAnomaly {
            provider: Provider::Aws,
            timestamp: 0,
            observed: 2000.0,
            expected: 1000.0,
            z_score: 5.5,
        };
        assert_eq!(anomaly.severity(), AnomalySeverity::Critical);
        let high = CostAnomaly {
            z_score: 4.2,
            ..anomaly.clone()
        };
        assert_eq!(high.severity(), AnomalySeverity::High);
        let warning = CostAnomaly {
            z_score: 3.2,
            ..anomaly
        };
        assert_eq!(warning.severity(), AnomalySeverity::Warning);
        assert!((high.percentage_above_expected() - 100.0).abs() < 1e-9);
    }
}
