//! Core library for multi-cloud cost optimization
//!
//! This crate provides the core functionality for:
//! - Normalizing provider utilization data behind a common source boundary
//! - Rolling utilization analysis (mean, percentiles, idle fractions)
//! - Policy-driven rightsizing, scheduling, and cleanup recommendations
//! - Price-table savings estimation and report aggregation
//! - Statistical cost anomaly detection

pub mod analyzer;
pub mod anomaly;
pub mod engine;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod pricing;
pub mod report;
pub mod source;

pub use analyzer::{analyze, OffHours};
pub use anomaly::{AnomalySeverity, CostAnomaly, CostAnomalyDetector, CostPoint};
pub use engine::{recommend, Policy};
pub use error::{OptimizerError, Result};
pub use models::*;
pub use pricing::{estimate_savings, PriceBook};
pub use report::build_report;
pub use source::{fetch_all, FetchConfig, FetchWindow, MetricsSource, ReplaySource};
