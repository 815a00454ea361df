//! End-to-end optimization run
//!
//! Wires the stages together: fetch -> analyze -> recommend -> estimate
//! -> report. Each stage owns its output and hands it downstream as
//! read-only input. Every per-resource failure is converted into a
//! degraded recommendation at the resource boundary, so a run always
//! produces a report.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::analyzer::analyze;
use crate::engine::{recommend, Policy};
use crate::error::OptimizerError;
use crate::models::{
    Action, Confidence, MetricName, Recommendation, Report, ResourceInfo, UtilizationProfile,
};
use crate::pricing::{estimate_savings, PriceBook};
use crate::report::build_report;
use crate::source::{fetch_all, FetchConfig, FetchWindow, MetricsSource};

/// Run a full analysis over every resource the sources know about
pub async fn run(
    sources: &[Arc<dyn MetricsSource>],
    window: FetchWindow,
    fetch_config: &FetchConfig,
    policy: &Policy,
    book: &PriceBook,
    shutdown: broadcast::Receiver<()>,
) -> Report {
    let fetched = fetch_all(sources, window, fetch_config, shutdown).await;
    info!(
        resources = fetched.resources.len(),
        samples = fetched.samples.len(),
        missing = fetched.missing.len(),
        cancelled = fetched.cancelled,
        "Fetch phase complete"
    );

    let profiles = analyze(&fetched.samples, policy.idle_threshold_pct, &policy.off_hours);
    let mut by_resource: HashMap<&str, Vec<&UtilizationProfile>> = HashMap::new();
    for profile in &profiles {
        by_resource
            .entry(profile.resource_id.as_str())
            .or_default()
            .push(profile);
    }

    let mut resources: Vec<&ResourceInfo> = fetched.resources.iter().collect();
    resources.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));
    resources.dedup_by(|a, b| a.resource_id == b.resource_id);

    let mut recommendations = Vec::with_capacity(resources.len());
    for resource in resources {
        let profile = by_resource
            .get(resource.resource_id.as_str())
            .and_then(|candidates| select_profile(candidates, policy.primary_metric));

        let recommendation = match profile {
            Some(profile) => {
                let mut rec = recommend(profile, resource, book, policy);
                match estimate_savings(&rec, book, policy.off_hours_fraction) {
                    Ok(savings) => rec.estimated_monthly_savings = savings,
                    Err(e) => {
                        warn!(
                            resource_id = %rec.resource_id,
                            error = %e,
                            "Savings estimate degraded to zero"
                        );
                        rec.estimated_monthly_savings = 0.0;
                        rec.rationale = format!("{} (savings unknown: {})", rec.rationale, e);
                    }
                }
                rec
            }
            None => {
                let cause = OptimizerError::InsufficientData(resource.resource_id.clone());
                Recommendation {
                    resource_id: resource.resource_id.clone(),
                    provider: resource.provider,
                    resource_type: resource.resource_type,
                    action: Action::NoAction,
                    current_shape: resource.shape_id.clone(),
                    recommended_shape: None,
                    estimated_monthly_savings: 0.0,
                    confidence: Confidence::Low,
                    rationale: cause.to_string(),
                }
            }
        };
        recommendations.push(recommendation);
    }

    let mut report = build_report(recommendations);
    report.partial = fetched.cancelled;
    report.missing_resources = fetched.missing;
    info!(
        recommendations = report.recommendations.len(),
        total_potential_savings = report.total_potential_savings,
        partial = report.partial,
        "Report built"
    );
    report
}

/// Pick the profile that drives the decision for a resource
///
/// Prefers the policy's primary metric; falls back to the first metric in
/// enum order so resources that never report the primary metric (disks
/// reporting only iops) still get analyzed.
fn select_profile<'a>(
    candidates: &[&'a UtilizationProfile],
    primary: MetricName,
) -> Option<&'a UtilizationProfile> {
    candidates
        .iter()
        .find(|p| p.metric == primary)
        .or_else(|| candidates.iter().min_by_key(|p| p.metric))
        .copied()
}
