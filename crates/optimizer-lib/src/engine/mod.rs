//! Recommendation engine
//!
//! Applies the policy rules to a utilization profile and produces a typed
//! recommendation. Pure and deterministic: the same (profile, price book,
//! policy) triple always yields the same recommendation. Rules are
//! evaluated in fixed priority order; the first match wins.

mod policy;
mod shapes;

pub use policy::Policy;
pub use shapes::{next_larger, next_smaller};

use tracing::debug;

use crate::models::{
    Action, Confidence, Recommendation, ResourceInfo, ResourceType, UtilizationProfile,
};
use crate::pricing::PriceBook;

/// Produce a recommendation for one resource from one utilization profile
pub fn recommend(
    profile: &UtilizationProfile,
    resource: &ResourceInfo,
    book: &PriceBook,
    policy: &Policy,
) -> Recommendation {
    let rec = decide(profile, resource, book, policy);
    debug!(
        resource_id = %rec.resource_id,
        action = %rec.action,
        confidence = %rec.confidence,
        "Recommendation decided"
    );
    rec
}

fn decide(
    profile: &UtilizationProfile,
    resource: &ResourceInfo,
    book: &PriceBook,
    policy: &Policy,
) -> Recommendation {
    let build = |action, recommended_shape, confidence, rationale: String| Recommendation {
        resource_id: resource.resource_id.clone(),
        provider: resource.provider,
        resource_type: resource.resource_type,
        action,
        current_shape: resource.shape_id.clone(),
        recommended_shape,
        estimated_monthly_savings: 0.0,
        confidence,
        rationale,
    };

    let hours = profile.window_hours();

    // Rule 1: never act on a window shorter than the observation minimum
    if hours < policy.min_observation_hours {
        return build(
            Action::NoAction,
            None,
            Confidence::Low,
            format!(
                "insufficient observation: {:.1}h covered, {:.0}h required",
                hours, policy.min_observation_hours
            ),
        );
    }

    // Rule 2: storage idle for essentially the whole window is unused
    if resource.resource_type == ResourceType::Disk
        && profile.idle_fraction >= policy.delete_idle_fraction
    {
        return build(
            Action::DeleteUnused,
            None,
            Confidence::High,
            format!("idle {:.0}% of the window", profile.idle_fraction * 100.0),
        );
    }

    // Rule 3: oversized, shrink one step within the family
    if profile.mean < policy.idle_cpu_pct_below {
        return match next_smaller(book, resource.provider, resource.resource_type, &resource.shape_id)
        {
            Ok(entry) => {
                let confidence = if profile.p95 < policy.oversized_cpu_pct_below {
                    Confidence::High
                } else {
                    Confidence::Medium
                };
                build(
                    Action::RightsizeDown,
                    Some(entry.shape_id.clone()),
                    confidence,
                    format!(
                        "mean {} {:.1}% below {:.0}% threshold",
                        profile.metric, profile.mean, policy.idle_cpu_pct_below
                    ),
                )
            }
            Err(e) => build(
                Action::NoAction,
                None,
                Confidence::Low,
                format!("downsize indicated but {}", e),
            ),
        };
    }

    // Rule 4: undersized, grow one step within the family
    if profile.mean > policy.undersized_cpu_pct_above {
        return match next_larger(book, resource.provider, resource.resource_type, &resource.shape_id)
        {
            Ok(entry) => build(
                Action::RightsizeUp,
                Some(entry.shape_id.clone()),
                Confidence::High,
                format!(
                    "mean {} {:.1}% above {:.0}% threshold",
                    profile.metric, profile.mean, policy.undersized_cpu_pct_above
                ),
            ),
            Err(e) => build(
                Action::NoAction,
                None,
                Confidence::Low,
                format!("upsize indicated but {}", e),
            ),
        };
    }

    // Rule 5: tagged compute with a strong diurnal idle pattern
    if resource.resource_type == ResourceType::Compute
        && resource.tags.contains_key(&policy.schedule_eligible_tag)
    {
        if let Some(off_idle) = profile.off_hours_idle_fraction {
            if off_idle > policy.off_hours_idle_above {
                return build(
                    Action::ScheduleOffHours,
                    None,
                    Confidence::Medium,
                    format!(
                        "off-hours idle fraction {:.2} exceeds {:.2}",
                        off_idle, policy.off_hours_idle_above
                    ),
                );
            }
        }
    }

    // Rule 5b: steady long-running compute is a commitment candidate
    if resource.resource_type == ResourceType::Compute
        && hours >= policy.commitment_min_observation_hours
        && profile.idle_fraction <= policy.commitment_max_idle_fraction
    {
        return build(
            Action::PurchaseCommitment,
            None,
            Confidence::Medium,
            format!("steady utilization over {:.0}h window", hours),
        );
    }

    build(
        Action::NoAction,
        None,
        Confidence::Medium,
        "utilization within target band".to_string(),
    )
}
