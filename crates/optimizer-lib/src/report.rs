//! Report aggregation
//!
//! Collects recommendations across resources and providers into a single
//! deterministic report: sorted descending by estimated savings, ties
//! broken by resource id. The total sums only non-negative entries;
//! negative entries (accepted cost increases) stay in the list so they
//! are visible to the consumer.

use std::cmp::Ordering;

use chrono::Utc;

use crate::models::{Recommendation, Report};

/// Build the final report from collected recommendations
pub fn build_report(mut recommendations: Vec<Recommendation>) -> Report {
    recommendations.sort_by(|a, b| {
        b.estimated_monthly_savings
            .partial_cmp(&a.estimated_monthly_savings)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.resource_id.cmp(&b.resource_id))
    });

    let total_potential_savings = recommendations
        .iter()
        .map(|r| r.estimated_monthly_savings)
        .filter(|s| *s > 0.0)
        .sum();

    Report {
        generated_at: Utc::now(),
        recommendations,
        total_potential_savings,
        partial: false,
        missing_resources: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Confidence, Provider, ResourceType};

    fn rec(id: &str, savings: f64) -> Recommendation {
        Recommendation {
            resource_id: id.to_string(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            action: Action::RightsizeDown,
            current_shape: "t3.small".to_string(),
            recommended_shape: Some("t3.micro".to_string()),
            estimated_monthly_savings: savings,
            confidence: Confidence::High,
            rationale: String::new(),
        }
    }

    #[test]
    fn sorted_descending_by_savings() {
        let report = build_report(vec![rec("a", 5.0), rec("b", 50.0), rec("c", 20.0)]);
        let ids: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.resource_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_break_by_resource_id_ascending() {
        let report = build_report(vec![rec("z", 10.0), rec("a", 10.0), rec("m", 10.0)]);
        let ids: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.resource_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "m", "z"]);
    }

    #[test]
    fn total_sums_only_non_negative_entries() {
        let report = build_report(vec![rec("a", 30.0), rec("b", -17.0), rec("c", 12.0)]);
        assert!((report.total_potential_savings - 42.0).abs() < 1e-9);
        // The negative entry is retained, not dropped
        assert_eq!(report.recommendations.len(), 3);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.estimated_monthly_savings < 0.0));
    }

    #[test]
    fn total_matches_recommendation_sum() {
        let report = build_report(vec![rec("a", 1.5), rec("b", 2.5), rec("c", 0.0)]);
        let expected: f64 = report
            .recommendations
            .iter()
            .map(|r| r.estimated_monthly_savings)
            .filter(|s| *s > 0.0)
            .sum();
        assert_eq!(report.total_potential_savings, expected);
    }

    #[test]
    fn empty_input_builds_empty_report() {
        let report = build_report(vec![]);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.total_potential_savings, 0.0);
        assert!(!report.partial);
    }
}
