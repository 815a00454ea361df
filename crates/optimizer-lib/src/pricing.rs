//! Price table and savings estimation
//!
//! The price book is static reference data loaded once per run and
//! read-only afterwards. Savings estimates follow the action semantics:
//! resize deltas may be negative (an accepted cost increase), deletes
//! recover the full monthly cost, scheduling recovers the off-hours
//! share.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{OptimizerError, Result};
use crate::models::{Action, PriceEntry, Provider, Recommendation, ResourceType};

/// Resize family derived from a shape id: the leading segment before the
/// first `.` or `-` (e.g. "t3.micro" -> "t3", "s-2vcpu-4gb" -> "s")
pub fn shape_family(shape_id: &str) -> &str {
    match shape_id.find(['.', '-']) {
        Some(idx) => &shape_id[..idx],
        None => shape_id,
    }
}

/// Read-only price table with exact lookup and per-family ladders
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    entries: Vec<PriceEntry>,
    index: HashMap<(Provider, ResourceType, String), usize>,
}

impl PriceBook {
    pub fn new(mut entries: Vec<PriceEntry>) -> Self {
        for entry in &mut entries {
            if entry.family.is_empty() {
                entry.family = shape_family(&entry.shape_id).to_string();
            }
        }
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| ((e.provider, e.resource_type, e.shape_id.clone()), i))
            .collect();
        Self { entries, index }
    }

    /// Load a JSON price table (array of entries)
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<PriceEntry> = serde_json::from_str(&raw)?;
        debug!(entries = entries.len(), "Loaded price table");
        Ok(Self::new(entries))
    }

    pub fn lookup(
        &self,
        provider: Provider,
        resource_type: ResourceType,
        shape_id: &str,
    ) -> Option<&PriceEntry> {
        self.index
            .get(&(provider, resource_type, shape_id.to_string()))
            .map(|i| &self.entries[*i])
    }

    /// Monthly cost for a shape, or `PriceNotFound`
    pub fn monthly_cost(
        &self,
        provider: Provider,
        resource_type: ResourceType,
        shape_id: &str,
    ) -> Result<f64> {
        self.lookup(provider, resource_type, shape_id)
            .map(|e| e.monthly_cost)
            .ok_or_else(|| OptimizerError::PriceNotFound {
                provider,
                resource_type,
                shape: shape_id.to_string(),
            })
    }

    /// Entries of one resize family, ascending by monthly cost (ties by
    /// shape id for determinism)
    pub fn family_entries(
        &self,
        provider: Provider,
        resource_type: ResourceType,
        family: &str,
    ) -> Vec<&PriceEntry> {
        let mut entries: Vec<&PriceEntry> = self
            .entries
            .iter()
            .filter(|e| {
                e.provider == provider && e.resource_type == resource_type && e.family == family
            })
            .collect();
        entries.sort_by(|a, b| {
            a.monthly_cost
                .partial_cmp(&b.monthly_cost)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.shape_id.cmp(&b.shape_id))
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Estimate the monthly savings a recommendation would realize
///
/// Negative values (rightsize_up) represent an accepted cost increase and
/// are reported, not dropped. Missing prices surface as `PriceNotFound`;
/// the caller retains the recommendation with zero savings.
pub fn estimate_savings(
    recommendation: &Recommendation,
    book: &PriceBook,
    off_hours_fraction: f64,
) -> Result<f64> {
    let provider = recommendation.provider;
    let resource_type = recommendation.resource_type;

    match recommendation.action {
        Action::NoAction | Action::PurchaseCommitment => Ok(0.0),
        Action::DeleteUnused => {
            book.monthly_cost(provider, resource_type, &recommendation.current_shape)
        }
        Action::ScheduleOffHours => {
            let current =
                book.monthly_cost(provider, resource_type, &recommendation.current_shape)?;
            Ok(current * off_hours_fraction)
        }
        Action::RightsizeDown | Action::RightsizeUp => {
            let current =
                book.monthly_cost(provider, resource_type, &recommendation.current_shape)?;
            match &recommendation.recommended_shape {
                Some(shape) => {
                    let recommended = book.monthly_cost(provider, resource_type, shape)?;
                    Ok(current - recommended)
                }
                None => Ok(0.0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    fn entry(shape: &str, cost: f64) -> PriceEntry {
        PriceEntry {
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            shape_id: shape.to_string(),
            family: String::new(),
            monthly_cost: cost,
        }
    }

    fn book() -> PriceBook {
        PriceBook::new(vec![
            entry("t3.micro", 8.47),
            entry("t3.small", 16.94),
            entry("t3.medium", 33.88),
            entry("m5.large", 86.40),
            PriceEntry {
                provider: Provider::Aws,
                resource_type: ResourceType::Disk,
                shape_id: "gp3-100".to_string(),
                family: String::new(),
                monthly_cost: 10.0,
            },
        ])
    }

    fn rec(action: Action, current: &str, recommended: Option<&str>) -> Recommendation {
        Recommendation {
            resource_id: "vm-1".to_string(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            action,
            current_shape: current.to_string(),
            recommended_shape: recommended.map(str::to_string),
            estimated_monthly_savings: 0.0,
            confidence: Confidence::Medium,
            rationale: String::new(),
        }
    }

    #[test]
    fn family_is_derived_when_absent() {
        assert_eq!(shape_family("t3.micro"), "t3");
        assert_eq!(shape_family("s-2vcpu-4gb"), "s");
        assert_eq!(shape_family("Standard_B2s"), "Standard_B2s");
        let b = book();
        assert_eq!(b.lookup(Provider::Aws, ResourceType::Compute, "t3.micro").unwrap().family, "t3");
    }

    #[test]
    fn family_entries_sorted_by_cost() {
        let b = book();
        let ladder = b.family_entries(Provider::Aws, ResourceType::Compute, "t3");
        let shapes: Vec<&str> = ladder.iter().map(|e| e.shape_id.as_str()).collect();
        assert_eq!(shapes, vec!["t3.micro", "t3.small", "t3.medium"]);
    }

    #[test]
    fn lookup_miss_is_price_not_found() {
        let b = book();
        let err = b
            .monthly_cost(Provider::Aws, ResourceType::Compute, "t3.nano")
            .unwrap_err();
        assert!(matches!(err, OptimizerError::PriceNotFound { .. }));
    }

    #[test]
    fn rightsize_down_savings_is_cost_delta() {
        let b = book();
        let r = rec(Action::RightsizeDown, "t3.small", Some("t3.micro"));
        let savings = estimate_savings(&r, &b, 0.65).unwrap();
        assert!((savings - 8.47).abs() < 1e-9);
    }

    #[test]
    fn rightsize_up_savings_is_negative() {
        let b = book();
        let r = rec(Action::RightsizeUp, "t3.small", Some("t3.medium"));
        let savings = estimate_savings(&r, &b, 0.65).unwrap();
        assert!(savings < 0.0);
        assert!((savings + 16.94).abs() < 1e-9);
    }

    #[test]
    fn delete_unused_recovers_full_cost() {
        let b = book();
        let mut r = rec(Action::DeleteUnused, "gp3-100", None);
        r.resource_type = ResourceType::Disk;
        let savings = estimate_savings(&r, &b, 0.65).unwrap();
        assert!((savings - 10.0).abs() < 1e-9);
    }

    #[test]
    fn schedule_off_hours_uses_fraction() {
        let b = book();
        let r = rec(Action::ScheduleOffHours, "t3.medium", None);
        let savings = estimate_savings(&r, &b, 0.65).unwrap();
        assert!((savings - 33.88 * 0.65).abs() < 1e-9);
    }

    #[test]
    fn no_action_and_commitment_are_zero() {
        let b = book();
        assert_eq!(estimate_savings(&rec(Action::NoAction, "t3.small", None), &b, 0.65).unwrap(), 0.0);
        assert_eq!(
            estimate_savings(&rec(Action::PurchaseCommitment, "t3.small", None), &b, 0.65).unwrap(),
            0.0
        );
    }

    #[test]
    fn missing_price_surfaces_as_error() {
        let b = book();
        let r = rec(Action::DeleteUnused, "unknown-shape", None);
        assert!(matches!(
            estimate_savings(&r, &b, 0.65),
            Err(OptimizerError::PriceNotFound { .. })
        ));
    }
}
