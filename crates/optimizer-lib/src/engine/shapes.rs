//! Resize shape selection
//!
//! Rightsizing walks the price book's family ladder: entries for the same
//! (provider, resource_type, family) ordered by monthly cost. The target
//! is the immediately adjacent shape; a current shape missing from the
//! table or sitting at the end of its ladder yields `NoSuitableShape`.

use crate::error::{OptimizerError, Result};
use crate::models::{PriceEntry, Provider, ResourceType};
use crate::pricing::PriceBook;

/// Next cheaper shape in the same family
pub fn next_smaller<'a>(
    book: &'a PriceBook,
    provider: Provider,
    resource_type: ResourceType,
    shape_id: &str,
) -> Result<&'a PriceEntry> {
    adjacent(book, provider, resource_type, shape_id, Direction::Smaller)
}

/// Next more expensive shape in the same family
pub fn next_larger<'a>(
    book: &'a PriceBook,
    provider: Provider,
    resource_type: ResourceType,
    shape_id: &str,
) -> Result<&'a PriceEntry> {
    adjacent(book, provider, resource_type, shape_id, Direction::Larger)
}

#[derive(Clone, Copy)]
enum Direction {
    Smaller,
    Larger,
}

fn adjacent<'a>(
    book: &'a PriceBook,
    provider: Provider,
    resource_type: ResourceType,
    shape_id: &str,
    direction: Direction,
) -> Result<&'a PriceEntry> {
    let no_suitable = || OptimizerError::NoSuitableShape {
        provider,
        resource_type,
        shape: shape_id.to_string(),
    };

    let current = book
        .lookup(provider, resource_type, shape_id)
        .ok_or_else(no_suitable)?;
    let ladder = book.family_entries(provider, resource_type, &current.family);
    let position = ladder
        .iter()
        .position(|e| e.shape_id == shape_id)
        .ok_or_else(no_suitable)?;

    let target = match direction {
        Direction::Smaller => position.checked_sub(1),
        Direction::Larger => {
            if position + 1 < ladder.len() {
                Some(position + 1)
            } else {
                None
            }
        }
    };

    target.map(|i| ladder[i]).ok_or_else(no_suitable)
}

#[cfg(test)]
mod tests {
    use super::*;

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
        ])
    }

    #[test]
    fn walks_down_the_family_ladder() {
        let b = book();
        let smaller = next_smaller(&b, Provider::Aws, ResourceType::Compute, "t3.small").unwrap();
        assert_eq!(smaller.shape_id, "t3.micro");
    }

    #[test]
    fn walks_up_the_family_ladder() {
        let b = book();
        let larger = next_larger(&b, Provider::Aws, ResourceType::Compute, "t3.small").unwrap();
        assert_eq!(larger.shape_id, "t3.medium");
    }

    #[test]
    fn smallest_shape_has_no_smaller_neighbor() {
        let b = book();
        let err = next_smaller(&b, Provider::Aws, ResourceType::Compute, "t3.micro").unwrap_err();
        assert!(matches!(err, OptimizerError::NoSuitableShape { .. }));
    }

    #[test]
    fn largest_shape_has_no_larger_neighbor() {
        let b = book();
        let err = next_larger(&b, Provider::Aws, ResourceType::Compute, "t3.medium").unwrap_err();
        assert!(matches!(err, OptimizerError::NoSuitableShape { .. }));
    }

    #[test]
    fn unknown_shape_is_not_resizable() {
        let b = book();
        let err = next_smaller(&b, Provider::Aws, ResourceType::Compute, "t3.nano").unwrap_err();
        assert!(matches!(err, OptimizerError::NoSuitableShape { .. }));
    }

    #[test]
    fn ladder_never_crosses_families() {
        let b = book();
        // m5.large is alone in its family, so no neighbor either way
        assert!(next_smaller(&b, Provider::Aws, ResourceType::Compute, "m5.large").is_err());
        assert!(next_larger(&b, Provider::Aws, ResourceType::Compute, "m5.large").is_err());
    }
}
