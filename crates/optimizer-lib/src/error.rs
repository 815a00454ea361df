//! Error taxonomy for the optimizer pipeline
//!
//! No variant here is fatal for a whole run: per-resource failures are
//! caught at the resource boundary and converted into degraded
//! recommendations by the pipeline.

use thiserror::Error;

use crate::models::{Provider, ResourceType};

#[derive(Error, Debug)]
pub enum OptimizerError {
    /// The provider backing a metrics source could not be reached
    #[error("metrics source unavailable for {provider}: {reason}")]
    SourceUnavailable { provider: Provider, reason: String },

    /// Some requested resources returned no samples; partial results remain usable
    #[error("partial data: {0} resource(s) returned no samples")]
    PartialData(usize),

    /// A resource had no samples in the analysis window
    #[error("insufficient data for resource {0}")]
    InsufficientData(String),

    /// The price table has no adjacent shape in the family to resize into
    #[error("no suitable shape adjacent to {shape} for {provider}/{resource_type}")]
    NoSuitableShape {
        provider: Provider,
        resource_type: ResourceType,
        shape: String,
    },

    /// The price table has no entry for the given triple
    #[error("no price entry for {provider}/{resource_type}/{shape}")]
    PriceNotFound {
        provider: Provider,
        resource_type: ResourceType,
        shape: String,
    },

    /// Caller violated an interface contract (empty id set, inverted window)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
