#![deny(missing_docs)]
#![doc = "Core types, derived metrics, output identifiers and run configuration for the Fertilizer metadata pipeline."]

pub mod config;
pub mod errors;
pub mod ids;
pub mod metrics;
mod types;

pub use config::{HumidityScale, OutputConfig, RunConfig, SourceConfig};
pub use errors::{ErrorInfo, FertError};
pub use ids::OutputIdEncoding;
pub use metrics::{compute_metrics, validate_token};
pub use types::{DerivedMetrics, TokenRecord};
