//! Configuration for the content pipeline
//!
//! Two layers: `PipelineConfig` is fixed when the pipeline is constructed
//! (cache sizing, DOM capability, placeholder), `ContentOptions` travels
//! with each call.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::PipelineConfigBuilder;
pub use types::{ContentOptions, PipelineConfig};
