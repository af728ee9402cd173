//! Getter methods for `PipelineConfig`

use std::num::NonZeroUsize;
use std::time::Duration;

use super::types::{ContentOptions, PipelineConfig};

impl PipelineConfig {
    #[must_use]
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Capacity as the `NonZeroUsize` the LRU cache needs
    ///
    /// A zero capacity (only reachable by constructing the struct without
    /// `validate`) is clamped to one.
    #[must_use]
    pub fn cache_capacity_nonzero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }

    #[must_use]
    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    #[must_use]
    pub fn dom_parsing(&self) -> bool {
        self.dom_parsing
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[must_use]
    pub fn defaults(&self) -> &ContentOptions {
        &self.defaults
    }
}
