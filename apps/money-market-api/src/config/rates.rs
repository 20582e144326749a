//! Rate annualization configuration.

use serde::Deserialize;

use crate::domain::rates::{BlockCadence, DEFAULT_BLOCKS_PER_MINUTE};

/// Rate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Blocks produced per minute on the target chain.
    #[serde(default = "default_blocks_per_minute")]
    pub blocks_per_minute: u32,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            blocks_per_minute: default_blocks_per_minute(),
        }
    }
}

impl RatesConfig {
    /// The block cadence to annualize with.
    #[must_use]
    pub const fn cadence(&self) -> BlockCadence {
        BlockCadence::new(self.blocks_per_minute)
    }
}

const fn default_blocks_per_minute() -> u32 {
    DEFAULT_BLOCKS_PER_MINUTE
}
