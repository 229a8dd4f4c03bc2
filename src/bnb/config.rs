//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FlowShopError, FlowShopResult};

/// Configuration for the branch-and-bound search.
///
/// # Examples
///
/// ```
/// use u_flowshop::bnb::BnbConfig;
///
/// let config = BnbConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_node_limit(1_000_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BnbConfig {
    /// Wall-clock budget in milliseconds. `None` = no limit.
    pub time_limit_ms: Option<u64>,

    /// Maximum number of nodes entered. `None` = no limit.
    pub node_limit: Option<u64>,

    /// Seed the incumbent with the Johnson/Horn schedule before searching.
    pub warm_start: bool,

    /// Once no arrivals are pending, finish the path in Johnson order as a
    /// single leaf instead of branching further.
    pub johnson_closure: bool,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: None,
            node_limit: None,
            warm_start: true,
            johnson_closure: true,
        }
    }
}

impl BnbConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    pub fn with_johnson_closure(mut self, enabled: bool) -> Self {
        self.johnson_closure = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`FlowShopError::InvalidConfig`] for a zero time limit.
    pub fn validate(&self) -> FlowShopResult<()> {
        if self.time_limit_ms == Some(0) {
            return Err(FlowShopError::InvalidConfig(
                "time_limit_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
