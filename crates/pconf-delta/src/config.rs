//! Reconciliation settings

use crate::defaults::{DefaultValueProvider, StandardDefaults};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation configuration
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```toml
/// max_link_depth = 32
/// salvage_value_sets = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Depth cap for link traversal; `None` is unbounded
    pub max_link_depth: Option<usize>,
    /// Try to narrow or widen a mismatching value set before resetting it
    pub salvage_value_sets: bool,
}

impl ReconcileConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With link depth cap
    #[inline]
    #[must_use]
    pub fn with_max_link_depth(mut self, max_link_depth: Option<usize>) -> Self {
        self.max_link_depth = max_link_depth;
        self
    }

    /// With value set salvaging on or off
    #[inline]
    #[must_use]
    pub fn with_salvage_value_sets(mut self, salvage: bool) -> Self {
        self.salvage_value_sets = salvage;
        self
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_link_depth: None,
            salvage_value_sets: true,
        }
    }
}

static STANDARD_DEFAULTS: StandardDefaults = StandardDefaults;

/// Collaborators and switches a fix runs with
#[derive(Clone, Copy)]
pub struct FixContext<'a> {
    /// Default payload source
    pub provider: &'a dyn DefaultValueProvider,
    /// See [`ReconcileConfig::salvage_value_sets`]
    pub salvage_value_sets: bool,
}

impl<'a> FixContext<'a> {
    /// Context with `provider`, salvaging enabled
    #[must_use]
    pub fn new(provider: &'a dyn DefaultValueProvider) -> Self {
        Self {
            provider,
            salvage_value_sets: true,
        }
    }

    /// Context with `provider` and the switches of `config`
    #[must_use]
    pub fn from_config(provider: &'a dyn DefaultValueProvider, config: &ReconcileConfig) -> Self {
        Self {
            provider,
            salvage_value_sets: config.salvage_value_sets,
        }
    }

    /// With value set salvaging on or off
    #[must_use]
    pub fn with_salvage_value_sets(mut self, salvage: bool) -> Self {
        self.salvage_value_sets = salvage;
        self
    }
}

impl FixContext<'static> {
    /// Context backed by [`StandardDefaults`]
    #[must_use]
    pub fn standard() -> Self {
        Self::new(&STANDARD_DEFAULTS)
    }
}

impl fmt::Debug for FixContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixContext")
            .field("salvage_value_sets", &self.salvage_value_sets)
            .finish_non_exhaustive()
    }
}
