//! Error types for delta computation and fix application
//!
//! Structural drift between a configuration and its type is never an error
//! here; it is reported as [`DeltaEntry`](crate::DeltaEntry) data. Only
//! resolution failures and failing fixes are.

use crate::entry::DeltaEntry;
use pconf_graph::CyclePath;
use pconf_model::{ModelError, QualifiedName};

/// Delta computation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeltaError {
    /// The configuration's product type cannot be resolved at all
    #[error("configuration '{configuration}' references unknown product type '{product_type}'")]
    InvalidModel {
        configuration: QualifiedName,
        product_type: QualifiedName,
    },

    /// No configuration with that id
    #[error("unknown configuration '{0}'")]
    UnknownConfiguration(QualifiedName),
}

/// Default payload could not be produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefaultValueError {
    /// Declared default literal does not parse as its datatype
    #[error("default '{literal}' of property '{property}' is not a valid {datatype}")]
    InvalidDefault {
        property: String,
        datatype: String,
        literal: String,
    },

    /// Provider has no default for this property
    #[error("no default for property '{property}': {reason}")]
    Unavailable { property: String, reason: String },
}

/// Failure of a single entry fix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixFailure {
    /// Default value provider failed
    #[error(transparent)]
    DefaultValue(#[from] DefaultValueError),

    /// Configuration rejected the mutation
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// `Delta::fix` aborted
///
/// Entries before `index` were applied; the configuration is left partially
/// fixed and is not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixApplicationError {
    /// Delta was computed for another configuration
    #[error("delta for '{expected}' cannot be applied to '{actual}'")]
    ConfigurationMismatch {
        expected: QualifiedName,
        actual: QualifiedName,
    },

    /// An entry's fix failed
    #[error("fix #{index} failed ({entry}) after {applied} applied: {source}")]
    EntryFailed {
        /// Position of the failing entry in the delta
        index: usize,
        /// The failing entry
        entry: Box<DeltaEntry>,
        /// Number of entries fixed before the failure
        applied: usize,
        #[source]
        source: FixFailure,
    },
}

impl FixApplicationError {
    /// Number of entries applied before the abort
    #[must_use]
    pub fn applied(&self) -> usize {
        match self {
            Self::ConfigurationMismatch { .. } => 0,
            Self::EntryFailed { applied, .. } => *applied,
        }
    }

    /// The failing entry, if an entry failed
    #[must_use]
    pub fn entry(&self) -> Option<&DeltaEntry> {
        match self {
            Self::ConfigurationMismatch { .. } => None,
            Self::EntryFailed { entry, .. } => Some(entry),
        }
    }
}

/// Compute-and-fix failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Delta could not be computed
    #[error(transparent)]
    Delta(#[from] DeltaError),

    /// Delta could not be applied
    #[error(transparent)]
    Fix(#[from] FixApplicationError),
}

/// Whole-structure reconciliation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// The link graph below the root contains a cycle
    #[error("association cycle: {0}")]
    Cycle(CyclePath),

    /// A reachable configuration could not be diffed
    #[error(transparent)]
    Delta(#[from] DeltaError),
}
