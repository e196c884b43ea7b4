//! pconf Delta
//!
//! Computes the structural differences between a product configuration and
//! its (possibly evolved) product type, and repairs them.
//!
//! # Core Concepts
//!
//! - [`DeltaComputer`]: read-only diff of one configuration
//! - [`Delta`] / [`DeltaEntry`]: the mismatches, in a fixed kind order
//! - [`Delta::fix`]: applies every entry's fix once, stopping at the first
//!   failure
//! - [`DefaultValueProvider`]: where created and reset values get their payload
//! - [`compute_structure_delta`]: diff of everything reachable over links
//!
//! # Example
//!
//! ```rust
//! use pconf_delta::{DeltaComputer, FixContext};
//! use pconf_model::{
//!     ConfigurationRepository, ProductConfiguration, ProductModel, ProductType,
//!     PropertyDefinition, QualifiedName,
//! };
//!
//! let policy = QualifiedName::parse("Policy").unwrap();
//! let id = QualifiedName::parse("Policy2024").unwrap();
//!
//! let mut ty = ProductType::new(policy.clone());
//! ty.add_property(PropertyDefinition::value("premium", "Decimal")).unwrap();
//!
//! let mut model = ProductModel::new();
//! model.insert_type(ty).unwrap();
//! model.insert_configuration(ProductConfiguration::new(id.clone(), policy)).unwrap();
//!
//! let configuration = model.find_configuration(&id).unwrap();
//! let delta = DeltaComputer::new(&model).compute_delta(configuration).unwrap();
//! assert_eq!(delta.len(), 1);
//!
//! let configuration = model.configuration_mut(&id).unwrap();
//! delta.fix(configuration, &FixContext::standard()).unwrap();
//! assert_eq!(configuration.property_values().len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod computer;
mod config;
mod defaults;
mod delta;
mod entry;
mod error;
mod reconcile;
mod structure;

// Re-exports
pub use computer::DeltaComputer;
pub use config::{FixContext, ReconcileConfig};
pub use defaults::{DefaultValueProvider, StandardDefaults};
pub use delta::{Delta, DeltaSummary};
pub use entry::{DeltaEntry, DeltaKind};
pub use error::{
    DefaultValueError, DeltaError, FixApplicationError, FixFailure, ReconcileError, StructureError,
};
pub use reconcile::reconcile;
pub use structure::{compute_structure_delta, StructureDelta, UnresolvedLink};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
