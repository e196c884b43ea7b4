//! pconf Model
//!
//! Product types, product configurations and the read-only contracts the
//! reconciliation engine consumes.
//!
//! # Core Concepts
//!
//! - [`ProductType`]: schema node with property and association definitions,
//!   organized in a single-inheritance supertype hierarchy
//! - [`ProductConfiguration`]: dated instance of a product type holding
//!   [`PropertyValue`]s and [`Link`]s
//! - [`TypeRepository`] / [`ConfigurationRepository`]: lookups by
//!   [`QualifiedName`]
//! - [`ProductModel`]: in-memory arena implementing both repositories
//!
//! # Example
//!
//! ```rust
//! use pconf_model::{ProductModel, ProductType, PropertyDefinition, QualifiedName, TypeRepository};
//!
//! let mut policy = ProductType::new(QualifiedName::parse("motor.Policy").unwrap());
//! policy.add_property(PropertyDefinition::value("premium", "Decimal")).unwrap();
//!
//! let mut model = ProductModel::new();
//! model.insert_type(policy).unwrap();
//! assert!(model.find_type(&QualifiedName::parse("motor.Policy").unwrap()).is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod association;
mod configuration;
mod error;
mod name;
mod product_type;
mod property;
mod repository;

// Re-exports
pub use association::{AssociationDefinition, Cardinality, Link};
pub use configuration::ProductConfiguration;
pub use error::ModelError;
pub use name::{NameError, QualifiedName};
pub use product_type::{HierarchyNode, ProductType, Schema};
pub use property::{
    Payload, PropertyDefinition, PropertyKind, PropertyValue, ValueSet, ValueSetShape,
};
pub use repository::{ConfigurationRepository, ProductModel, TypeRepository};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
