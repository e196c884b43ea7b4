//! pconf Graph
//!
//! Traversals over the product model: the supertype hierarchy of types and
//! schemas, and the link graph between configurations.
//!
//! # Core Concepts
//!
//! - [`TypeHierarchyWalker`]: cycle-safe upward walk, subtype first
//! - [`FlattenedType`]: every definition visible to a type, shadowing applied
//! - [`AssociationCycleDetector`]: first link cycle reachable from a root
//! - [`find_hierarchy_cycles`]: all supertype cycles of a whole model
//! - [`find_link_cycles`]: all link cycle groups of a whole model
//!
//! # Example
//!
//! ```rust
//! use pconf_graph::{type_walker, Termination};
//! use pconf_model::{ProductModel, ProductType, QualifiedName, TypeRepository};
//!
//! let base = QualifiedName::parse("Base").unwrap();
//! let sub = QualifiedName::parse("Sub").unwrap();
//!
//! let mut model = ProductModel::new();
//! model.insert_type(ProductType::new(base.clone())).unwrap();
//! model.insert_type(ProductType::new(sub.clone()).with_supertype(base)).unwrap();
//!
//! let start = model.find_type(&sub).unwrap();
//! let (nodes, summary) = type_walker(&model).collect(start);
//! assert_eq!(nodes.len(), 2);
//! assert_eq!(summary.termination, Termination::Root);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cycle;
mod flatten;
mod hierarchy;
mod walker;

// Re-exports
pub use cycle::{find_link_cycles, AssociationCycleDetector, CyclePath, CycleStep, LinkCycle};
pub use flatten::{Declared, FlattenedType};
pub use hierarchy::{find_hierarchy_cycles, is_same_or_subschema, is_same_or_subtype, supertypes};
pub use walker::{schema_walker, type_walker, Termination, TypeHierarchyWalker, Visit, WalkSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
