//! pconf Validation
//!
//! Severity-tagged findings about product types, schemas and configurations.
//! Nothing here fails: every check reports [`ValidationMessage`]s collected
//! in a [`MessageList`].
//!
//! # Example
//!
//! ```rust
//! use pconf_model::{ProductModel, ProductType, QualifiedName};
//! use pconf_validation::{codes, validate_model};
//!
//! let mut model = ProductModel::new();
//! let name = QualifiedName::parse("Policy").unwrap();
//! model.insert_type(ProductType::new(name.clone()).with_supertype(name)).unwrap();
//!
//! let messages = validate_model(&model);
//! assert_eq!(messages.with_code(codes::SUPERTYPE_CYCLE).count(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod consistency;
mod message;
mod rules;

// Re-exports
pub use consistency::validate_supertype_consistency;
pub use message::{codes, MessageList, Severity, ValidationMessage};
pub use rules::{validate_configuration, validate_model, validate_type};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
