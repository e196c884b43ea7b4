//! Error types for model mutation and lookup

use crate::name::{NameError, QualifiedName};

/// Model invariant and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Property declared twice in one type node
    #[error("type '{owner}' already declares property '{name}'")]
    DuplicateProperty { owner: QualifiedName, name: String },

    /// Association role declared twice in one type node
    #[error("type '{owner}' already declares association '{role}'")]
    DuplicateAssociation { owner: QualifiedName, role: String },

    /// Second value for the same property in one configuration
    #[error("configuration '{configuration}' already has a value for '{name}'")]
    DuplicatePropertyValue {
        configuration: QualifiedName,
        name: String,
    },

    /// No value of that name in the configuration
    #[error("configuration '{configuration}' has no value for '{name}'")]
    PropertyValueNotFound {
        configuration: QualifiedName,
        name: String,
    },

    /// Element registered twice in a model
    #[error("duplicate {element} '{name}' in model")]
    DuplicateName {
        element: &'static str,
        name: QualifiedName,
    },

    /// Malformed name
    #[error("invalid name: {0}")]
    Name(#[from] NameError),
}
