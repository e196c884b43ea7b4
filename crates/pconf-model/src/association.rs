//! Associations between product types and links between configurations

use crate::name::QualifiedName;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Min/max cardinality; `max: None` is unbounded (`*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cardinality {
    /// Minimum number of targets
    #[serde(default)]
    pub min: u32,
    /// Maximum number of targets
    #[serde(default)]
    pub max: Option<u32>,
}

impl Cardinality {
    /// `0..1`
    pub const OPTIONAL: Self = Self { min: 0, max: Some(1) };
    /// `1..1`
    pub const MANDATORY: Self = Self { min: 1, max: Some(1) };
    /// `0..*`
    pub const MANY: Self = Self { min: 0, max: None };

    /// Create cardinality
    #[inline]
    #[must_use]
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Check if `count` lies within bounds
    #[inline]
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        count >= u64::from(self.min) && self.max.map_or(true, |max| count <= u64::from(max))
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::MANY
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// Association declared by a product type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDefinition {
    /// Role name, unique within one type node
    pub role: String,
    /// Type the linked configurations must be instances of
    pub target: QualifiedName,
    /// Allowed number of links
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Abstract associations are refined by subtypes
    #[serde(default)]
    pub is_abstract: bool,
}

impl AssociationDefinition {
    /// Create association with `0..*` cardinality
    #[must_use]
    pub fn new(role: impl Into<String>, target: QualifiedName) -> Self {
        Self {
            role: role.into(),
            target,
            cardinality: Cardinality::MANY,
            is_abstract: false,
        }
    }

    /// With cardinality
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Mark abstract
    #[must_use]
    pub fn abstract_association(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// Link from one configuration to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Role name of the association this link instantiates
    pub role: String,
    /// Identifier of the target configuration
    pub target: QualifiedName,
    /// Cardinality set on this link
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl Link {
    /// Create link with `0..*` cardinality
    #[must_use]
    pub fn new(role: impl Into<String>, target: QualifiedName) -> Self {
        Self {
            role: role.into(),
            target,
            cardinality: Cardinality::MANY,
        }
    }

    /// With cardinality
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }
}
