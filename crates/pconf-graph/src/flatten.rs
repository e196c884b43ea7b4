//! Flattening of inherited definitions
//!
//! Collects every property and association definition visible to a product
//! type through its supertype chain. The walk is subtype first, so the first
//! occurrence of a name wins and overriding declarations shadow the ones they
//! override instead of duplicating them.

use crate::walker::{type_walker, Termination, Visit};
use indexmap::IndexMap;
use pconf_model::{
    AssociationDefinition, ProductType, PropertyDefinition, QualifiedName, TypeRepository,
};

/// A definition together with the type node that declares it
#[derive(Debug, PartialEq, Eq)]
pub struct Declared<'a, T> {
    /// The definition
    pub definition: &'a T,
    /// Declaring type
    pub owner: &'a QualifiedName,
}

// Manual impls: derive would demand `T: Copy`.
impl<T> Clone for Declared<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Declared<'_, T> {}

/// All definitions visible to a product type
///
/// Order is walk order: the type's own declarations first, then each
/// supertype's, skipping shadowed names.
#[derive(Debug, Clone)]
pub struct FlattenedType<'a> {
    product_type: &'a ProductType,
    hierarchy: Vec<&'a ProductType>,
    properties: IndexMap<&'a str, Declared<'a, PropertyDefinition>>,
    associations: IndexMap<&'a str, Declared<'a, AssociationDefinition>>,
    termination: Termination,
}

impl<'a> FlattenedType<'a> {
    /// Flatten `product_type` against the types of `repo`
    pub fn collect<R>(repo: &'a R, product_type: &'a ProductType) -> Self
    where
        R: TypeRepository + ?Sized,
    {
        let mut hierarchy = Vec::new();
        let mut properties: IndexMap<&'a str, Declared<'a, PropertyDefinition>> = IndexMap::new();
        let mut associations: IndexMap<&'a str, Declared<'a, AssociationDefinition>> =
            IndexMap::new();

        let summary = type_walker(repo).walk(product_type, |node| {
            hierarchy.push(node);
            for definition in node.property_definitions() {
                properties
                    .entry(definition.name.as_str())
                    .or_insert(Declared {
                        definition,
                        owner: node.name(),
                    });
            }
            for definition in node.association_definitions() {
                associations
                    .entry(definition.role.as_str())
                    .or_insert(Declared {
                        definition,
                        owner: node.name(),
                    });
            }
            Visit::Continue
        });

        tracing::debug!(
            product_type = %product_type.name(),
            depth = summary.visited,
            properties = properties.len(),
            associations = associations.len(),
            "flattened type hierarchy"
        );

        Self {
            product_type,
            hierarchy,
            properties,
            associations,
            termination: summary.termination,
        }
    }

    /// The flattened type
    #[inline]
    #[must_use]
    pub fn product_type(&self) -> &'a ProductType {
        self.product_type
    }

    /// Types visited, subtype first
    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &[&'a ProductType] {
        &self.hierarchy
    }

    /// Why the hierarchy walk ended
    #[inline]
    #[must_use]
    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    /// Visible property definitions in flattened order
    pub fn properties(&self) -> impl Iterator<Item = &'a PropertyDefinition> + '_ {
        self.properties.values().map(|d| d.definition)
    }

    /// Visible property definitions with their declaring type
    pub fn declared_properties(
        &self,
    ) -> impl Iterator<Item = Declared<'a, PropertyDefinition>> + '_ {
        self.properties.values().copied()
    }

    /// Visible property definition by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&'a PropertyDefinition> {
        self.properties.get(name).map(|d| d.definition)
    }

    /// Type declaring the visible property `name`
    #[must_use]
    pub fn property_owner(&self, name: &str) -> Option<&'a QualifiedName> {
        self.properties.get(name).map(|d| d.owner)
    }

    /// Visible association definitions in flattened order
    pub fn associations(&self) -> impl Iterator<Item = &'a AssociationDefinition> + '_ {
        self.associations.values().map(|d| d.definition)
    }

    /// Visible association definition by role
    #[must_use]
    pub fn association(&self, role: &str) -> Option<&'a AssociationDefinition> {
        self.associations.get(role).map(|d| d.definition)
    }

    /// Number of visible properties
    #[inline]
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Number of visible associations
    #[inline]
    #[must_use]
    pub fn association_count(&self) -> usize {
        self.associations.len()
    }
}
