//! Product types and the schemas they configure
//!
//! Both form single-inheritance hierarchies; [`HierarchyNode`] is the common
//! view the hierarchy walker needs.

use crate::association::AssociationDefinition;
use crate::error::ModelError;
use crate::name::QualifiedName;
use crate::property::PropertyDefinition;
use serde::{Deserialize, Serialize};

/// Node of a single-inheritance hierarchy
///
/// The parent is referenced by name and resolved lazily by whoever walks the
/// hierarchy, so a node may name a parent that does not exist (or that
/// eventually names the node itself).
pub trait HierarchyNode {
    /// Identity of this node
    fn node_name(&self) -> &QualifiedName;

    /// Name of the direct parent, if one is declared
    fn parent_name(&self) -> Option<&QualifiedName>;
}

/// Schema node configured by product types (the policy side)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: QualifiedName,
    #[serde(default)]
    superschema: Option<QualifiedName>,
}

impl Schema {
    /// Create root schema
    #[must_use]
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            superschema: None,
        }
    }

    /// With superschema
    #[must_use]
    pub fn with_superschema(mut self, superschema: QualifiedName) -> Self {
        self.superschema = Some(superschema);
        self
    }

    /// Qualified name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Declared superschema
    #[inline]
    #[must_use]
    pub fn superschema(&self) -> Option<&QualifiedName> {
        self.superschema.as_ref()
    }
}

impl HierarchyNode for Schema {
    fn node_name(&self) -> &QualifiedName {
        &self.name
    }

    fn parent_name(&self) -> Option<&QualifiedName> {
        self.superschema.as_ref()
    }
}

/// Product type, the schema of product configurations
///
/// # Invariants
/// - property names are unique within this node
/// - association role names are unique within this node
///
/// Same-named declarations in a supertype are legal; they are shadowed when
/// the hierarchy is flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    name: QualifiedName,
    #[serde(default)]
    supertype: Option<QualifiedName>,
    #[serde(default)]
    configured_schema: Option<QualifiedName>,
    #[serde(default)]
    is_abstract: bool,
    #[serde(default)]
    properties: Vec<PropertyDefinition>,
    #[serde(default)]
    associations: Vec<AssociationDefinition>,
}

impl ProductType {
    /// Create type without supertype, schema or declarations
    #[must_use]
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            supertype: None,
            configured_schema: None,
            is_abstract: false,
            properties: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// With supertype reference
    #[must_use]
    pub fn with_supertype(mut self, supertype: QualifiedName) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// With configured schema
    #[must_use]
    pub fn configuring(mut self, schema: QualifiedName) -> Self {
        self.configured_schema = Some(schema);
        self
    }

    /// Mark abstract
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Qualified name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Declared supertype (unresolved)
    #[inline]
    #[must_use]
    pub fn supertype(&self) -> Option<&QualifiedName> {
        self.supertype.as_ref()
    }

    /// Replace supertype reference
    pub fn set_supertype(&mut self, supertype: Option<QualifiedName>) {
        self.supertype = supertype;
    }

    /// Schema configured by this type (unresolved)
    #[inline]
    #[must_use]
    pub fn configured_schema(&self) -> Option<&QualifiedName> {
        self.configured_schema.as_ref()
    }

    /// Whether configurations may not instantiate this type directly
    #[inline]
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Direct (non-inherited) property definitions in declaration order
    #[inline]
    #[must_use]
    pub fn property_definitions(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    /// Direct (non-inherited) association definitions in declaration order
    #[inline]
    #[must_use]
    pub fn association_definitions(&self) -> &[AssociationDefinition] {
        &self.associations
    }

    /// Direct property definition by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Direct association definition by role
    #[must_use]
    pub fn association(&self, role: &str) -> Option<&AssociationDefinition> {
        self.associations.iter().find(|a| a.role == role)
    }

    /// Declare a property
    ///
    /// # Errors
    /// Returns error if this node already declares a property of that name
    pub fn add_property(&mut self, definition: PropertyDefinition) -> Result<(), ModelError> {
        if self.property(&definition.name).is_some() {
            return Err(ModelError::DuplicateProperty {
                owner: self.name.clone(),
                name: definition.name,
            });
        }
        self.properties.push(definition);
        Ok(())
    }

    /// Remove a property declaration
    pub fn remove_property(&mut self, name: &str) -> Option<PropertyDefinition> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index))
    }

    /// Declare an association
    ///
    /// # Errors
    /// Returns error if this node already declares an association with that role
    pub fn add_association(&mut self, association: AssociationDefinition) -> Result<(), ModelError> {
        if self.association(&association.role).is_some() {
            return Err(ModelError::DuplicateAssociation {
                owner: self.name.clone(),
                role: association.role,
            });
        }
        self.associations.push(association);
        Ok(())
    }

    /// Remove an association declaration
    pub fn remove_association(&mut self, role: &str) -> Option<AssociationDefinition> {
        let index = self.associations.iter().position(|a| a.role == role)?;
        Some(self.associations.remove(index))
    }

    /// Re-check uniqueness invariants (e.g. after deserialization)
    ///
    /// # Errors
    /// Returns the first duplicate property or role found
    pub fn check_invariants(&self) -> Result<(), ModelError> {
        for (i, property) in self.properties.iter().enumerate() {
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(ModelError::DuplicateProperty {
                    owner: self.name.clone(),
                    name: property.name.clone(),
                });
            }
        }
        for (i, association) in self.associations.iter().enumerate() {
            if self.associations[..i].iter().any(|a| a.role == association.role) {
                return Err(ModelError::DuplicateAssociation {
                    owner: self.name.clone(),
                    role: association.role.clone(),
                });
            }
        }
        Ok(())
    }
}

impl HierarchyNode for ProductType {
    fn node_name(&self) -> &QualifiedName {
        &self.name
    }

    fn parent_name(&self) -> Option<&QualifiedName> {
        self.supertype.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn type_rejects_duplicate_property() {
        let mut ty = ProductType::new(name("Policy"));
        ty.add_property(PropertyDefinition::value("premium", "Decimal"))
            .unwrap();
        let result = ty.add_property(PropertyDefinition::value("premium", "Integer"));
        assert!(matches!(result, Err(ModelError::DuplicateProperty { .. })));
        assert_eq!(ty.property_definitions().len(), 1);
    }

    #[test]
    fn type_rejects_duplicate_role() {
        let mut ty = ProductType::new(name("Policy"));
        ty.add_association(AssociationDefinition::new("coverage", name("Coverage")))
            .unwrap();
        let result = ty.add_association(AssociationDefinition::new("coverage", name("Other")));
        assert!(matches!(result, Err(ModelError::DuplicateAssociation { .. })));
    }

    #[test]
    fn type_check_invariants_after_deserialize() {
        let json = r#"{
            "name": "Policy",
            "properties": [
                {"name": "p", "kind": "VALUE", "datatype": "Decimal"},
                {"name": "p", "kind": "VALUE", "datatype": "Integer"}
            ]
        }"#;
        let ty: ProductType = serde_json::from_str(json).unwrap();
        assert!(ty.check_invariants().is_err());
    }

    #[test]
    fn hierarchy_node_views() {
        let ty = ProductType::new(name("Sub")).with_supertype(name("Base"));
        assert_eq!(ty.node_name(), &name("Sub"));
        assert_eq!(ty.parent_name(), Some(&name("Base")));

        let schema = Schema::new(name("PolicyCmpt"));
        assert!(schema.parent_name().is_none());
    }
}
