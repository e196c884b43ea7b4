//! Read-only model contracts and the in-memory model arena
//!
//! The reconciliation core only reads types and schemas through
//! [`TypeRepository`] and configurations through [`ConfigurationRepository`].
//! [`ProductModel`] is the arena implementation used by tests and the CLI;
//! hosts with their own model plug in by implementing the traits.

use crate::configuration::ProductConfiguration;
use crate::error::ModelError;
use crate::name::QualifiedName;
use crate::product_type::{ProductType, Schema};
use indexmap::IndexMap;

/// Lookup of product types and schemas by name
pub trait TypeRepository {
    /// Product type by name
    fn find_type(&self, name: &QualifiedName) -> Option<&ProductType>;

    /// Schema by name
    fn find_schema(&self, name: &QualifiedName) -> Option<&Schema>;

    /// Resolve the declared supertype of `ty`
    ///
    /// `None` both for root types and for dangling supertype references.
    fn resolve_supertype(&self, ty: &ProductType) -> Option<&ProductType> {
        ty.supertype().and_then(|name| self.find_type(name))
    }

    /// Resolve the schema configured by `ty`
    fn resolve_configured_schema(&self, ty: &ProductType) -> Option<&Schema> {
        ty.configured_schema().and_then(|name| self.find_schema(name))
    }
}

/// Lookup of product configurations by identifier
pub trait ConfigurationRepository {
    /// Configuration by identifier
    fn find_configuration(&self, id: &QualifiedName) -> Option<&ProductConfiguration>;
}

/// In-memory arena of schemas, types and configurations
///
/// Iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct ProductModel {
    schemas: IndexMap<QualifiedName, Schema>,
    types: IndexMap<QualifiedName, ProductType>,
    configurations: IndexMap<QualifiedName, ProductConfiguration>,
}

impl ProductModel {
    /// Create empty model
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema
    ///
    /// # Errors
    /// Returns error if a schema of that name exists
    pub fn insert_schema(&mut self, schema: Schema) -> Result<(), ModelError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(ModelError::DuplicateName {
                element: "schema",
                name: schema.name().clone(),
            });
        }
        self.schemas.insert(schema.name().clone(), schema);
        Ok(())
    }

    /// Register a product type
    ///
    /// # Errors
    /// Returns error if a type of that name exists or the type breaks its
    /// uniqueness invariants
    pub fn insert_type(&mut self, ty: ProductType) -> Result<(), ModelError> {
        ty.check_invariants()?;
        if self.types.contains_key(ty.name()) {
            return Err(ModelError::DuplicateName {
                element: "product type",
                name: ty.name().clone(),
            });
        }
        self.types.insert(ty.name().clone(), ty);
        Ok(())
    }

    /// Register a product configuration
    ///
    /// # Errors
    /// Returns error if a configuration with that id exists or it holds two
    /// values for one property
    pub fn insert_configuration(
        &mut self,
        configuration: ProductConfiguration,
    ) -> Result<(), ModelError> {
        configuration.check_invariants()?;
        if self.configurations.contains_key(configuration.id()) {
            return Err(ModelError::DuplicateName {
                element: "configuration",
                name: configuration.id().clone(),
            });
        }
        self.configurations
            .insert(configuration.id().clone(), configuration);
        Ok(())
    }

    /// All schemas
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// All product types
    pub fn types(&self) -> impl Iterator<Item = &ProductType> {
        self.types.values()
    }

    /// All configurations
    pub fn configurations(&self) -> impl Iterator<Item = &ProductConfiguration> {
        self.configurations.values()
    }

    /// Mutable product type (schema evolution)
    pub fn type_mut(&mut self, name: &QualifiedName) -> Option<&mut ProductType> {
        self.types.get_mut(name)
    }

    /// Mutable configuration (fix application, external editing)
    pub fn configuration_mut(&mut self, id: &QualifiedName) -> Option<&mut ProductConfiguration> {
        self.configurations.get_mut(id)
    }

    /// Number of configurations
    #[inline]
    #[must_use]
    pub fn configuration_count(&self) -> usize {
        self.configurations.len()
    }
}

impl TypeRepository for ProductModel {
    fn find_type(&self, name: &QualifiedName) -> Option<&ProductType> {
        self.types.get(name)
    }

    fn find_schema(&self, name: &QualifiedName) -> Option<&Schema> {
        self.schemas.get(name)
    }
}

impl ConfigurationRepository for ProductModel {
    fn find_configuration(&self, id: &QualifiedName) -> Option<&ProductConfiguration> {
        self.configurations.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{PropertyKind, PropertyValue};
    use crate::Payload;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn model_resolves_supertype() {
        let mut model = ProductModel::new();
        model.insert_type(ProductType::new(name("Base"))).unwrap();
        model
            .insert_type(ProductType::new(name("Sub")).with_supertype(name("Base")))
            .unwrap();
        model
            .insert_type(ProductType::new(name("Dangling")).with_supertype(name("Missing")))
            .unwrap();

        let sub = model.find_type(&name("Sub")).unwrap();
        assert_eq!(model.resolve_supertype(sub).unwrap().name(), &name("Base"));

        let dangling = model.find_type(&name("Dangling")).unwrap();
        assert!(model.resolve_supertype(dangling).is_none());
    }

    #[test]
    fn model_rejects_duplicates() {
        let mut model = ProductModel::new();
        model.insert_type(ProductType::new(name("Base"))).unwrap();
        let result = model.insert_type(ProductType::new(name("Base")));
        assert!(matches!(result, Err(ModelError::DuplicateName { .. })));
    }

    #[test]
    fn model_rejects_configuration_breaking_invariant() {
        let json = r#"{
            "id": "Policy2024",
            "product_type": "Policy",
            "values": [
                {"name": "premium", "kind": "VALUE", "datatype": "Decimal"},
                {"name": "premium", "kind": "VALUE", "datatype": "Decimal"}
            ]
        }"#;
        let config: ProductConfiguration = serde_json::from_str(json).unwrap();
        let mut model = ProductModel::new();
        assert!(model.insert_configuration(config).is_err());
    }

    #[test]
    fn model_configuration_mut() {
        let mut model = ProductModel::new();
        model
            .insert_configuration(ProductConfiguration::new(name("Policy2024"), name("Policy")))
            .unwrap();
        model
            .configuration_mut(&name("Policy2024"))
            .unwrap()
            .add_property_value(PropertyValue::new(
                "premium",
                PropertyKind::Value,
                "Decimal",
                Payload::Empty,
            ))
            .unwrap();
        let config = model.find_configuration(&name("Policy2024")).unwrap();
        assert_eq!(config.property_values().len(), 1);
        assert_eq!(model.configuration_count(), 1);
    }
}
