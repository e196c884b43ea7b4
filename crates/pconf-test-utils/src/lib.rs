//! Testing utilities for pconf workspace
//!
//! Shared test helpers, fixtures, and builders.

#![allow(missing_docs)]

use chrono::NaiveDate;
use pconf_model::{
    AssociationDefinition, Link, Payload, ProductConfiguration, ProductModel, ProductType,
    PropertyDefinition, PropertyKind, PropertyValue, QualifiedName, Schema, ValueSet,
};

/// Parse a qualified name, panicking on malformed test input
pub fn qn(name: &str) -> QualifiedName {
    QualifiedName::parse(name).unwrap()
}

#[derive(Debug, Clone)]
pub struct TypeBuilder {
    ty: ProductType,
}

impl TypeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            ty: ProductType::new(qn(name)),
        }
    }

    pub fn supertype(mut self, name: &str) -> Self {
        self.ty = self.ty.with_supertype(qn(name));
        self
    }

    pub fn configuring(mut self, schema: &str) -> Self {
        self.ty = self.ty.configuring(qn(schema));
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.ty = self.ty.abstract_type();
        self
    }

    pub fn property(mut self, definition: PropertyDefinition) -> Self {
        self.ty.add_property(definition).unwrap();
        self
    }

    pub fn value(self, name: &str, datatype: &str) -> Self {
        self.property(PropertyDefinition::value(name, datatype))
    }

    pub fn association(mut self, role: &str, target: &str) -> Self {
        self.ty
            .add_association(AssociationDefinition::new(role, qn(target)))
            .unwrap();
        self
    }

    pub fn association_def(mut self, association: AssociationDefinition) -> Self {
        self.ty.add_association(association).unwrap();
        self
    }

    pub fn build(self) -> ProductType {
        self.ty
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    config: ProductConfiguration,
}

impl ConfigurationBuilder {
    pub fn new(id: &str, product_type: &str) -> Self {
        Self {
            config: ProductConfiguration::new(qn(id), qn(product_type)),
        }
    }

    pub fn valid_from(mut self, year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        self.config = self.config.with_valid_from(date);
        self
    }

    pub fn value(mut self, value: PropertyValue) -> Self {
        self.config.add_property_value(value).unwrap();
        self
    }

    pub fn literal(self, name: &str, datatype: &str, text: &str) -> Self {
        self.value(PropertyValue::new(
            name,
            PropertyKind::Value,
            datatype,
            Payload::Literal(text.to_string()),
        ))
    }

    pub fn link(mut self, role: &str, target: &str) -> Self {
        self.config.add_link(Link::new(role, qn(target)));
        self
    }

    pub fn build(self) -> ProductConfiguration {
        self.config
    }
}

/// `Policy` with `premium:VALUE:Decimal` and `riskClass:VALUE:Enum`, and
/// `Policy2024` holding only `premium`
pub fn policy_model() -> ProductModel {
    let mut model = ProductModel::new();
    model
        .insert_type(
            TypeBuilder::new("Policy")
                .value("premium", "Decimal")
                .property(
                    PropertyDefinition::value("riskClass", "Enum")
                        .with_value_set(ValueSet::enumeration(["A", "B", "C"])),
                )
                .build(),
        )
        .unwrap();
    model
        .insert_configuration(
            ConfigurationBuilder::new("Policy2024", "Policy")
                .valid_from(2024, 1, 1)
                .literal("premium", "Decimal", "120.50")
                .build(),
        )
        .unwrap();
    model
}

/// Types named in `chain`, each declaring the next one as its supertype;
/// `close` makes the last one point back to the first
pub fn supertype_chain(chain: &[&str], close: bool) -> ProductModel {
    let mut model = ProductModel::new();
    for (i, name) in chain.iter().enumerate() {
        let mut builder = TypeBuilder::new(name);
        if let Some(next) = chain.get(i + 1) {
            builder = builder.supertype(next);
        } else if close {
            builder = builder.supertype(chain[0]);
        }
        model.insert_type(builder.build()).unwrap();
    }
    model
}

/// One `Node` type and configurations linked by `(from, role, to)` edges
pub fn linked_configurations(ids: &[&str], edges: &[(&str, &str, &str)]) -> ProductModel {
    let mut model = ProductModel::new();
    let mut node = TypeBuilder::new("Node");
    let mut roles: Vec<&str> = edges.iter().map(|(_, role, _)| *role).collect();
    roles.sort_unstable();
    roles.dedup();
    for role in roles {
        node = node.association(role, "Node");
    }
    model.insert_type(node.build()).unwrap();

    for id in ids {
        let mut builder = ConfigurationBuilder::new(id, "Node");
        for (_, role, to) in edges.iter().filter(|(from, _, _)| from == id) {
            builder = builder.link(role, to);
        }
        model.insert_configuration(builder.build()).unwrap();
    }
    model
}

/// Schema hierarchy `PolicyCmpt <- MotorPolicyCmpt` plus an unrelated root
pub fn schemas() -> Vec<Schema> {
    vec![
        Schema::new(qn("PolicyCmpt")),
        Schema::new(qn("MotorPolicyCmpt")).with_superschema(qn("PolicyCmpt")),
        Schema::new(qn("Unrelated")),
    ]
}
