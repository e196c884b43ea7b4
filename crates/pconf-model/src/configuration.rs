//! Product configurations (generations)
//!
//! A [`ProductConfiguration`] exclusively owns its property values and links.
//! The mutation hooks here are the only way reconciliation changes a
//! configuration, and every hook is idempotent where that is meaningful.

use crate::association::Link;
use crate::error::ModelError;
use crate::name::QualifiedName;
use crate::property::{Payload, PropertyValue, ValueSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dated instance of a product type
///
/// # Invariants
/// - at most one property value per property name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    id: QualifiedName,
    product_type: QualifiedName,
    #[serde(default)]
    valid_from: Option<NaiveDate>,
    #[serde(default)]
    values: Vec<PropertyValue>,
    #[serde(default)]
    links: Vec<Link>,
}

impl ProductConfiguration {
    /// Create empty configuration of `product_type`
    #[must_use]
    pub fn new(id: QualifiedName, product_type: QualifiedName) -> Self {
        Self {
            id,
            product_type,
            valid_from: None,
            values: Vec::new(),
            links: Vec::new(),
        }
    }

    /// With generation date
    #[must_use]
    pub fn with_valid_from(mut self, valid_from: NaiveDate) -> Self {
        self.valid_from = Some(valid_from);
        self
    }

    /// Configuration identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &QualifiedName {
        &self.id
    }

    /// Name of the product type this configuration instantiates
    #[inline]
    #[must_use]
    pub fn product_type(&self) -> &QualifiedName {
        &self.product_type
    }

    /// Generation date
    #[inline]
    #[must_use]
    pub fn valid_from(&self) -> Option<NaiveDate> {
        self.valid_from
    }

    /// Stored property values in insertion order
    #[inline]
    #[must_use]
    pub fn property_values(&self) -> &[PropertyValue] {
        &self.values
    }

    /// Outbound links in insertion order
    #[inline]
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Property value by name
    #[must_use]
    pub fn property_value(&self, name: &str) -> Option<&PropertyValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Links instantiating `role`
    pub fn links_for_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.role == role)
    }

    /// Add a property value
    ///
    /// # Errors
    /// Returns error if a value with that name already exists
    pub fn add_property_value(&mut self, value: PropertyValue) -> Result<(), ModelError> {
        if self.property_value(&value.name).is_some() {
            return Err(ModelError::DuplicatePropertyValue {
                configuration: self.id.clone(),
                name: value.name,
            });
        }
        self.values.push(value);
        Ok(())
    }

    /// Remove a property value; removing an absent value is a no-op
    pub fn remove_property_value(&mut self, name: &str) -> Option<PropertyValue> {
        let index = self.values.iter().position(|v| v.name == name)?;
        Some(self.values.remove(index))
    }

    /// Replace the stored value of the same name, keeping its position
    ///
    /// Returns the previous value.
    ///
    /// # Errors
    /// Returns error if no value of that name exists
    pub fn replace_property_value(
        &mut self,
        value: PropertyValue,
    ) -> Result<PropertyValue, ModelError> {
        let slot = self.value_slot(&value.name)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Replace only the payload of a value
    ///
    /// Hook for external editors that keep kind, datatype and value set.
    /// Reconciliation replaces the whole value instead, since a reset also
    /// changes those.
    ///
    /// # Errors
    /// Returns error if no value of that name exists
    pub fn replace_property_value_payload(
        &mut self,
        name: &str,
        payload: Payload,
    ) -> Result<Payload, ModelError> {
        let slot = self.value_slot(name)?;
        Ok(std::mem::replace(&mut slot.payload, payload))
    }

    /// Replace only the value set of a value
    ///
    /// # Errors
    /// Returns error if no value of that name exists
    pub fn set_value_set(&mut self, name: &str, value_set: ValueSet) -> Result<ValueSet, ModelError> {
        let slot = self.value_slot(name)?;
        Ok(std::mem::replace(&mut slot.value_set, value_set))
    }

    /// Add a link
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Remove the first link with `role` pointing to `target`
    pub fn remove_link(&mut self, role: &str, target: &QualifiedName) -> Option<Link> {
        let index = self
            .links
            .iter()
            .position(|l| l.role == role && &l.target == target)?;
        Some(self.links.remove(index))
    }

    /// Re-check the one-value-per-name invariant (e.g. after deserialization)
    ///
    /// # Errors
    /// Returns the first duplicate found
    pub fn check_invariants(&self) -> Result<(), ModelError> {
        for (i, value) in self.values.iter().enumerate() {
            if self.values[..i].iter().any(|v| v.name == value.name) {
                return Err(ModelError::DuplicatePropertyValue {
                    configuration: self.id.clone(),
                    name: value.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn value_slot(&mut self, name: &str) -> Result<&mut PropertyValue, ModelError> {
        let id = &self.id;
        self.values
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| ModelError::PropertyValueNotFound {
                configuration: id.clone(),
                name: name.to_string(),
            })
    }
}
