//! Delta entries: one mismatch each, each with its own fix
//!
//! Entries own copies of the definitions and values they were computed from,
//! so a [`Delta`](crate::Delta) stays valid while its configuration is being
//! mutated by the fix.
//!
//! # Idempotence
//! Every fix first checks whether its mismatch is still present and does
//! nothing otherwise. Applying a delta twice is the same as applying it once.

use crate::config::FixContext;
use crate::error::FixFailure;
use pconf_model::{Link, ProductConfiguration, PropertyDefinition, PropertyValue};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Kind tag of a delta entry
///
/// Declaration order is the order entries appear in a computed delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    /// Definition without a stored value
    MissingPropertyValue,
    /// Stored value without a definition
    ValueWithoutProperty,
    /// Value whose kind or datatype disagrees with its definition
    PropertyTypeMismatch,
    /// Value whose value set does not fit the declared one
    ValueSetMismatch,
    /// Link whose role has no association
    LinkWithoutAssociation,
}

impl DeltaKind {
    /// All kinds in delta order
    pub const ALL: [Self; 5] = [
        Self::MissingPropertyValue,
        Self::ValueWithoutProperty,
        Self::PropertyTypeMismatch,
        Self::ValueSetMismatch,
        Self::LinkWithoutAssociation,
    ];

    /// Stable tag
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingPropertyValue => "missing_property_value",
            Self::ValueWithoutProperty => "value_without_property",
            Self::PropertyTypeMismatch => "property_type_mismatch",
            Self::ValueSetMismatch => "value_set_mismatch",
            Self::LinkWithoutAssociation => "link_without_association",
        }
    }
}

impl Display for DeltaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural mismatch between a configuration and its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeltaEntry {
    /// The type declares `definition`, the configuration stores no value
    MissingPropertyValue { definition: PropertyDefinition },

    /// The configuration stores `value`, no visible definition matches
    ValueWithoutProperty { value: PropertyValue },

    /// Kind or datatype of `value` disagree with `definition`
    PropertyTypeMismatch {
        definition: PropertyDefinition,
        value: PropertyValue,
    },

    /// Value set of `value` does not fit the one `definition` declares
    ValueSetMismatch {
        definition: PropertyDefinition,
        value: PropertyValue,
    },

    /// No visible association has the role of `link`
    LinkWithoutAssociation { link: Link },
}

impl DeltaEntry {
    /// Kind tag
    #[must_use]
    pub fn kind(&self) -> DeltaKind {
        match self {
            Self::MissingPropertyValue { .. } => DeltaKind::MissingPropertyValue,
            Self::ValueWithoutProperty { .. } => DeltaKind::ValueWithoutProperty,
            Self::PropertyTypeMismatch { .. } => DeltaKind::PropertyTypeMismatch,
            Self::ValueSetMismatch { .. } => DeltaKind::ValueSetMismatch,
            Self::LinkWithoutAssociation { .. } => DeltaKind::LinkWithoutAssociation,
        }
    }

    /// Definition the entry refers to, if any
    #[must_use]
    pub fn definition(&self) -> Option<&PropertyDefinition> {
        match self {
            Self::MissingPropertyValue { definition }
            | Self::PropertyTypeMismatch { definition, .. }
            | Self::ValueSetMismatch { definition, .. } => Some(definition),
            Self::ValueWithoutProperty { .. } | Self::LinkWithoutAssociation { .. } => None,
        }
    }

    /// Human readable description
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MissingPropertyValue { definition } => format!(
                "missing value for property '{}' ({}:{})",
                definition.name, definition.kind, definition.datatype
            ),
            Self::ValueWithoutProperty { value } => {
                format!("value '{}' has no matching property definition", value.name)
            }
            Self::PropertyTypeMismatch { definition, value } => format!(
                "value '{}' is {}:{} but the property is {}:{}",
                value.name, value.kind, value.datatype, definition.kind, definition.datatype
            ),
            Self::ValueSetMismatch { definition, value } => format!(
                "value set {} of '{}' does not fit the declared {} value set {}",
                value.value_set,
                value.name,
                definition.value_set.shape(),
                definition.value_set
            ),
            Self::LinkWithoutAssociation { link } => format!(
                "link '{}' -> {} has no matching association",
                link.role, link.target
            ),
        }
    }

    /// Repair this mismatch on `configuration`
    ///
    /// Does nothing if the mismatch is no longer present.
    ///
    /// # Errors
    /// Returns error if the default value provider fails
    pub fn fix(
        &self,
        configuration: &mut ProductConfiguration,
        context: &FixContext<'_>,
    ) -> Result<(), FixFailure> {
        match self {
            Self::MissingPropertyValue { definition } => {
                if configuration.property_value(&definition.name).is_some() {
                    return Ok(());
                }
                let payload = context.provider.default_payload(definition)?;
                configuration.add_property_value(PropertyValue::for_definition(definition, payload))?;
            }

            Self::ValueWithoutProperty { value } => {
                configuration.remove_property_value(&value.name);
            }

            Self::PropertyTypeMismatch { definition, .. } => {
                let agrees = configuration
                    .property_value(&definition.name)
                    .is_some_and(|current| definition.agrees_with(current));
                if !agrees {
                    reset_value(configuration, definition, context)?;
                }
            }

            Self::ValueSetMismatch { definition, .. } => {
                let Some(current) = configuration.property_value(&definition.name) else {
                    return Ok(());
                };
                if current.value_set.is_compatible_with(&definition.value_set) {
                    return Ok(());
                }
                let salvaged = if context.salvage_value_sets {
                    current.value_set.fit_to(&definition.value_set)
                } else {
                    None
                };
                match salvaged {
                    Some(value_set) => {
                        configuration.set_value_set(&definition.name, value_set)?;
                    }
                    None => reset_value(configuration, definition, context)?,
                }
            }

            Self::LinkWithoutAssociation { link } => {
                configuration.remove_link(&link.role, &link.target);
            }
        }
        Ok(())
    }
}

/// Replace (or create) the value of `definition` with a defaulted one
fn reset_value(
    configuration: &mut ProductConfiguration,
    definition: &PropertyDefinition,
    context: &FixContext<'_>,
) -> Result<(), FixFailure> {
    let payload = context.provider.default_payload(definition)?;
    let value = PropertyValue::for_definition(definition, payload);
    if configuration.property_value(&definition.name).is_some() {
        configuration.replace_property_value(value)?;
    } else {
        configuration.add_property_value(value)?;
    }
    Ok(())
}

impl Display for DeltaEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.description())
    }
}
