//! Delta computation
//!
//! Read-only: computing a delta never touches the model.

use crate::delta::Delta;
use crate::entry::DeltaEntry;
use crate::error::DeltaError;
use pconf_graph::FlattenedType;
use pconf_model::{ProductConfiguration, PropertyKind, TypeRepository};

/// Diffs configurations against their flattened product types
#[derive(Debug)]
pub struct DeltaComputer<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R> DeltaComputer<'a, R>
where
    R: TypeRepository + ?Sized,
{
    /// Create computer over the types of `repo`
    #[inline]
    #[must_use]
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Compute the mismatches of `configuration`
    ///
    /// Entry order: missing values (definition order), orphan values (value
    /// order), type mismatches, value set mismatches (definition order), then
    /// orphan links (link order).
    ///
    /// # Errors
    /// Returns error only if the configuration's product type is unknown
    pub fn compute_delta(&self, configuration: &ProductConfiguration) -> Result<Delta, DeltaError> {
        let product_type = self
            .repo
            .find_type(configuration.product_type())
            .ok_or_else(|| DeltaError::InvalidModel {
                configuration: configuration.id().clone(),
                product_type: configuration.product_type().clone(),
            })?;
        let flattened = FlattenedType::collect(self.repo, product_type);

        let mut missing = Vec::new();
        let mut type_mismatches = Vec::new();
        let mut value_set_mismatches = Vec::new();

        for definition in flattened.properties() {
            let Some(value) = configuration.property_value(&definition.name) else {
                missing.push(DeltaEntry::MissingPropertyValue {
                    definition: definition.clone(),
                });
                continue;
            };

            if !definition.agrees_with(value) {
                type_mismatches.push(DeltaEntry::PropertyTypeMismatch {
                    definition: definition.clone(),
                    value: value.clone(),
                });
            } else if definition.kind == PropertyKind::Value
                && !value.value_set.is_compatible_with(&definition.value_set)
            {
                value_set_mismatches.push(DeltaEntry::ValueSetMismatch {
                    definition: definition.clone(),
                    value: value.clone(),
                });
            }
        }

        let orphans = configuration
            .property_values()
            .iter()
            .filter(|value| flattened.property(&value.name).is_none())
            .map(|value| DeltaEntry::ValueWithoutProperty {
                value: value.clone(),
            });

        let orphan_links = configuration
            .links()
            .iter()
            .filter(|link| flattened.association(&link.role).is_none())
            .map(|link| DeltaEntry::LinkWithoutAssociation { link: link.clone() });

        let mut entries = missing;
        entries.extend(orphans);
        entries.append(&mut type_mismatches);
        entries.append(&mut value_set_mismatches);
        entries.extend(orphan_links);

        tracing::debug!(
            configuration = %configuration.id(),
            product_type = %product_type.name(),
            hierarchy = flattened.hierarchy().len(),
            entries = entries.len(),
            "delta computed"
        );

        Ok(Delta::new(
            configuration.id().clone(),
            product_type.name().clone(),
            entries,
        ))
    }
}
