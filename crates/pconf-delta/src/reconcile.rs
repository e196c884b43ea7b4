//! Compute and fix in one call

use crate::computer::DeltaComputer;
use crate::config::FixContext;
use crate::delta::Delta;
use crate::error::{DeltaError, ReconcileError};
use pconf_model::{ConfigurationRepository, ProductModel, QualifiedName};

/// Bring configuration `id` up to date with its product type
///
/// Returns the delta that was applied; an empty delta means nothing changed.
///
/// # Errors
/// Returns error if the configuration or its type is unknown, or a fix fails.
/// On a failing fix the configuration is left partially fixed.
pub fn reconcile(
    model: &mut ProductModel,
    id: &QualifiedName,
    context: &FixContext<'_>,
) -> Result<Delta, ReconcileError> {
    let configuration = model
        .find_configuration(id)
        .ok_or_else(|| DeltaError::UnknownConfiguration(id.clone()))?;
    let delta = DeltaComputer::new(&*model).compute_delta(configuration)?;

    if !delta.is_empty() {
        let configuration = model
            .configuration_mut(id)
            .ok_or_else(|| DeltaError::UnknownConfiguration(id.clone()))?;
        delta.fix(configuration, context)?;
    }
    Ok(delta)
}
