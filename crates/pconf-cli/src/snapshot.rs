//! Model snapshots on disk
//!
//! A snapshot lists `schemas`, `types` and `configurations`. Files ending in
//! `.yaml`/`.yml` are YAML, everything else JSON.

use anyhow::{Context, Result};
use pconf_model::{ProductConfiguration, ProductModel, ProductType, Schema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized form of a [`ProductModel`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSnapshot {
    /// Schemas in model order
    pub schemas: Vec<Schema>,
    /// Product types in model order
    pub types: Vec<ProductType>,
    /// Configurations in model order
    pub configurations: Vec<ProductConfiguration>,
}

impl ModelSnapshot {
    /// Capture `model`
    #[must_use]
    pub fn from_model(model: &ProductModel) -> Self {
        Self {
            schemas: model.schemas().cloned().collect(),
            types: model.types().cloned().collect(),
            configurations: model.configurations().cloned().collect(),
        }
    }

    /// Build the model, checking names are unique
    ///
    /// # Errors
    /// Returns error on duplicate elements or broken invariants
    pub fn into_model(self) -> Result<ProductModel> {
        let mut model = ProductModel::new();
        for schema in self.schemas {
            model.insert_schema(schema)?;
        }
        for ty in self.types {
            model.insert_type(ty)?;
        }
        for configuration in self.configurations {
            model.insert_configuration(configuration)?;
        }
        Ok(model)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Read a snapshot file into a model
///
/// # Errors
/// Returns error if the file cannot be read or parsed, or the model is
/// inconsistent
pub fn load_model(path: &Path) -> Result<ProductModel> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read model {}", path.display()))?;
    let snapshot: ModelSnapshot = if is_yaml(path) {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse YAML model {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON model {}", path.display()))?
    };
    let model = snapshot
        .into_model()
        .with_context(|| format!("inconsistent model {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        types = model.types().count(),
        configurations = model.configuration_count(),
        "model loaded"
    );
    Ok(model)
}

/// Write `model` as a snapshot file
///
/// # Errors
/// Returns error if serialization or writing fails
pub fn save_model(path: &Path, model: &ProductModel) -> Result<()> {
    let snapshot = ModelSnapshot::from_model(model);
    let text = if is_yaml(path) {
        serde_yaml::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    fs::write(path, text).with_context(|| format!("failed to write model {}", path.display()))?;
    Ok(())
}
