//! Subcommand implementations
//!
//! Each command prints its report to `out` and returns the process exit
//! code: 0 when the model is clean, non-zero when something was found.

use crate::snapshot::save_model;
use anyhow::{Context, Result};
use pconf_delta::{Delta, DeltaComputer, FixContext, ReconcileConfig, StandardDefaults};
use pconf_graph::{
    find_hierarchy_cycles, find_link_cycles, AssociationCycleDetector, CyclePath, LinkCycle,
};
use pconf_model::{ConfigurationRepository, ProductModel, QualifiedName};
use pconf_validation::validate_model;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

/// Differences found and left in place
pub const EXIT_DIFFERENCES: u8 = 2;
/// Validation errors or cycles found
pub const EXIT_FINDINGS: u8 = 1;

/// Options of `pconf delta`
#[derive(Debug, Clone, Default)]
pub struct DeltaOptions<'a> {
    /// Only this configuration; all when `None`
    pub configuration: Option<QualifiedName>,
    /// Apply the fixes
    pub fix: bool,
    /// Write the (fixed) model here
    pub write: Option<&'a Path>,
    /// JSON output
    pub json: bool,
}

/// Compute (and optionally apply) deltas
///
/// # Errors
/// Returns error if a configuration or its type is unknown, a fix fails, or
/// the model cannot be written
pub fn delta(
    model: &mut ProductModel,
    config: &ReconcileConfig,
    options: &DeltaOptions<'_>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let ids: Vec<QualifiedName> = match &options.configuration {
        Some(id) => {
            if model.find_configuration(id).is_none() {
                anyhow::bail!("unknown configuration '{id}'");
            }
            vec![id.clone()]
        }
        None => model.configurations().map(|c| c.id().clone()).collect(),
    };

    let context = FixContext::from_config(&StandardDefaults, config);
    let mut deltas: Vec<Delta> = Vec::with_capacity(ids.len());
    for id in &ids {
        let configuration = model
            .find_configuration(id)
            .with_context(|| format!("unknown configuration '{id}'"))?;
        let delta = DeltaComputer::new(&*model).compute_delta(configuration)?;

        if options.fix && !delta.is_empty() {
            let configuration = model
                .configuration_mut(id)
                .with_context(|| format!("unknown configuration '{id}'"))?;
            delta
                .fix(configuration, &context)
                .with_context(|| format!("failed to fix configuration '{id}'"))?;
        }
        deltas.push(delta);
    }

    if let Some(path) = options.write {
        save_model(path, model)?;
    }

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &deltas)?;
        writeln!(out)?;
    } else {
        for delta in &deltas {
            if delta.is_empty() {
                writeln!(out, "{delta}")?;
            } else {
                write!(out, "{delta}")?;
            }
        }
        if options.fix {
            let fixed = deltas.iter().filter(|d| !d.is_empty()).count();
            writeln!(out, "fixed {fixed} configuration(s)")?;
        }
    }

    let pending = !options.fix && deltas.iter().any(|d| !d.is_empty());
    Ok(if pending {
        ExitCode::from(EXIT_DIFFERENCES)
    } else {
        ExitCode::SUCCESS
    })
}

/// Report link cycles and supertype cycles
///
/// With `root`, the first link cycle reachable from it; otherwise one cycle
/// per group of configurations that reach each other.
///
/// # Errors
/// Returns error if `root` is unknown
pub fn cycles(
    model: &ProductModel,
    config: &ReconcileConfig,
    root: Option<&QualifiedName>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let mut found: Vec<CyclePath> = Vec::new();

    match root {
        Some(id) => {
            let configuration = model
                .find_configuration(id)
                .with_context(|| format!("unknown configuration '{id}'"))?;
            let detector =
                AssociationCycleDetector::new(model).with_max_depth(config.max_link_depth);
            found.extend(detector.find_cycle(configuration));
        }
        None => {
            found.extend(
                find_link_cycles(model, model.configurations())
                    .into_iter()
                    .map(LinkCycle::into_path),
            );
        }
    }

    for cycle in &found {
        writeln!(out, "link cycle: {cycle}")?;
    }

    let type_cycles = find_hierarchy_cycles(model.types());
    for cycle in &type_cycles {
        let names: Vec<String> = cycle.iter().map(ToString::to_string).collect();
        writeln!(out, "supertype cycle: {}", names.join(" -> "))?;
    }

    if found.is_empty() && type_cycles.is_empty() {
        writeln!(out, "no cycles")?;
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FINDINGS))
    }
}

/// Validate the whole model
///
/// # Errors
/// Returns error if the report cannot be written
pub fn validate(model: &ProductModel, json: bool, out: &mut dyn Write) -> Result<ExitCode> {
    let messages = validate_model(model);

    if json {
        serde_json::to_writer_pretty(&mut *out, &messages)?;
        writeln!(out)?;
    } else if messages.is_empty() {
        writeln!(out, "model is valid")?;
    } else {
        write!(out, "{messages}")?;
    }

    Ok(if messages.contains_errors() {
        ExitCode::from(EXIT_FINDINGS)
    } else {
        ExitCode::SUCCESS
    })
}
