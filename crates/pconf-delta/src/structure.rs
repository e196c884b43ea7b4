//! Whole-structure reconciliation
//!
//! Diffs every configuration reachable from a root over links. The link graph
//! is checked for cycles first; a cyclic structure is refused rather than
//! traversed.

use crate::computer::DeltaComputer;
use crate::config::ReconcileConfig;
use crate::delta::Delta;
use crate::error::{DeltaError, StructureError};
use pconf_graph::AssociationCycleDetector;
use pconf_model::{ConfigurationRepository, ProductConfiguration, QualifiedName, TypeRepository};
use serde::Serialize;
use std::collections::HashSet;

/// Link whose target configuration does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedLink {
    /// Configuration holding the link
    pub configuration: QualifiedName,
    /// Link role
    pub role: String,
    /// Missing target
    pub target: QualifiedName,
}

/// Deltas of a configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureDelta {
    root: QualifiedName,
    deltas: Vec<Delta>,
    unresolved_links: Vec<UnresolvedLink>,
}

impl StructureDelta {
    /// Root the structure was collected from
    #[inline]
    #[must_use]
    pub fn root(&self) -> &QualifiedName {
        &self.root
    }

    /// One delta per reachable configuration, root first, depth-first
    #[inline]
    #[must_use]
    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    /// Links that could not be followed
    #[inline]
    #[must_use]
    pub fn unresolved_links(&self) -> &[UnresolvedLink] {
        &self.unresolved_links
    }

    /// Deltas that have entries
    pub fn pending(&self) -> impl Iterator<Item = &Delta> {
        self.deltas.iter().filter(|d| !d.is_empty())
    }

    /// Total entries over all deltas
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.deltas.iter().map(Delta::len).sum()
    }

    /// Check if no reachable configuration has entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.iter().all(Delta::is_empty)
    }
}

/// Diff the configuration `root` and everything reachable from it
///
/// Each configuration is diffed once even if several links reach it.
/// `config.max_link_depth` caps how far links are followed.
///
/// # Errors
/// Returns error if `root` is unknown, the structure has a link cycle, or a
/// reachable configuration references an unknown product type
pub fn compute_structure_delta<M>(
    model: &M,
    root: &QualifiedName,
    config: &ReconcileConfig,
) -> Result<StructureDelta, StructureError>
where
    M: TypeRepository + ConfigurationRepository + ?Sized,
{
    let root_configuration = model
        .find_configuration(root)
        .ok_or_else(|| DeltaError::UnknownConfiguration(root.clone()))?;

    if let Some(cycle) = AssociationCycleDetector::new(model)
        .with_max_depth(config.max_link_depth)
        .find_cycle(root_configuration)
    {
        tracing::warn!(root = %root, cycle = %cycle, "structure refused, association cycle");
        return Err(StructureError::Cycle(cycle));
    }

    let computer = DeltaComputer::new(model);
    let mut collector = Collector {
        model,
        max_depth: config.max_link_depth,
        seen: HashSet::new(),
        deltas: Vec::new(),
        unresolved_links: Vec::new(),
    };
    collector.visit(root_configuration, 0, &computer)?;

    tracing::debug!(
        root = %root,
        configurations = collector.deltas.len(),
        unresolved = collector.unresolved_links.len(),
        "structure delta computed"
    );

    Ok(StructureDelta {
        root: root.clone(),
        deltas: collector.deltas,
        unresolved_links: collector.unresolved_links,
    })
}

struct Collector<'a, M: ?Sized> {
    model: &'a M,
    max_depth: Option<usize>,
    seen: HashSet<&'a QualifiedName>,
    deltas: Vec<Delta>,
    unresolved_links: Vec<UnresolvedLink>,
}

impl<'a, M> Collector<'a, M>
where
    M: TypeRepository + ConfigurationRepository + ?Sized,
{
    fn visit(
        &mut self,
        configuration: &'a ProductConfiguration,
        depth: usize,
        computer: &DeltaComputer<'a, M>,
    ) -> Result<(), DeltaError> {
        if !self.seen.insert(configuration.id()) {
            return Ok(());
        }
        self.deltas.push(computer.compute_delta(configuration)?);

        let model: &'a M = self.model;
        for link in configuration.links() {
            let Some(target) = model.find_configuration(&link.target) else {
                self.unresolved_links.push(UnresolvedLink {
                    configuration: configuration.id().clone(),
                    role: link.role.clone(),
                    target: link.target.clone(),
                });
                continue;
            };
            if self.max_depth.is_some_and(|max| depth >= max) {
                tracing::warn!(
                    configuration = %target.id(),
                    depth = depth + 1,
                    "association depth cap reached, branch not reconciled"
                );
                continue;
            }
            self.visit(target, depth + 1, computer)?;
        }
        Ok(())
    }
}
