//! Hierarchy queries built on the walker, and whole-model cycle search

use crate::walker::{schema_walker, type_walker, Visit};
use pconf_model::{HierarchyNode, ProductType, QualifiedName, Schema, TypeRepository};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

/// Supertypes of `ty`, nearest first, `ty` itself excluded
pub fn supertypes<'a, R>(repo: &'a R, ty: &'a ProductType) -> Vec<&'a ProductType>
where
    R: TypeRepository + ?Sized,
{
    let mut result = Vec::new();
    type_walker(repo).walk(ty, |node| {
        if !std::ptr::eq(node, ty) {
            result.push(node);
        }
        Visit::Continue
    });
    result
}

/// Check if `ty` is `candidate` or one of its subtypes
pub fn is_same_or_subtype<'a, R>(
    repo: &'a R,
    ty: &'a ProductType,
    candidate: &QualifiedName,
) -> bool
where
    R: TypeRepository + ?Sized,
{
    type_walker(repo).reaches(ty, candidate)
}

/// Check if `schema` is `candidate` or one of its subschemas
pub fn is_same_or_subschema<'a, R>(
    repo: &'a R,
    schema: &'a Schema,
    candidate: &QualifiedName,
) -> bool
where
    R: TypeRepository + ?Sized,
{
    schema_walker(repo).reaches(schema, candidate)
}

/// Every supertype cycle among `nodes`
///
/// Each cycle is listed once, starting at its smallest name and following
/// the parent references. A node naming itself as parent is a cycle of one.
pub fn find_hierarchy_cycles<'a, N, I>(nodes: I) -> Vec<Vec<QualifiedName>>
where
    N: HierarchyNode + 'a,
    I: IntoIterator<Item = &'a N>,
{
    let mut graph: DiGraphMap<&'a QualifiedName, ()> = DiGraphMap::new();
    let mut parents: HashMap<&'a QualifiedName, &'a QualifiedName> = HashMap::new();

    for node in nodes {
        graph.add_node(node.node_name());
        if let Some(parent) = node.parent_name() {
            graph.add_edge(node.node_name(), parent, ());
            parents.insert(node.node_name(), parent);
        }
    }

    let mut cycles: Vec<Vec<QualifiedName>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .filter_map(|component| {
            let start = *component.iter().min()?;
            let mut cycle = vec![start.clone()];
            let mut current = *parents.get(start)?;
            while current != start && cycle.len() <= component.len() {
                cycle.push(current.clone());
                current = *parents.get(current)?;
            }
            Some(cycle)
        })
        .collect();

    cycles.sort();
    if !cycles.is_empty() {
        tracing::debug!(count = cycles.len(), "supertype cycles found");
    }
    cycles
}
