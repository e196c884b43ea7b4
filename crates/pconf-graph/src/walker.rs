//! Supertype hierarchy traversal
//!
//! Provides [`TypeHierarchyWalker`], an upward walk over any single-inheritance
//! hierarchy of [`HierarchyNode`]s.
//!
//! # Cycle safety
//!
//! Supertype chains are authored by users and may be malformed. The walker
//! keeps a visited set keyed by node name for the lifetime of one walk; when a
//! node comes around a second time the walk ends and reports
//! [`Termination::Cycle`]. That is a normal outcome, not an error: reporting
//! the cycle is the validator's job.

use pconf_model::{HierarchyNode, ProductType, QualifiedName, Schema, TypeRepository};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// Visitor verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Go on to the supertype
    Continue,
    /// End the walk after this node
    Stop,
}

/// Why a walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Reached a node without supertype
    Root,
    /// The visitor returned [`Visit::Stop`]
    Stopped,
    /// A declared supertype could not be resolved
    Unresolved(QualifiedName),
    /// The named node was reached a second time
    Cycle(QualifiedName),
}

/// Outcome of one walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSummary {
    /// Number of nodes handed to the visitor
    pub visited: usize,
    /// Why the walk ended
    pub termination: Termination,
}

impl WalkSummary {
    /// Check if the walk hit a cycle
    #[inline]
    #[must_use]
    pub fn hit_cycle(&self) -> bool {
        matches!(self.termination, Termination::Cycle(_))
    }
}

/// Upward walker over a single-inheritance hierarchy
///
/// `resolve` turns a declared parent name into the parent node. Visiting
/// order is subtype first, then its supertype, and so on towards the root.
///
/// # Complexity
/// O(depth) visitor calls, O(depth) memory for the visited set.
pub struct TypeHierarchyWalker<'a, N, F> {
    resolve: F,
    _node: PhantomData<&'a N>,
}

impl<N, F> fmt::Debug for TypeHierarchyWalker<'_, N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHierarchyWalker").finish_non_exhaustive()
    }
}

impl<'a, N, F> TypeHierarchyWalker<'a, N, F>
where
    N: HierarchyNode + 'a,
    F: Fn(&QualifiedName) -> Option<&'a N>,
{
    /// Create walker with a parent resolver
    #[inline]
    #[must_use]
    pub fn new(resolve: F) -> Self {
        Self {
            resolve,
            _node: PhantomData,
        }
    }

    /// Walk from `start` towards the root
    ///
    /// Stops when the visitor says so, when there is no further (resolvable)
    /// supertype, or when a node is revisited.
    pub fn walk<V>(&self, start: &'a N, mut visitor: V) -> WalkSummary
    where
        V: FnMut(&'a N) -> Visit,
    {
        let mut seen: HashSet<&'a QualifiedName> = HashSet::new();
        let mut current = start;
        let mut visited = 0;

        loop {
            if !seen.insert(current.node_name()) {
                tracing::warn!(
                    start = %start.node_name(),
                    revisited = %current.node_name(),
                    "supertype cycle, hierarchy walk terminated"
                );
                return WalkSummary {
                    visited,
                    termination: Termination::Cycle(current.node_name().clone()),
                };
            }

            visited += 1;
            if visitor(current) == Visit::Stop {
                return WalkSummary {
                    visited,
                    termination: Termination::Stopped,
                };
            }

            let Some(parent_name) = current.parent_name() else {
                return WalkSummary {
                    visited,
                    termination: Termination::Root,
                };
            };

            match (self.resolve)(parent_name) {
                Some(parent) => current = parent,
                None => {
                    tracing::warn!(
                        node = %current.node_name(),
                        supertype = %parent_name,
                        "supertype not found, hierarchy walk terminated"
                    );
                    return WalkSummary {
                        visited,
                        termination: Termination::Unresolved(parent_name.clone()),
                    };
                }
            }
        }
    }

    /// Collect every node of the walk, `start` included
    #[must_use]
    pub fn collect(&self, start: &'a N) -> (Vec<&'a N>, WalkSummary) {
        let mut nodes = Vec::new();
        let summary = self.walk(start, |node| {
            nodes.push(node);
            Visit::Continue
        });
        (nodes, summary)
    }

    /// Check if the walk from `start` reaches a node named `name`
    #[must_use]
    pub fn reaches(&self, start: &'a N, name: &QualifiedName) -> bool {
        let mut found = false;
        self.walk(start, |node| {
            if node.node_name() == name {
                found = true;
                Visit::Stop
            } else {
                Visit::Continue
            }
        });
        found
    }
}

/// Walker over product types of `repo`
pub fn type_walker<'a, R>(
    repo: &'a R,
) -> TypeHierarchyWalker<'a, ProductType, impl Fn(&QualifiedName) -> Option<&'a ProductType> + 'a>
where
    R: TypeRepository + ?Sized + 'a,
{
    TypeHierarchyWalker::new(move |name: &QualifiedName| repo.find_type(name))
}

/// Walker over schemas of `repo`
pub fn schema_walker<'a, R>(
    repo: &'a R,
) -> TypeHierarchyWalker<'a, Schema, impl Fn(&QualifiedName) -> Option<&'a Schema> + 'a>
where
    R: TypeRepository + ?Sized + 'a,
{
    TypeHierarchyWalker::new(move |name: &QualifiedName| repo.find_schema(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pconf_test_utils::{qn, supertype_chain};

    fn names(nodes: &[&ProductType]) -> Vec<String> {
        nodes.iter().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn walk_visits_subtype_first() {
        let model = supertype_chain(&["C", "B", "A"], false);
        let start = model.find_type(&qn("C")).unwrap();

        let (nodes, summary) = type_walker(&model).collect(start);
        assert_eq!(names(&nodes), vec!["C", "B", "A"]);
        assert_eq!(summary.visited, 3);
        assert_eq!(summary.termination, Termination::Root);
    }

    #[test]
    fn walk_stops_on_request() {
        let model = supertype_chain(&["C", "B", "A"], false);
        let start = model.find_type(&qn("C")).unwrap();

        let mut seen = Vec::new();
        let summary = type_walker(&model).walk(start, |node| {
            seen.push(node.name().to_string());
            if node.name() == &qn("B") {
                Visit::Stop
            } else {
                Visit::Continue
            }
        });
        assert_eq!(seen, vec!["C", "B"]);
        assert_eq!(summary.termination, Termination::Stopped);
    }

    #[test]
    fn walk_terminates_on_cycle() {
        let model = supertype_chain(&["A", "B", "C"], true);
        let start = model.find_type(&qn("A")).unwrap();

        let (nodes, summary) = type_walker(&model).collect(start);
        assert_eq!(names(&nodes), vec!["A", "B", "C"]);
        assert_eq!(summary.termination, Termination::Cycle(qn("A")));
        assert!(summary.hit_cycle());
    }

    #[test]
    fn walk_terminates_on_self_supertype() {
        let model = supertype_chain(&["A"], true);
        let start = model.find_type(&qn("A")).unwrap();

        let (nodes, summary) = type_walker(&model).collect(start);
        assert_eq!(nodes.len(), 1);
        assert!(summary.hit_cycle());
    }

    #[test]
    fn walk_terminates_on_unresolved_supertype() {
        let mut model = supertype_chain(&["B", "A"], false);
        model
            .type_mut(&qn("A"))
            .unwrap()
            .set_supertype(Some(qn("Missing")));
        let start = model.find_type(&qn("B")).unwrap();

        let (nodes, summary) = type_walker(&model).collect(start);
        assert_eq!(nodes.len(), 2);
        assert_eq!(summary.termination, Termination::Unresolved(qn("Missing")));
    }

    #[test]
    fn reaches_ancestor_only() {
        let model = supertype_chain(&["C", "B", "A"], false);
        let walker = type_walker(&model);
        let c = model.find_type(&qn("C")).unwrap();
        let a = model.find_type(&qn("A")).unwrap();

        assert!(walker.reaches(c, &qn("A")));
        assert!(walker.reaches(c, &qn("C")));
        assert!(!walker.reaches(a, &qn("C")));
    }
}
