//! Association cycle detection
//!
//! Configurations and their outbound links form a directed graph. Users can
//! author cycles into it, so anything that navigates the structure (display,
//! whole-structure reconciliation) runs [`AssociationCycleDetector`] first.
//! Whole-model reports use [`find_link_cycles`], which finds every cycle
//! group rather than the first cycle reachable from one root.

use pconf_model::{ConfigurationRepository, ProductConfiguration, QualifiedName};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Display, Formatter};

/// One hop of a cycle: a configuration and the role it is left by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStep {
    /// Configuration on the cycle
    pub configuration: QualifiedName,
    /// Role of the link taken out of it
    pub role: String,
}

/// Closed walk over links, from a repeated configuration back to itself
///
/// `X -[next]-> Y -[next]-> Z -[next]-> X` has three steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyclePath {
    steps: Vec<CycleStep>,
}

impl CyclePath {
    fn from_path(path: &[(&QualifiedName, &str)]) -> Self {
        Self {
            steps: path
                .iter()
                .map(|(configuration, role)| CycleStep {
                    configuration: (*configuration).clone(),
                    role: (*role).to_string(),
                })
                .collect(),
        }
    }

    /// Steps in traversal order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[CycleStep] {
        &self.steps
    }

    /// Number of links on the cycle
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a detected cycle
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Configurations on the cycle in traversal order
    pub fn configurations(&self) -> impl Iterator<Item = &QualifiedName> {
        self.steps.iter().map(|s| &s.configuration)
    }

    /// Roles taken, in traversal order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.role.as_str())
    }

    /// Check if `id` lies on the cycle
    #[must_use]
    pub fn contains(&self, id: &QualifiedName) -> bool {
        self.steps.iter().any(|s| &s.configuration == id)
    }

    /// `X -[next]-> Y -[next]-> X`
    #[must_use]
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl Display for CyclePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{} -[{}]-> ", step.configuration, step.role)?;
        }
        if let Some(first) = self.steps.first() {
            write!(f, "{}", first.configuration)?;
        }
        Ok(())
    }
}

/// Depth-first cycle search over link targets
///
/// Keeps the current path and a membership index of it (the recursion stack).
/// Nothing is memoized across sibling branches, so a fully connected graph
/// costs O(V·E); configuration graphs are shallow trees with rare cross links.
/// Only the first cycle found is returned. Link targets that cannot be
/// resolved are not followed.
#[derive(Debug)]
pub struct AssociationCycleDetector<'a, S: ?Sized> {
    store: &'a S,
    max_depth: Option<usize>,
}

struct Search<'a> {
    path: Vec<(&'a QualifiedName, &'a str)>,
    on_path: HashMap<&'a QualifiedName, usize>,
}

impl<'a, S> AssociationCycleDetector<'a, S>
where
    S: ConfigurationRepository + ?Sized,
{
    /// Create unbounded detector over `store`
    #[inline]
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: None,
        }
    }

    /// Cap how many links deep the search descends; `None` is unbounded
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// First cycle reachable from `root`, if any
    #[must_use]
    pub fn find_cycle(&self, root: &'a ProductConfiguration) -> Option<CyclePath> {
        let mut search = Search {
            path: Vec::new(),
            on_path: HashMap::new(),
        };
        search.on_path.insert(root.id(), 0);
        let cycle = self.visit(root, 0, &mut search);
        if let Some(cycle) = &cycle {
            tracing::debug!(root = %root.id(), cycle = %cycle, "association cycle found");
        }
        cycle
    }

    /// Shortest cycle passing through `configuration` itself, if any
    ///
    /// Breadth-first, so cycles reachable from `configuration` that do not
    /// lead back to it are ignored. Honors the depth cap.
    #[must_use]
    pub fn find_cycle_through(&self, configuration: &'a ProductConfiguration) -> Option<CyclePath> {
        shortest_cycle(self.store, configuration, self.max_depth, |_| true)
    }

    fn visit(
        &self,
        current: &'a ProductConfiguration,
        depth: usize,
        search: &mut Search<'a>,
    ) -> Option<CyclePath> {
        let store: &'a S = self.store;

        for link in current.links() {
            let Some(target) = store.find_configuration(&link.target) else {
                tracing::trace!(
                    configuration = %current.id(),
                    role = %link.role,
                    target = %link.target,
                    "link target not found, not followed"
                );
                continue;
            };

            search.path.push((current.id(), link.role.as_str()));

            if let Some(&start) = search.on_path.get(target.id()) {
                return Some(CyclePath::from_path(&search.path[start..]));
            }

            if self.max_depth.map_or(true, |max| depth < max) {
                search.on_path.insert(target.id(), search.path.len());
                let found = self.visit(target, depth + 1, search);
                search.on_path.remove(target.id());
                if found.is_some() {
                    return found;
                }
            } else {
                tracing::warn!(
                    configuration = %target.id(),
                    depth = depth + 1,
                    "association depth cap reached, branch not searched"
                );
            }

            search.path.pop();
        }

        None
    }
}

/// Breadth-first search from `start` back to itself over links whose target
/// satisfies `within`
fn shortest_cycle<'a, S, F>(
    store: &'a S,
    start: &'a ProductConfiguration,
    max_depth: Option<usize>,
    within: F,
) -> Option<CyclePath>
where
    S: ConfigurationRepository + ?Sized,
    F: Fn(&QualifiedName) -> bool,
{
    let mut previous: HashMap<&'a QualifiedName, (&'a QualifiedName, &'a str)> = HashMap::new();
    let mut queue: VecDeque<(&'a ProductConfiguration, usize)> = VecDeque::from([(start, 0)]);

    while let Some((current, depth)) = queue.pop_front() {
        for link in current.links() {
            let Some(target) = store.find_configuration(&link.target) else {
                continue;
            };
            if !within(target.id()) {
                continue;
            }

            if target.id() == start.id() {
                let mut path = vec![(current.id(), link.role.as_str())];
                let mut node = current.id();
                while node != start.id() {
                    let &(from, role) = previous.get(node)?;
                    path.push((from, role));
                    node = from;
                }
                path.reverse();
                return Some(CyclePath::from_path(&path));
            }

            if max_depth.map_or(true, |max| depth < max) && !previous.contains_key(target.id()) {
                previous.insert(target.id(), (current.id(), link.role.as_str()));
                queue.push_back((target, depth + 1));
            }
        }
    }

    None
}

/// Group of configurations that reach each other over links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCycle {
    members: Vec<QualifiedName>,
    path: CyclePath,
}

impl LinkCycle {
    /// Every configuration on some cycle of the group, sorted
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[QualifiedName] {
        &self.members
    }

    /// Shortest cycle through the smallest member
    #[inline]
    #[must_use]
    pub fn path(&self) -> &CyclePath {
        &self.path
    }

    /// Check if `id` belongs to the group
    #[must_use]
    pub fn contains(&self, id: &QualifiedName) -> bool {
        self.members.binary_search(id).is_ok()
    }

    /// Take the representative cycle
    #[must_use]
    pub fn into_path(self) -> CyclePath {
        self.path
    }
}

/// Every link cycle group among `configurations`
///
/// A configuration lies on a link cycle exactly when it is a member of one of
/// the returned groups. Groups are strongly connected components of the link
/// graph, sorted by their members; a self link forms a group of one.
pub fn find_link_cycles<'a, S, I>(store: &'a S, configurations: I) -> Vec<LinkCycle>
where
    S: ConfigurationRepository + ?Sized,
    I: IntoIterator<Item = &'a ProductConfiguration>,
{
    let mut graph: DiGraphMap<&'a QualifiedName, ()> = DiGraphMap::new();
    let mut nodes: HashMap<&'a QualifiedName, &'a ProductConfiguration> = HashMap::new();

    for configuration in configurations {
        graph.add_node(configuration.id());
        nodes.insert(configuration.id(), configuration);
        for link in configuration.links() {
            if let Some(target) = store.find_configuration(&link.target) {
                graph.add_edge(configuration.id(), target.id(), ());
            }
        }
    }

    let mut cycles: Vec<LinkCycle> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .filter_map(|mut component| {
            component.sort();
            let start = *nodes.get(component[0])?;
            let path = shortest_cycle(store, start, None, |id: &QualifiedName| {
                component.iter().any(|member| *member == id)
            })?;
            Some(LinkCycle {
                members: component.into_iter().cloned().collect(),
                path,
            })
        })
        .collect();

    cycles.sort_by(|a, b| a.members.cmp(&b.members));
    if !cycles.is_empty() {
        tracing::debug!(count = cycles.len(), "link cycles found");
    }
    cycles
}
