use pconf_graph::{
    find_hierarchy_cycles, find_link_cycles, type_walker, AssociationCycleDetector,
    FlattenedType, Termination,
};
use pconf_model::{ConfigurationRepository, ProductModel, TypeRepository};
use pconf_test_utils::{linked_configurations, qn, TypeBuilder};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use proptest::prelude::*;
use std::collections::HashSet;

/// Types `T0..Tn`, `parents[i]` naming the supertype index of `Ti`
fn random_hierarchy(parents: &[Option<usize>]) -> ProductModel {
    let n = parents.len();
    let mut model = ProductModel::new();
    for (i, parent) in parents.iter().enumerate() {
        let mut builder = TypeBuilder::new(&format!("T{i}")).value(&format!("p{i}"), "String");
        if let Some(parent) = parent {
            // indices past the end become dangling references
            builder = builder.supertype(&format!("T{}", parent % (n + 1)));
        }
        model.insert_type(builder.build()).unwrap();
    }
    model
}

fn parents_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    proptest::collection::vec(proptest::option::of(0..12usize), 1..12)
}

proptest! {
    #[test]
    fn prop_walk_terminates_and_visits_once(parents in parents_strategy()) {
        let model = random_hierarchy(&parents);

        for ty in model.types() {
            let (nodes, summary) = type_walker(&model).collect(ty);
            let unique: HashSet<_> = nodes.iter().map(|n| n.name()).collect();

            prop_assert_eq!(unique.len(), nodes.len());
            prop_assert!(nodes.len() <= parents.len());
            prop_assert_eq!(summary.visited, nodes.len());
            prop_assert!(summary.termination != Termination::Stopped);
        }
    }

    #[test]
    fn prop_walk_cycle_matches_model_cycles(parents in parents_strategy()) {
        let model = random_hierarchy(&parents);
        let cycles = find_hierarchy_cycles(model.types());
        let on_cycle: HashSet<_> = cycles.iter().flatten().cloned().collect();

        for ty in model.types() {
            let summary = type_walker(&model).collect(ty).1;
            if let Termination::Cycle(revisited) = &summary.termination {
                prop_assert!(on_cycle.contains(revisited));
            }
            if on_cycle.contains(ty.name()) {
                prop_assert!(summary.hit_cycle());
            }
        }
    }

    #[test]
    fn prop_flattened_names_are_unique(parents in parents_strategy()) {
        let model = random_hierarchy(&parents);

        for ty in model.types() {
            let flat = FlattenedType::collect(&model, ty);
            let names: HashSet<_> = flat.properties().map(|d| d.name.as_str()).collect();
            prop_assert_eq!(names.len(), flat.property_count());
            prop_assert_eq!(flat.property_count(), flat.hierarchy().len());
        }
    }

    #[test]
    fn prop_detector_agrees_with_reachable_cycle(
        node_count in 1..10usize,
        edges in proptest::collection::vec((0..10usize, 0..10usize), 0..25),
    ) {
        let ids: Vec<String> = (0..node_count).map(|i| format!("C{i}")).collect();
        let edges: Vec<(usize, usize)> = edges
            .into_iter()
            .filter(|(from, to)| *from < node_count && *to < node_count)
            .collect();
        let named: Vec<(&str, &str, &str)> = edges
            .iter()
            .map(|(from, to)| (ids[*from].as_str(), "next", ids[*to].as_str()))
            .collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let model = linked_configurations(&id_refs, &named);

        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for i in 0..node_count {
            graph.add_node(i);
        }
        for (from, to) in &edges {
            graph.add_edge(*from, *to, ());
        }
        let mut reachable: DiGraphMap<usize, ()> = DiGraphMap::new();
        let mut dfs = Dfs::new(&graph, 0);
        while let Some(node) = dfs.next(&graph) {
            reachable.add_node(node);
        }
        for (from, to, _) in graph.all_edges() {
            if reachable.contains_node(from) {
                reachable.add_edge(from, to, ());
            }
        }

        let root = model.find_configuration(&qn("C0")).unwrap();
        let cycle = AssociationCycleDetector::new(&model).find_cycle(root);
        prop_assert_eq!(cycle.is_some(), is_cyclic_directed(&reachable));

        if let Some(cycle) = cycle {
            let steps = cycle.steps();
            for (i, step) in steps.iter().enumerate() {
                let next = &steps[(i + 1) % steps.len()].configuration;
                let from = model.find_configuration(&step.configuration).unwrap();
                prop_assert!(from.links_for_role(&step.role).any(|l| &l.target == next));
            }
        }
    }

    #[test]
    fn prop_cycle_groups_match_cycles_through_each_member(
        node_count in 1..10usize,
        edges in proptest::collection::vec((0..10usize, 0..10usize), 0..25),
    ) {
        let ids: Vec<String> = (0..node_count).map(|i| format!("C{i}")).collect();
        let named: Vec<(&str, &str, &str)> = edges
            .iter()
            .filter(|(from, to)| *from < node_count && *to < node_count)
            .map(|(from, to)| (ids[*from].as_str(), "next", ids[*to].as_str()))
            .collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let model = linked_configurations(&id_refs, &named);

        let groups = find_link_cycles(&model, model.configurations());
        let detector = AssociationCycleDetector::new(&model);

        for configuration in model.configurations() {
            let through = detector.find_cycle_through(configuration);
            let grouped = groups.iter().any(|g| g.contains(configuration.id()));
            prop_assert_eq!(through.is_some(), grouped);
            if let Some(cycle) = through {
                prop_assert_eq!(cycle.steps()[0].configuration.clone(), configuration.id().clone());
            }
        }

        for group in &groups {
            let path = group.path();
            prop_assert_eq!(&path.steps()[0].configuration, &group.members()[0]);
            prop_assert!(path.configurations().all(|id| group.contains(id)));
        }
    }
}

#[test]
fn walker_handles_long_chain() {
    let mut model = ProductModel::new();
    for i in 0..500 {
        let mut builder = TypeBuilder::new(&format!("T{i}"));
        if i > 0 {
            builder = builder.supertype(&format!("T{}", i - 1));
        }
        model.insert_type(builder.build()).unwrap();
    }

    let leaf = model.find_type(&qn("T499")).unwrap();
    let (nodes, summary) = type_walker(&model).collect(leaf);
    assert_eq!(nodes.len(), 500);
    assert_eq!(summary.termination, Termination::Root);
}
