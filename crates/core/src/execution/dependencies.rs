//! Task dependency levels
//!
//! Groups tasks by how deep they sit in the prerequisite graph. Level 0 holds
//! the root tasks; every other task sits one level below its deepest
//! prerequisite. Used to present the launch plan.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::graph::ExecutionGraph;

/// Group task names by their dependency levels (topological levels)
pub fn group_by_dependency_levels(graph: &ExecutionGraph) -> Vec<Vec<String>> {
    let mut depth: HashMap<NodeIndex, usize> = HashMap::new();

    for &node in graph.topological_order() {
        let level = graph
            .prerequisites(node)
            .filter_map(|prerequisite| depth.get(&prerequisite))
            .map(|level| level + 1)
            .max()
            .unwrap_or(0);
        depth.insert(node, level);
    }

    let level_count = depth.values().max().map_or(0, |max| max + 1);
    let mut levels = vec![Vec::new(); level_count];

    // Declaration order within a level
    for node in graph.nodes() {
        if let Some(&level) = depth.get(&node) {
            levels[level].push(graph.task(node).name.clone());
        }
    }

    levels
}
