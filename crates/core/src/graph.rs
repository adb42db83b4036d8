use std::collections::{HashMap, HashSet};

use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::prelude::*;

use crate::configs::tasks::{TaskConfig, TaskMode};
use crate::types::{ProvisionError, ProvisionResult};

/// A validated task definition, one node of the execution graph
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub description: Option<String>,
    pub commands: Vec<String>,
    pub prerequisites: Vec<String>,
    pub mode: TaskMode,
}

impl From<TaskConfig> for Task {
    fn from(config: TaskConfig) -> Self {
        Self {
            name: config.name,
            description: config.description,
            commands: config.commands,
            prerequisites: config.dependencies.unwrap_or_default(),
            mode: config.mode.unwrap_or_default(),
        }
    }
}

/// Static task graph. Edges point from a prerequisite to the task that waits on it.
#[derive(Debug, Clone)]
pub struct ExecutionGraph {
    graph: DiGraph<Task, ()>,
    topo_order: Vec<NodeIndex>,
}

impl ExecutionGraph {
    /// Build the graph from task configs, rejecting duplicate names, unknown
    /// prerequisites and cycles
    pub fn from_configs(tasks: Vec<TaskConfig>) -> ProvisionResult<Self> {
        Self::from_tasks(tasks.into_iter().map(Task::from).collect())
    }

    pub fn from_tasks(tasks: Vec<Task>) -> ProvisionResult<Self> {
        let mut graph = DiGraph::<Task, ()>::new();
        let mut name_to_node = HashMap::new();

        // Add all tasks as nodes, in declaration order
        for task in tasks {
            if task.name.trim().is_empty() {
                return Err(ProvisionError::Graph(
                    "Task names must not be empty".to_string(),
                ));
            }
            if name_to_node.contains_key(&task.name) {
                return Err(ProvisionError::Graph(format!(
                    "Task '{}' is defined more than once",
                    task.name
                )));
            }
            let name = task.name.clone();
            let node_index = graph.add_node(task);
            name_to_node.insert(name, node_index);
        }

        // Add edges for prerequisites
        let mut edges = Vec::new();
        for node_index in graph.node_indices() {
            let task = &graph[node_index];
            let mut seen = HashSet::new();
            for prerequisite in &task.prerequisites {
                if !seen.insert(prerequisite) {
                    continue;
                }
                match name_to_node.get(prerequisite) {
                    Some(&from_node) => edges.push((from_node, node_index)),
                    None => {
                        return Err(ProvisionError::Graph(format!(
                            "Task '{}' depends on '{}' which was not found",
                            task.name, prerequisite
                        )))
                    }
                }
            }
        }
        for (from_node, to_node) in edges {
            graph.add_edge(from_node, to_node, ());
        }

        let cycles = find_cycles(&graph);
        if !cycles.is_empty() {
            let message = cycles
                .into_iter()
                .map(|mut cycle| {
                    if let Some(first) = cycle.first().cloned() {
                        cycle.push(first);
                    }
                    cycle.join(" -> ")
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ProvisionError::Graph(format!(
                "Circular dependency detected: {}",
                message
            )));
        }

        let topo_order = toposort(&graph, None).map_err(|cycle| {
            ProvisionError::Graph(format!(
                "Circular dependency detected at '{}'",
                graph[cycle.node_id()].name
            ))
        })?;

        Ok(Self { graph, topo_order })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn task(&self, node: NodeIndex) -> &Task {
        &self.graph[node]
    }

    /// Node indices in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Tasks in declaration order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.graph.node_weights()
    }

    pub fn prerequisites(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Every node after all of its prerequisites
    pub fn topological_order(&self) -> &[NodeIndex] {
        &self.topo_order
    }
}

/// Strongly connected components with more than one task, plus self-loops
fn find_cycles(graph: &DiGraph<Task, ()>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(graph)
        .into_iter()
        .filter_map(|component| {
            if component.len() > 1 {
                let mut cycle = component
                    .iter()
                    .map(|node| graph[*node].name.clone())
                    .collect::<Vec<_>>();
                cycle.sort();
                Some(cycle)
            } else {
                let node = component[0];
                if graph.contains_edge(node, node) {
                    Some(vec![graph[node].name.clone()])
                } else {
                    None
                }
            }
        })
        .collect();

    cycles.sort();
    cycles
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn task(name: &str, prerequisites: &[&str], commands: &[&str]) -> Task {
        Task {
            name: name.to_string(),
            description: None,
            commands: commands.iter().map(|c| c.to_string()).collect(),
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
            mode: TaskMode::Parallel,
        }
    }

    pub(crate) fn inline_task(name: &str, prerequisites: &[&str], commands: &[&str]) -> Task {
        Task {
            mode: TaskMode::Inline,
            ..task(name, prerequisites, commands)
        }
    }

    fn names(graph: &ExecutionGraph, nodes: &[NodeIndex]) -> Vec<String> {
        nodes.iter().map(|&n| graph.task(n).name.clone()).collect()
    }

    fn node(graph: &ExecutionGraph, name: &str) -> NodeIndex {
        graph
            .nodes()
            .find(|&n| graph.task(n).name == name)
            .unwrap()
    }

    #[test]
    fn test_roots_and_edges() {
        let graph = ExecutionGraph::from_tasks(vec![
            task("packages", &[], &["yum install -y make"]),
            task("go", &[], &["curl go"]),
            task("tools", &["go"], &["go get dlv"]),
            inline_task("make-install", &["packages", "go"], &["make install"]),
        ])
        .unwrap();

        assert_eq!(graph.len(), 4);
        let roots: Vec<NodeIndex> = graph
            .nodes()
            .filter(|&n| graph.prerequisites(n).next().is_none())
            .collect();
        assert_eq!(names(&graph, &roots), vec!["packages", "go"]);

        let make_install = node(&graph, "make-install");
        let mut prerequisites = names(
            &graph,
            &graph.prerequisites(make_install).collect::<Vec<_>>(),
        );
        prerequisites.sort();
        assert_eq!(prerequisites, vec!["go", "packages"]);
        assert_eq!(graph.task(make_install).mode, TaskMode::Inline);
    }

    #[test]
    fn test_topological_order_puts_prerequisites_first() {
        let graph = ExecutionGraph::from_tasks(vec![
            task("c", &["b"], &[]),
            task("b", &["a"], &[]),
            task("a", &[], &[]),
        ])
        .unwrap();

        let order = names(&graph, graph.topological_order());
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_prerequisite_is_rejected() {
        let err = ExecutionGraph::from_tasks(vec![task("tools", &["go"], &[])]).unwrap_err();
        assert!(err
            .to_string()
            .contains("Task 'tools' depends on 'go' which was not found"));
    }

    #[test]
    fn test_duplicate_task_is_rejected() {
        let err = ExecutionGraph::from_tasks(vec![task("go", &[], &[]), task("go", &[], &[])])
            .unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn test_cycle_detection() {
        let err = ExecutionGraph::from_tasks(vec![
            task("a", &["b"], &[]),
            task("b", &["a"], &[]),
            task("c", &[], &[]),
        ])
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Circular dependency detected"));
        assert!(message.contains("a -> b -> a"), "got: {}", message);
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let err = ExecutionGraph::from_tasks(vec![task("a", &["a"], &[])]).unwrap_err();
        assert!(err.to_string().contains("a -> a"));
    }

    #[test]
    fn test_repeated_prerequisite_adds_one_edge() {
        let graph = ExecutionGraph::from_tasks(vec![
            task("a", &[], &[]),
            task("b", &["a", "a"], &[]),
        ])
        .unwrap();
        let b = node(&graph, "b");
        assert_eq!(graph.prerequisites(b).count(), 1);
    }
}
