//! Dependency graph operations: cycle detection, reference validation and
//! topological ordering.
//!
//! Everything here is a pure function of its arguments. Nothing is cached and
//! the input tasks are never modified.

use crate::error::{Result, RoadmapError};
use crate::types::{Roadmap, Task, ValidationError, ValidationErrorKind};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Relation lists keyed by task ID.
///
/// Every task in the input has an entry in both maps, empty when the task
/// declares no relations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// task -> its `depends-on` list, verbatim
    pub depends_on: BTreeMap<String, Vec<String>>,
    /// task -> its `blocks` list, verbatim
    pub blocks: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Outgoing `depends-on` edges of a task.
    pub fn depends_on_of(&self, id: &str) -> &[String] {
        self.depends_on.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Outgoing `blocks` edges of a task.
    pub fn blocks_of(&self, id: &str) -> &[String] {
        self.blocks.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of tasks in the graph.
    pub fn node_count(&self) -> usize {
        self.depends_on.len()
    }

    /// Number of edges of both kinds.
    pub fn edge_count(&self) -> usize {
        self.depends_on.values().map(|v| v.len()).sum::<usize>()
            + self.blocks.values().map(|v| v.len()).sum::<usize>()
    }
}

/// Build the relation maps for a task list.
///
/// Lists are copied as declared: no deduplication and no filtering of
/// unknown targets. When two tasks share an ID the later one wins.
pub fn build_graph(tasks: &[Task]) -> DependencyGraph {
    let mut graph = DependencyGraph::default();
    for task in tasks {
        graph
            .depends_on
            .insert(task.id.clone(), task.depends_on.clone());
        graph.blocks.insert(task.id.clone(), task.blocks.clone());
    }
    graph
}

/// Which relation kinds a cycle search follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeSet {
    /// `depends-on` and `blocks` together.
    All,
    /// `depends-on` only.
    DependsOn,
}

/// Find the first cycle reachable through `depends-on` and `blocks` edges.
///
/// Nodes are visited in task order and edges in declared order, `depends-on`
/// before `blocks`. The returned path starts and ends with the same ID, so a
/// self-loop reports `[A, A]` and a two-task loop `[A, B, A]`. Only the first
/// cycle found is reported.
pub fn detect_circular(tasks: &[Task]) -> Option<Vec<String>> {
    find_cycle(&build_graph(tasks), tasks, EdgeSet::All)
}

fn find_cycle(graph: &DependencyGraph, tasks: &[Task], edges: EdgeSet) -> Option<Vec<String>> {
    struct CycleSearch<'a> {
        graph: &'a DependencyGraph,
        edges: EdgeSet,
        visited: HashSet<&'a str>,
        on_path: HashSet<&'a str>,
        path: Vec<&'a str>,
    }

    impl<'a> CycleSearch<'a> {
        fn visit(&mut self, node: &'a str) -> Option<Vec<String>> {
            if self.on_path.contains(node) {
                let start = self.path.iter().position(|n| *n == node)?;
                let mut cycle: Vec<String> =
                    self.path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(node.to_string());
                return Some(cycle);
            }
            if !self.visited.insert(node) {
                return None;
            }

            self.on_path.insert(node);
            self.path.push(node);

            let graph = self.graph;
            let blocks: &'a [String] = match self.edges {
                EdgeSet::All => graph.blocks_of(node),
                EdgeSet::DependsOn => &[],
            };
            for next in graph.depends_on_of(node).iter().chain(blocks) {
                if let Some(cycle) = self.visit(next) {
                    return Some(cycle);
                }
            }

            self.path.pop();
            self.on_path.remove(node);
            None
        }
    }

    let mut search = CycleSearch {
        graph,
        edges,
        visited: HashSet::new(),
        on_path: HashSet::new(),
        path: Vec::new(),
    };

    for task in tasks {
        if search.visited.contains(task.id.as_str()) {
            continue;
        }
        if let Some(cycle) = search.visit(&task.id) {
            return Some(cycle);
        }
    }
    None
}

/// Check every relation of a roadmap.
///
/// Emits one `missing-task` error per reference to an unknown task, in task
/// order and, within a task, `depends-on` before `blocks`. If the relations
/// contain a cycle, exactly one `circular` error follows. `blocks` and
/// `depends-on` are not required to mirror each other.
pub fn validate_dependencies(roadmap: &Roadmap) -> Vec<ValidationError> {
    let known: HashSet<&str> = roadmap.tasks.iter().map(|t| t.id.as_str()).collect();
    let mut errors = Vec::new();

    for task in &roadmap.tasks {
        for dep in task.depends_on.iter().filter(|d| !known.contains(d.as_str())) {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::MissingTask,
                    format!("Task {} depends on non-existent task {}", task.id, dep),
                )
                .for_task(&task.id)
                .related(vec![dep.clone()]),
            );
        }
        for blocked in task.blocks.iter().filter(|b| !known.contains(b.as_str())) {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::MissingTask,
                    format!("Task {} blocks non-existent task {}", task.id, blocked),
                )
                .for_task(&task.id)
                .related(vec![blocked.clone()]),
            );
        }
    }

    if let Some(cycle) = detect_circular(&roadmap.tasks) {
        errors.push(
            ValidationError::new(
                ValidationErrorKind::Circular,
                format!("Circular dependency detected: {}", cycle.join(" -> ")),
            )
            .for_task(&cycle[0])
            .related(cycle),
        );
    }

    errors
}

/// Order tasks so that every prerequisite comes before its dependents.
///
/// Only `depends-on` edges constrain the order; references to unknown tasks
/// are ignored. Among tasks that are ready at the same time, the one earlier
/// in the input comes first. Returns a new list.
///
/// # Errors
///
/// Returns [`RoadmapError::CircularDependency`] when the `depends-on` edges
/// contain a cycle.
pub fn topological_sort(tasks: &[Task]) -> Result<Vec<Task>> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        positions.entry(task.id.as_str()).or_default().push(i);
    }

    // dependents[b] lists every task index that waits on task b
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    let mut in_degree = vec![0usize; tasks.len()];
    for (i, task) in tasks.iter().enumerate() {
        for dep in &task.depends_on {
            if let Some(prereqs) = positions.get(dep.as_str()) {
                for &p in prereqs {
                    dependents[p].push(i);
                    in_degree[i] += 1;
                }
            }
        }
    }

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| if d == 0 { Some(i) } else { None })
        .collect();
    let mut order = Vec::with_capacity(tasks.len());

    while let Some(i) = ready.pop_first() {
        order.push(tasks[i].clone());
        for &next in &dependents[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() < tasks.len() {
        let graph = build_graph(tasks);
        let cycle = find_cycle(&graph, tasks, EdgeSet::DependsOn).unwrap_or_else(|| {
            in_degree
                .iter()
                .enumerate()
                .filter(|(_, &d)| d > 0)
                .map(|(i, _)| tasks[i].id.clone())
                .collect()
        });
        return Err(RoadmapError::CircularDependency { cycle });
    }

    Ok(order)
}

/// Tasks whose `depends-on` list contains `task`'s ID, in `all_tasks` order.
pub fn get_blocked_tasks<'a>(task: &Task, all_tasks: &'a [Task]) -> Vec<&'a Task> {
    all_tasks
        .iter()
        .filter(|t| t.depends_on.iter().any(|d| *d == task.id))
        .collect()
}

/// Resolve `task`'s `depends-on` list against `all_tasks`.
///
/// Keeps the declared order and silently drops IDs that match nothing.
pub fn get_depends_on_tasks<'a>(task: &Task, all_tasks: &'a [Task]) -> Vec<&'a Task> {
    task.depends_on
        .iter()
        .filter_map(|id| all_tasks.iter().find(|t| t.id == *id))
        .collect()
}
