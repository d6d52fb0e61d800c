//! The outcome of resolution and the dependency graph it induces.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use shelf_core::version::Version;

use crate::pinset::{Pin, PinSet};

/// A node in the resolved dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub name: String,
    pub version: Version,
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Every library chosen by a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    roots: Vec<String>,
    pins: BTreeMap<String, Pin>,
}

impl Resolution {
    pub fn new(roots: Vec<String>, pins: PinSet) -> Self {
        Self {
            roots,
            pins: pins.into_pins(),
        }
    }

    /// Names that were requested directly.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn get(&self, name: &str) -> Option<&Pin> {
        self.pins.get(name)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// `(name, version)` for every pinned library, in name order.
    pub fn to_list(&self) -> Vec<(String, Version)> {
        self.pins
            .iter()
            .map(|(name, pin)| (name.clone(), pin.version.clone()))
            .collect()
    }

    /// `(name, version)` with dependencies before their dependents.
    /// Libraries in a dependency cycle are adjacent, in name order.
    pub fn install_order(&self) -> Vec<(String, Version)> {
        self.graph().install_order()
    }

    pub fn graph(&self) -> DependencyGraph {
        DependencyGraph::from_pins(&self.pins, &self.roots)
    }

    /// Render the dependency tree of every root.
    pub fn print_tree(&self) -> String {
        self.graph().print_tree()
    }
}

/// Resolved libraries as a directed graph, edges pointing from dependent to dependency.
pub struct DependencyGraph {
    graph: DiGraph<ResolvedNode, ()>,
    index: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    fn from_pins(pins: &BTreeMap<String, Pin>, roots: &[String]) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for (name, pin) in pins {
            let idx = graph.add_node(ResolvedNode {
                name: name.clone(),
                version: pin.version.clone(),
            });
            index.insert(name.clone(), idx);
        }
        for (name, pin) in pins {
            let from = index[name];
            for dep in &pin.dependencies {
                if let Some(&to) = index.get(dep) {
                    if !graph.edges(from).any(|e| e.target() == to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }
        let roots = roots.iter().filter_map(|r| index.get(r).copied()).collect();
        Self { graph, index, roots }
    }

    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &ResolvedNode {
        &self.graph[idx]
    }

    /// Direct dependencies of a node, in name order.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Outgoing)
    }

    /// Libraries that depend directly on a node, in name order.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Incoming)
    }

    fn sorted_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.sort_by(|a, b| self.graph[*a].name.cmp(&self.graph[*b].name));
        out
    }

    /// Dependencies first. Tarjan's algorithm yields components in reverse
    /// topological order of the dependent-to-dependency edges.
    pub fn install_order(&self) -> Vec<(String, Version)> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        for mut component in tarjan_scc(&self.graph) {
            component.sort_by(|a, b| self.graph[*a].name.cmp(&self.graph[*b].name));
            for idx in component {
                let node = &self.graph[idx];
                order.push((node.name.clone(), node.version.clone()));
            }
        }
        order
    }

    pub fn print_tree(&self) -> String {
        let mut output = String::new();
        for &root in &self.roots {
            output.push_str(&format!("{}\n", self.graph[root]));
            let mut visited = HashSet::new();
            visited.insert(root);
            let deps = self.dependencies_of(root);
            let count = deps.len();
            for (i, child) in deps.into_iter().enumerate() {
                self.print_subtree(&mut output, child, "", i == count - 1, &mut visited);
            }
        }
        output
    }

    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        if !visited.insert(idx) {
            output.push_str(&format!("{prefix}{connector}{node} (*)\n"));
            return;
        }
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, child) in deps.into_iter().enumerate() {
            self.print_subtree(output, child, &child_prefix, i == count - 1, visited);
        }
        visited.remove(&idx);
    }
}
