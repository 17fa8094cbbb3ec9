//! Adapter interface between dependency graphs and generic traversal
//! routines. Algorithms take a [Traversable] view instead of reaching into
//! the container representation.
use crate::graph::DependencyGraph;
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use std::hash::Hash;

/// The view a generic graph walk needs: an entry point, the children of a
/// node, and the full node set. The node set is exposed separately because
/// a dependency graph need not be connected to its root; a block with no
/// recorded dependencies is still a node.
pub trait Traversable {
    /// Entry node for single-rooted traversals, if the graph has one.
    fn entry_node(&self) -> Option<NodeIndex>;

    /// Targets of the node's outgoing edges, ignoring dependency types.
    fn children(&self, node: NodeIndex) -> Vec<NodeIndex>;

    /// Every node in the graph, independent of reachability from the entry.
    fn all_nodes(&self) -> Vec<NodeIndex>;
}

/// [Traversable] view over a [DependencyGraph]. The borrow keeps the graph
/// immutable for as long as a traversal is in flight.
pub struct GraphAdapter<'a, T> {
    graph: &'a DependencyGraph<T>,
}

impl<'a, T> GraphAdapter<'a, T> {
    pub fn new(graph: &'a DependencyGraph<T>) -> Self {
        GraphAdapter { graph }
    }
}

impl<T: Eq + Hash + Clone> Traversable for GraphAdapter<'_, T> {
    fn entry_node(&self) -> Option<NodeIndex> {
        self.graph.root()
    }

    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph.links(node).map(|link| link.target).collect()
    }

    fn all_nodes(&self) -> Vec<NodeIndex> {
        self.graph.nodes().map(|(idx, _)| idx).collect()
    }
}

/// Preorder depth-first walk over `view`.
///
/// Starts from the entry node when one exists and restarts from any node
/// not yet visited, in enumeration order, so disconnected components are
/// always covered. Each node appears exactly once.
pub fn depth_first(view: &dyn Traversable) -> Vec<NodeIndex> {
    let mut seen: HashSet<NodeIndex> = HashSet::new();
    let mut order = Vec::new();

    let roots = view
        .entry_node()
        .into_iter()
        .chain(view.all_nodes())
        .collect::<Vec<_>>();
    for root in roots {
        if seen.contains(&root) {
            continue;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            order.push(node);
            // Reversed so the first-inserted child is visited first.
            for child in view.children(node).into_iter().rev() {
                if !seen.contains(&child) {
                    stack.push(child);
                }
            }
        }
    }
    order
}
