use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use std::collections::HashMap;
use std::hash::Hash;

/// Classification of a single dependency edge. The tag labels the edge and
/// never affects node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyType {
    /// The dependent block executes only depending on the outcome of the
    /// dependency block.
    Control,
    /// The dependent block consumes a value produced by the dependency block.
    Data,
    /// Merged tag for block pairs related both ways. The graph never stores
    /// this tag on its own; see [DependencyGraph::link_type].
    DataAndControl,
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyType::Control => write!(f, "control"),
            DependencyType::Data => write!(f, "data"),
            DependencyType::DataAndControl => write!(f, "data+control"),
        }
    }
}

/// Reference to a program element tracked by a [DependencyGraph]: either a
/// real basic block or the virtual entry sentinel standing in for the
/// procedure's entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockRef<T> {
    /// The virtual entry. Control dependencies on procedure entry hang off
    /// this node; it never corresponds to a real block.
    Entry,
    /// A basic block of the procedure.
    Block(T),
}

impl<T: std::fmt::Display> std::fmt::Display for BlockRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockRef::Entry => write!(f, "<entry>"),
            BlockRef::Block(b) => write!(f, "{}", b),
        }
    }
}

/// One typed, directed outgoing edge. Reads "dependent depends on
/// [Link::target]".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Handle of the dependency node.
    pub target: NodeIndex,
    /// Tag recorded for this edge.
    pub ty: DependencyType,
}

/// Narrow query surface consumed by graph composition: a populated
/// dependency relation answers pairwise queries and names its root element.
/// Implemented by [DependencyGraph] and by any analysis result that can
/// answer the same questions.
pub trait DependencyQuery<T> {
    /// True iff a dependency of any type from `dependent` to `dependency`
    /// has been recorded.
    fn depends(&self, dependent: &BlockRef<T>, dependency: &BlockRef<T>)
        -> bool;

    /// The element of the first node this relation created, or `None` if
    /// the relation is empty. Control-dependence analyses create the
    /// virtual entry first, making it their root.
    fn root_data(&self) -> Option<&BlockRef<T>>;
}

/// A dependency graph over one procedure's basic blocks.
///
/// All nodes are owned by the graph: a [petgraph `DiGraph`](DiGraph) acts
/// as the arena and nodes are addressed by stable [NodeIndex] handles. An
/// identity map resolves a [BlockRef] to its node so that lookups never
/// depend on element contents beyond equality and hashing.
///
/// Nodes are created lazily, the first time a reference is resolved for
/// mutation, and are never removed or merged. Edges accumulate under two
/// suppression rules that make the edge list a set:
/// * no edge may point from a node to itself;
/// * no two edges may share the same `(source, target, type)` triple.
#[derive(Debug, Clone)]
pub struct DependencyGraph<T> {
    /// Arena of nodes and typed edges.
    graph: DiGraph<BlockRef<T>, DependencyType>,
    /// Identity map from element reference to its node.
    index_map: HashMap<BlockRef<T>, NodeIndex>,
    /// The first node ever created, conventionally the virtual entry.
    root: Option<NodeIndex>,
}

impl<T: Eq + Hash + Clone> Default for DependencyGraph<T> {
    fn default() -> Self {
        DependencyGraph {
            graph: DiGraph::new(),
            index_map: HashMap::new(),
            root: None,
        }
    }
}

impl<T: Eq + Hash + Clone> DependencyGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `data` to its node, creating and registering the node if this
    /// is the first time the reference is seen. The first node created in a
    /// graph becomes its root. Never fails.
    pub fn get_or_insert(&mut self, data: BlockRef<T>) -> NodeIndex {
        let DependencyGraph {
            graph,
            index_map,
            root,
        } = self;
        let idx = *index_map
            .entry(data)
            .or_insert_with_key(|data| graph.add_node(data.clone()));
        if root.is_none() {
            *root = Some(idx);
        }
        idx
    }

    /// Resolve `data` to its node without creating one. `None` is the
    /// not-found sentinel for graphs that never saw this reference.
    pub fn find(&self, data: &BlockRef<T>) -> Option<NodeIndex> {
        self.index_map.get(data).copied()
    }

    /// Record that `dependent` depends on `dependency`, resolving or
    /// creating nodes for both references.
    ///
    /// This is the sole mutation entry point. Self-loops are silently
    /// dropped, as are edges that exactly duplicate an already recorded
    /// `(target, type)` pair, so repeated discoveries of the same
    /// dependency leave the graph unchanged.
    pub fn add_dependency(
        &mut self,
        dependent: BlockRef<T>,
        dependency: BlockRef<T>,
        ty: DependencyType,
    ) {
        let from = self.get_or_insert(dependent);
        let to = self.get_or_insert(dependency);
        if from == to {
            return;
        }
        let duplicate = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| *edge.weight() == ty);
        if !duplicate {
            self.graph.add_edge(from, to, ty);
        }
    }

    /// True iff the node for `dependent` exists and has an outgoing edge of
    /// any type to the node for `dependency`. Never mutates the graph.
    pub fn depends(
        &self,
        dependent: &BlockRef<T>,
        dependency: &BlockRef<T>,
    ) -> bool {
        match (self.find(dependent), self.find(dependency)) {
            (Some(from), Some(to)) => {
                self.graph.find_edge(from, to).is_some()
            }
            _ => false,
        }
    }

    /// Merged tag across all edges from `dependent` to `dependency`:
    /// [DependencyType::DataAndControl] when both a control and a data edge
    /// were recorded, the single tag when only one was, and `None` when the
    /// pair is unrelated. Stored edges are never merged; this is the
    /// post-processing view over them.
    pub fn link_type(
        &self,
        dependent: &BlockRef<T>,
        dependency: &BlockRef<T>,
    ) -> Option<DependencyType> {
        let from = self.find(dependent)?;
        let to = self.find(dependency)?;
        let mut merged: Option<DependencyType> = None;
        for edge in self.graph.edges_connecting(from, to) {
            merged = Some(match merged {
                None => *edge.weight(),
                Some(ty) if ty == *edge.weight() => ty,
                Some(_) => DependencyType::DataAndControl,
            });
        }
        merged
    }

    /// The root (first-created) node, or `None` for an empty graph.
    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Element of the root node, or `None` for an empty graph.
    pub fn root_data(&self) -> Option<&BlockRef<T>> {
        self.root.map(|idx| &self.graph[idx])
    }

    /// Element associated with a node handle.
    pub fn data(&self, node: NodeIndex) -> &BlockRef<T> {
        &self.graph[node]
    }

    /// All nodes with their elements, in creation order.
    pub fn nodes(
        &self,
    ) -> impl Iterator<Item = (NodeIndex, &BlockRef<T>)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Outgoing links of a node in insertion order. Insertion order matters
    /// for printing and traversal, not for semantic correctness.
    pub fn links(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = Link> + '_ {
        // `edges_directed` walks edges most-recent-first; scanning the
        // arena's edge list keeps insertion order instead.
        self.graph.edge_indices().filter_map(move |edge| {
            let (src, dst) = self.graph.edge_endpoints(edge).unwrap();
            (src == node).then(|| Link {
                target: dst,
                ty: self.graph[edge],
            })
        })
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

impl<T: Eq + Hash + Clone> DependencyQuery<T> for DependencyGraph<T> {
    fn depends(
        &self,
        dependent: &BlockRef<T>,
        dependency: &BlockRef<T>,
    ) -> bool {
        DependencyGraph::depends(self, dependent, dependency)
    }

    fn root_data(&self) -> Option<&BlockRef<T>> {
        DependencyGraph::root_data(self)
    }
}
