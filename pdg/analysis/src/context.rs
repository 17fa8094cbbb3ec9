//! State threaded through an analysis plan.
use linked_hash_map::LinkedHashMap;
use pdg_graph::DependencyGraph;
use pdg_utils::Id;

/// An ordered, finite sequence of basic-block identities making up one
/// procedure. This is the only view of the subject program the pipeline
/// needs; instruction-level contents stay with the host compiler.
#[derive(Debug, Clone)]
pub struct Procedure {
    name: Id,
    blocks: Vec<Id>,
}

impl Procedure {
    pub fn new(name: impl Into<Id>, blocks: Vec<Id>) -> Self {
        Procedure {
            name: name.into(),
            blocks,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// The procedure's basic blocks in program order.
    pub fn blocks(&self) -> &[Id] {
        &self.blocks
    }
}

/// One procedure plus every dependency graph produced for it so far, keyed
/// by the name of the analysis that produced it.
///
/// Analyses communicate exclusively through this value: a producer stores
/// its graph under its own name and a consumer looks the graph up by that
/// name. The map remembers insertion order so that iterating over results
/// is deterministic.
pub struct Context {
    procedure: Procedure,
    graphs: LinkedHashMap<String, DependencyGraph<Id>>,
}

impl Context {
    pub fn new(procedure: Procedure) -> Self {
        Context {
            procedure,
            graphs: LinkedHashMap::new(),
        }
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    /// Deposit the result of an analysis. Re-running an analysis replaces
    /// its previous graph.
    pub fn insert_graph(
        &mut self,
        name: impl Into<String>,
        graph: DependencyGraph<Id>,
    ) {
        self.graphs.insert(name.into(), graph);
    }

    /// The graph stored by the named analysis, if it has run.
    pub fn graph(&self, name: &str) -> Option<&DependencyGraph<Id>> {
        self.graphs.get(name)
    }

    /// All stored graphs in the order their analyses ran.
    pub fn graphs(
        &self,
    ) -> impl Iterator<Item = (&str, &DependencyGraph<Id>)> {
        self.graphs.iter().map(|(name, graph)| (name.as_str(), graph))
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, Procedure};
    use pdg_graph::DependencyGraph;
    use pdg_utils::Id;

    #[test]
    fn graphs_keep_run_order() {
        let proc =
            Procedure::new("main", vec![Id::new("b0"), Id::new("b1")]);
        let mut ctx = Context::new(proc);
        ctx.insert_graph("data-dependence", DependencyGraph::new());
        ctx.insert_graph("control-dependence", DependencyGraph::new());
        let names: Vec<_> = ctx.graphs().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["data-dependence", "control-dependence"]);
    }

    #[test]
    fn rerun_replaces_graph() {
        let mut ctx = Context::new(Procedure::new("main", vec![]));
        ctx.insert_graph("control-dependence", DependencyGraph::new());
        let mut replacement = DependencyGraph::new();
        replacement.get_or_insert(pdg_graph::BlockRef::Entry);
        ctx.insert_graph("control-dependence", replacement);
        assert_eq!(ctx.graph("control-dependence").unwrap().len(), 1);
        assert!(ctx.graph("program-dependence").is_none());
    }
}
