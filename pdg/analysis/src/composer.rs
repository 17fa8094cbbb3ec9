//! Composition of control- and data-dependence graphs into one program
//! dependence graph.
use crate::analysis::{Analysis, Named};
use crate::context::Context;
use pdg_graph::{BlockRef, DependencyGraph, DependencyQuery, DependencyType};
use pdg_utils::{Error, PdgResult};
use std::hash::Hash;

/// Default name under which the control-dependence analysis stores its
/// graph.
pub const CONTROL_DEPENDENCE: &str = "control-dependence";
/// Default name under which the data-dependence analysis stores its graph.
pub const DATA_DEPENDENCE: &str = "data-dependence";

/// Merge a control-dependence relation and a data-dependence relation over
/// the same block universe into one program dependence graph.
///
/// For every block `B` that is control-dependent on the `cdg` root, the
/// result has a virtual-entry→`B` control edge. For every ordered pair
/// `(A, B)` over `blocks`, the result has an `A`→`B` data edge iff
/// `ddg.depends(A, B)` and an `A`→`B` control edge iff `cdg.depends(A, B)`.
/// When both hold, the pair carries two separately tagged edges; callers
/// wanting a merged tag use [DependencyGraph::link_type].
///
/// Every block receives a node even when no dependency mentions it, and
/// pairs with `A == B` go through the edge layer, whose self-loop
/// suppression drops them. The pair enumeration is quadratic in the block
/// count, which stays cheap at per-procedure scale.
pub fn compose<T, C, D>(blocks: &[T], cdg: &C, ddg: &D) -> DependencyGraph<T>
where
    T: Eq + Hash + Clone,
    C: DependencyQuery<T>,
    D: DependencyQuery<T>,
{
    let mut pdg = DependencyGraph::new();

    // Created first so that the composed graph is rooted at the virtual
    // entry; the per-block resolutions below then cover isolated blocks.
    if !blocks.is_empty() && cdg.root_data().is_some() {
        pdg.get_or_insert(BlockRef::Entry);
    }
    for block in blocks {
        pdg.get_or_insert(BlockRef::Block(block.clone()));
    }

    for a in blocks {
        let from = BlockRef::Block(a.clone());
        if let Some(root) = cdg.root_data() {
            if cdg.depends(root, &from) {
                pdg.add_dependency(
                    BlockRef::Entry,
                    from.clone(),
                    DependencyType::Control,
                );
            }
        }
        for b in blocks {
            let to = BlockRef::Block(b.clone());
            if ddg.depends(&from, &to) {
                pdg.add_dependency(
                    from.clone(),
                    to.clone(),
                    DependencyType::Data,
                );
            }
            if cdg.depends(&from, &to) {
                pdg.add_dependency(
                    from.clone(),
                    to,
                    DependencyType::Control,
                );
            }
        }
    }
    pdg
}

/// The composer packaged as a pipeline analysis. Looks up the control- and
/// data-dependence graphs deposited by earlier analyses, composes them
/// over the procedure's block list, and stores the program dependence
/// graph under its own name.
pub struct ProgramDependence {
    cdg: String,
    ddg: String,
}

impl ProgramDependence {
    /// Compose the graphs registered under the two given analysis names.
    pub fn new(cdg: impl Into<String>, ddg: impl Into<String>) -> Self {
        ProgramDependence {
            cdg: cdg.into(),
            ddg: ddg.into(),
        }
    }
}

impl Default for ProgramDependence {
    fn default() -> Self {
        ProgramDependence::new(CONTROL_DEPENDENCE, DATA_DEPENDENCE)
    }
}

impl Named for ProgramDependence {
    fn name() -> &'static str {
        "program-dependence"
    }

    fn description() -> &'static str {
        "compose control- and data-dependence graphs into a program \
         dependence graph"
    }
}

impl Analysis for ProgramDependence {
    fn run(&mut self, ctx: &mut Context) -> PdgResult<()> {
        let cdg = ctx.graph(&self.cdg).ok_or_else(|| {
            Error::misc(format!(
                "`{}` requires `{}` to run first",
                Self::name(),
                self.cdg
            ))
        })?;
        let ddg = ctx.graph(&self.ddg).ok_or_else(|| {
            Error::misc(format!(
                "`{}` requires `{}` to run first",
                Self::name(),
                self.ddg
            ))
        })?;
        log::debug!(
            "composing `{}` and `{}` over {} blocks of `{}`",
            self.cdg,
            self.ddg,
            ctx.procedure().blocks().len(),
            ctx.procedure().name()
        );
        let pdg = compose(ctx.procedure().blocks(), cdg, ddg);
        ctx.insert_graph(Self::name(), pdg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::compose;
    use pdg_graph::{BlockRef, DependencyGraph, DependencyType};

    fn block(name: &'static str) -> BlockRef<&'static str> {
        BlockRef::Block(name)
    }

    /// CDG with root→b1 and b1→b2 control edges; DDG with a b1→b2 data
    /// edge. The composed graph carries the entry edge plus both tags on
    /// the b1→b2 pair.
    #[test]
    fn composes_entry_control_and_data_edges() {
        let blocks = ["b1", "b2"];

        let mut cdg = DependencyGraph::new();
        cdg.add_dependency(
            BlockRef::Entry,
            block("b1"),
            DependencyType::Control,
        );
        cdg.add_dependency(block("b1"), block("b2"), DependencyType::Control);

        let mut ddg = DependencyGraph::new();
        ddg.add_dependency(block("b1"), block("b2"), DependencyType::Data);

        let pdg = compose(&blocks, &cdg, &ddg);

        assert!(pdg.depends(&BlockRef::Entry, &block("b1")));
        assert!(pdg.depends(&block("b1"), &block("b2")));
        assert!(!pdg.depends(&block("b2"), &block("b1")));
        assert_eq!(
            pdg.link_type(&BlockRef::Entry, &block("b1")),
            Some(DependencyType::Control)
        );
        assert_eq!(
            pdg.link_type(&block("b1"), &block("b2")),
            Some(DependencyType::DataAndControl)
        );
        // Virtual entry first, then both blocks: exactly three nodes.
        assert_eq!(pdg.len(), 3);
        assert_eq!(pdg.root_data(), Some(&BlockRef::Entry));
    }

    /// Every edge in the composition is justified by a query on the input
    /// relations, and every query hit shows up as an edge.
    #[test]
    fn composition_is_sound_and_complete() {
        let blocks = ["b0", "b1", "b2", "b3"];

        let mut cdg = DependencyGraph::new();
        cdg.add_dependency(
            BlockRef::Entry,
            block("b0"),
            DependencyType::Control,
        );
        cdg.add_dependency(block("b0"), block("b1"), DependencyType::Control);
        cdg.add_dependency(block("b0"), block("b2"), DependencyType::Control);

        let mut ddg = DependencyGraph::new();
        ddg.add_dependency(block("b1"), block("b0"), DependencyType::Data);
        ddg.add_dependency(block("b2"), block("b1"), DependencyType::Data);

        let pdg = compose(&blocks, &cdg, &ddg);

        for a in blocks {
            assert_eq!(
                pdg.depends(&BlockRef::Entry, &block(a)),
                cdg.depends(&BlockRef::Entry, &block(a)),
                "entry gating mismatch for {}",
                a
            );
            for b in blocks {
                let control = cdg.depends(&block(a), &block(b));
                let data = ddg.depends(&block(a), &block(b));
                let expect = match (control, data) {
                    (true, true) => Some(DependencyType::DataAndControl),
                    (true, false) => Some(DependencyType::Control),
                    (false, true) => Some(DependencyType::Data),
                    (false, false) => None,
                };
                assert_eq!(
                    pdg.link_type(&block(a), &block(b)),
                    expect,
                    "pair ({}, {})",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn no_blocks_no_graph() {
        let blocks: [&str; 0] = [];
        let cdg: DependencyGraph<&str> = DependencyGraph::new();
        let ddg: DependencyGraph<&str> = DependencyGraph::new();
        let pdg = compose(&blocks, &cdg, &ddg);
        assert!(pdg.is_empty());
        assert_eq!(pdg.root(), None);
    }

    /// Blocks mentioned by neither relation still get nodes.
    #[test]
    fn isolated_blocks_are_represented() {
        let blocks = ["b0", "b1", "orphan"];

        let mut cdg = DependencyGraph::new();
        cdg.add_dependency(
            BlockRef::Entry,
            block("b0"),
            DependencyType::Control,
        );
        let mut ddg = DependencyGraph::new();
        ddg.add_dependency(block("b1"), block("b0"), DependencyType::Data);

        let pdg = compose(&blocks, &cdg, &ddg);
        assert!(pdg.find(&block("orphan")).is_some());
        assert!(!pdg.depends(&block("orphan"), &block("b0")));
    }

    /// Empty input relations still produce a node per block, but no root
    /// entry node and no edges.
    #[test]
    fn empty_relations_yield_edgeless_graph() {
        let blocks = ["b0", "b1"];
        let cdg: DependencyGraph<&str> = DependencyGraph::new();
        let ddg: DependencyGraph<&str> = DependencyGraph::new();
        let pdg = compose(&blocks, &cdg, &ddg);
        assert_eq!(pdg.len(), 2);
        assert_eq!(pdg.root_data(), Some(&block("b0")));
        assert!(pdg.find(&BlockRef::Entry).is_none());
    }
}
