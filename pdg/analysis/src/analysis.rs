//! Traits implemented by every analysis in the pipeline.
use crate::context::Context;
use pdg_utils::PdgResult;

/// Trait that describes named things. Registration with the
/// [AnalysisManager](crate::manager::AnalysisManager) requires this to be
/// implemented.
///
/// This is separate from [Analysis] because these methods don't receive
/// `self`, which makes [Analysis] usable as a dynamic trait object.
pub trait Named {
    /// The name of the analysis. Doubles as the key its result graph is
    /// stored under in the [Context].
    fn name() -> &'static str;
    /// A short description of the analysis.
    fn description() -> &'static str;
}

/// One analysis over one procedure. An implementation reads the [Context],
/// computes its dependency graph, and deposits the graph under its own
/// name. Implementations for control and data dependence live with the
/// host compiler; this crate only provides the composition analysis.
pub trait Analysis {
    fn run(&mut self, ctx: &mut Context) -> PdgResult<()>;
}
