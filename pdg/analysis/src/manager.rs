//! Define the AnalysisManager structure used to register and run the
//! analyses for one procedure.
use crate::analysis::{Analysis, Named};
use crate::context::Context;
use pdg_graph::Printer;
use pdg_utils::{Error, OutputFile, PdgResult};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Top-level type for all analyses that run over a [Context].
pub type AnalysisClosure = Box<dyn Fn(&mut Context) -> PdgResult<()>>;

/// Registry of analyses owned by whatever orchestrates a pipeline. There
/// is no ambient registration: the orchestrator constructs a manager,
/// registers analyses explicitly, and hands the manager the context to run
/// over.
#[derive(Default)]
pub struct AnalysisManager {
    /// All registered analyses keyed by name.
    analyses: HashMap<String, AnalysisClosure>,
    /// Names in registration order; the default plan runs all of them.
    order: Vec<String>,
    // Track the help information for analyses
    help: HashMap<String, String>,
}

impl AnalysisManager {
    /// Register a new analysis and return an error if another analysis
    /// with the same name has already been registered.
    ///
    /// ## Example
    /// ```ignore
    /// let mut mgr = AnalysisManager::default();
    /// mgr.register::<ProgramDependence>()?;
    /// ```
    pub fn register<A>(&mut self) -> PdgResult<()>
    where
        A: Analysis + Named + Default,
    {
        self.register_generic::<A>(Box::new(|ctx| {
            let mut analysis = A::default();
            analysis.run(ctx)
        }))
    }

    fn register_generic<A: Named>(
        &mut self,
        closure: AnalysisClosure,
    ) -> PdgResult<()> {
        let name = A::name().to_string();
        if self.analyses.contains_key(&name) {
            return Err(Error::misc(format!(
                "Analysis with name '{}' is already registered.",
                name
            )));
        }
        self.analyses.insert(name.clone(), closure);
        self.order.push(name.clone());
        self.help
            .insert(name.clone(), format!("- {}: {}", name, A::description()));
        Ok(())
    }

    /// Return the help string for a specific analysis.
    pub fn specific_help(&self, analysis: &str) -> Option<String> {
        self.help.get(analysis).cloned()
    }

    /// Return a string representation of all available analyses.
    /// Appropriate for help text.
    pub fn complete_help(&self) -> String {
        let mut names = self.analyses.keys().collect::<Vec<_>>();
        names.sort();
        let mut ret = String::from("Analyses:\n");
        names.iter().for_each(|&name| {
            ret.push_str(&self.help[name]);
            ret.push('\n');
        });
        ret
    }

    /// Validates that every name in `incl` and `excl` is registered and
    /// resolves the plan: `incl` order when given, registration order
    /// otherwise.
    fn create_plan(
        &self,
        incl: &[String],
        excl: &[String],
    ) -> PdgResult<(Vec<String>, HashSet<String>)> {
        let plan = if incl.is_empty() {
            self.order.clone()
        } else {
            incl.to_vec()
        };
        let excl_set = excl.iter().cloned().collect::<HashSet<String>>();

        plan.iter().chain(excl_set.iter()).try_for_each(|name| {
            if !self.analyses.contains_key(name) {
                Err(Error::misc(format!(
                    "Unknown analysis: {name}. Registered analyses:\n{}",
                    self.complete_help()
                )))
            } else {
                Ok(())
            }
        })?;

        Ok((plan, excl_set))
    }

    /// Executes the plan constructed from the `incl` and `excl` lists over
    /// `ctx`. When `dump` is given, every graph an analysis deposits is
    /// rendered to it right after that analysis runs.
    pub fn execute_plan(
        &self,
        ctx: &mut Context,
        incl: &[String],
        excl: &[String],
        mut dump: Option<OutputFile>,
    ) -> PdgResult<()> {
        let (plan, excl_set) = self.create_plan(incl, excl)?;

        for name in plan {
            if excl_set.contains(&name) {
                log::info!("{name}: Ignored");
                continue;
            }
            // The name is known to exist because create_plan validated it.
            let analysis = &self.analyses[&name];
            let start = Instant::now();
            analysis(ctx)?;
            let elapsed = start.elapsed();
            // Warn if an analysis takes unexpectedly long for a
            // per-procedure computation.
            if elapsed.as_secs() > 5 {
                log::warn!("{name}: {}ms", elapsed.as_millis());
            } else {
                log::info!("{name}: {}ms", elapsed.as_millis());
            }
            if let Some(out) = &mut dump {
                if let Some(graph) = ctx.graph(&name) {
                    Printer::write_graph(graph, &name, &mut out.get_write())?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisManager;
    use crate::analysis::{Analysis, Named};
    use crate::context::{Context, Procedure};
    use pdg_graph::{BlockRef, DependencyGraph, DependencyType};
    use pdg_utils::{Id, PdgResult};

    #[derive(Default)]
    struct FakeControl;

    impl Named for FakeControl {
        fn name() -> &'static str {
            "control-dependence"
        }
        fn description() -> &'static str {
            "stub control-dependence analysis"
        }
    }

    impl Analysis for FakeControl {
        fn run(&mut self, ctx: &mut Context) -> PdgResult<()> {
            let mut graph = DependencyGraph::new();
            graph.get_or_insert(BlockRef::Entry);
            if let Some(&first) = ctx.procedure().blocks().first() {
                graph.add_dependency(
                    BlockRef::Entry,
                    BlockRef::Block(first),
                    DependencyType::Control,
                );
            }
            ctx.insert_graph(Self::name(), graph);
            Ok(())
        }
    }

    fn context() -> Context {
        Context::new(Procedure::new(
            "main",
            vec![Id::new("b0"), Id::new("b1")],
        ))
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut mgr = AnalysisManager::default();
        mgr.register::<FakeControl>().unwrap();
        assert!(mgr.register::<FakeControl>().is_err());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mgr = AnalysisManager::default();
        let mut ctx = context();
        let err = mgr.execute_plan(
            &mut ctx,
            &["missing".to_string()],
            &[],
            None,
        );
        assert!(err.is_err());
    }

    #[test]
    fn default_plan_runs_registered_analyses() {
        let mut mgr = AnalysisManager::default();
        mgr.register::<FakeControl>().unwrap();
        let mut ctx = context();
        mgr.execute_plan(&mut ctx, &[], &[], None).unwrap();
        let cdg = ctx.graph("control-dependence").unwrap();
        assert!(cdg.depends(
            &BlockRef::Entry,
            &BlockRef::Block(Id::new("b0"))
        ));
    }

    #[test]
    fn excluded_analyses_are_skipped() {
        let mut mgr = AnalysisManager::default();
        mgr.register::<FakeControl>().unwrap();
        let mut ctx = context();
        mgr.execute_plan(
            &mut ctx,
            &[],
            &["control-dependence".to_string()],
            None,
        )
        .unwrap();
        assert!(ctx.graph("control-dependence").is_none());
    }

    #[test]
    fn help_lists_registered_analyses() {
        let mut mgr = AnalysisManager::default();
        mgr.register::<FakeControl>().unwrap();
        assert!(mgr
            .complete_help()
            .contains("control-dependence: stub control-dependence analysis"));
        assert!(mgr.specific_help("control-dependence").is_some());
        assert!(mgr.specific_help("nope").is_none());
    }
}
