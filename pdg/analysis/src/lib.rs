//! Dependency analyses over a single procedure.
//!
//! This crate holds the pipeline glue around [pdg_graph]: a [Context]
//! carrying one procedure and the graphs computed for it so far, the
//! [Analysis]/[Named] traits analyses implement, the [AnalysisManager]
//! registry that runs them, and the composition step that merges a
//! control-dependence graph and a data-dependence graph into a program
//! dependence graph.
//!
//! Computing control or data dependence from a control-flow graph is the
//! job of external analyses; anything that deposits a populated
//! [pdg_graph::DependencyGraph] into the context can feed the composer.
//!
//! [Context]: context::Context
//! [Analysis]: analysis::Analysis
//! [Named]: analysis::Named
//! [AnalysisManager]: manager::AnalysisManager

pub mod analysis;
pub mod composer;
pub mod context;
pub mod manager;
