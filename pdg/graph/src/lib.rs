//! Dependency graphs over the basic blocks of a single procedure.
//!
//! A [DependencyGraph] records which blocks a given block depends on and
//! whether each dependency is a control or a data dependency. Graphs are
//! built once by an analysis and then used read-only: queried through
//! [DependencyQuery], walked through [Traversable] adapters, or rendered
//! with [Printer].

mod graph;
mod printer;
mod traversal;

pub use graph::{
    BlockRef, DependencyGraph, DependencyQuery, DependencyType, Link,
};
pub use printer::Printer;
pub use traversal::{depth_first, GraphAdapter, Traversable};
