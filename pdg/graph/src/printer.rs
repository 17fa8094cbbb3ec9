//! Textual rendering of dependency graphs.
use crate::graph::DependencyGraph;
use itertools::Itertools;
use std::hash::Hash;
use std::io;

/// Rule line separating dumps from surrounding driver output.
const BANNER: &str =
    "=============================--------------------------------";

/// Renders dependency graphs deterministically: nodes in creation order,
/// each followed by its outgoing edges in insertion order. Two graphs built
/// with the same insertion sequence produce byte-identical output.
pub struct Printer;

impl Printer {
    /// Write a rendering of `graph` labeled with the caller-supplied `name`.
    ///
    /// The format is a banner, the label, then one indented line per node:
    /// ```text
    /// =============================--------------------------------
    /// program-dependence:
    ///   <entry> -> [b1:control]
    ///   b1 -> [b2:control, b2:data]
    ///   b2 -> []
    /// ```
    pub fn write_graph<T, F>(
        graph: &DependencyGraph<T>,
        name: &str,
        f: &mut F,
    ) -> io::Result<()>
    where
        T: Eq + Hash + Clone + std::fmt::Display,
        F: io::Write,
    {
        writeln!(f, "{}", BANNER)?;
        writeln!(f, "{}:", name)?;
        for (idx, data) in graph.nodes() {
            let links = graph
                .links(idx)
                .map(|link| {
                    format!("{}:{}", graph.data(link.target), link.ty)
                })
                .join(", ");
            writeln!(f, "  {} -> [{}]", data, links)?;
        }
        Ok(())
    }

    /// Convenience wrapper returning the rendering as a `String`.
    pub fn graph_to_str<T>(graph: &DependencyGraph<T>, name: &str) -> String
    where
        T: Eq + Hash + Clone + std::fmt::Display,
    {
        let mut buf = Vec::new();
        Self::write_graph(graph, name, &mut buf)
            .expect("writing to an in-memory buffer cannot fail");
        String::from_utf8(buf).expect("renderings are valid UTF-8")
    }
}
