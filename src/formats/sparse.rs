//! Sparse adjacency matrices in coordinate (COO) form.

use crate::graph::{Graph, Vertex};
use crate::{Error, Result};

/// Build a graph from the nonzero coordinates `(rows[k], cols[k])` of an adjacency matrix.
///
/// Only vertices with at least one entry appear. A length mismatch is reported at the first
/// unpaired entry (1-based).
pub fn from_sparse_coo(rows: &[Vertex], cols: &[Vertex], undirected: bool) -> Result<Graph> {
    if rows.len() != cols.len() {
        return Err(Error::Format {
            format: "sparse",
            line: rows.len().min(cols.len()) + 1,
            message: format!(
                "row and column arrays differ in length ({} vs {})",
                rows.len(),
                cols.len()
            ),
        });
    }
    let mut graph = Graph::directed();
    for (&i, &j) in rows.iter().zip(cols) {
        graph.add_edge(i, j);
    }
    if undirected {
        graph.make_undirected();
    } else {
        graph.make_consistent();
    }
    Ok(graph)
}
