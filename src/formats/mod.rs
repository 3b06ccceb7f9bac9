//! Graph construction adapters.
//!
//! Each adapter only inserts edges and then finishes the graph (`make_consistent`, or
//! `make_undirected` when asked), so every adapter returns a graph satisfying the
//! [`Graph`] invariants. Malformed input fails with [`Error::Format`] before any walk can be
//! generated; nothing is repaired.
//!
//! - [`parse_adjacency_list`] - `v n1 n2 ...` per line
//! - [`parse_edge_list`] - `u v [ignored...]` per line
//! - [`from_sparse_coo`] - nonzero coordinates of a sparse adjacency matrix
//! - [`clique`] - complete graph, mostly for tests and benchmarks
//! - `from_petgraph` - bridge from `petgraph::Graph` (feature `petgraph`)

mod adjlist;
mod edgelist;
mod sparse;

pub use adjlist::parse_adjacency_list;
pub use edgelist::parse_edge_list;
pub use sparse::from_sparse_coo;

use crate::graph::{Graph, Vertex};
use crate::{Error, Result};

fn parse_id(format: &'static str, line: usize, token: &str) -> Result<Vertex> {
    token.parse().map_err(|_| Error::Format {
        format,
        line,
        message: format!("{token:?} is not a vertex id"),
    })
}

/// `true` for lines carrying no graph data.
fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Complete undirected graph on vertices `1..=size`.
pub fn clique(size: u64) -> Graph {
    let mut graph = Graph::undirected();
    for u in 1..=size {
        graph.add_vertex(u);
        for v in (u + 1)..=size {
            graph.add_edge(u, v);
        }
    }
    graph.make_consistent();
    graph
}

/// Build a graph from a `petgraph::Graph`, labelling vertices by `NodeIndex::index()`.
///
/// Undirected petgraph graphs always yield undirected graphs; directed ones are mirrored
/// only when `undirected` is set.
#[cfg(feature = "petgraph")]
pub fn from_petgraph<N, E, Ty, Ix>(source: &petgraph::Graph<N, E, Ty, Ix>, undirected: bool) -> Graph
where
    Ty: petgraph::EdgeType,
    Ix: petgraph::graph::IndexType,
{
    use petgraph::visit::EdgeRef;

    let mut graph = if source.is_directed() {
        Graph::directed()
    } else {
        Graph::undirected()
    };
    for node in source.node_indices() {
        graph.add_vertex(node.index() as Vertex);
    }
    for edge in source.edge_references() {
        graph.add_edge(edge.source().index() as Vertex, edge.target().index() as Vertex);
    }
    if undirected {
        graph.make_undirected();
    } else {
        graph.make_consistent();
    }
    graph
}
