//! `walkcorpus`: random-walk corpora for vertex embeddings (DeepWalk-style).
//!
//! Walks are "sentences", vertices are "words". This crate builds the sentences;
//! the skip-gram trainer that consumes them lives elsewhere.
//!
//! Public invariants (must not drift):
//! - **Start**: every walk begins at the vertex it was started from.
//! - **Length**: a walk is never longer than `WalkConfig::length`, and is shorter only when
//!   it reached a vertex with no neighbors.
//! - **Determinism**: for a fixed graph, config and seed, the in-memory corpus and the set of
//!   files written to disk (including their contents) are identical across runs, independent
//!   of thread scheduling.
//! - **Corpus size**: `walks_per_node * num_nodes` walks, whichever way the corpus is stored.
//!
//! Swappable (allowed to change without breaking the contract):
//! - the worker pool implementation
//! - buffering and file I/O details
//! - internal graph storage (so long as neighbor order after `make_consistent` is ascending)

pub mod formats;
pub mod frequency;
pub mod graph;
pub mod plan;
pub mod random_walk;
pub mod serialized;

#[cfg(feature = "petgraph")]
pub use formats::from_petgraph;
pub use formats::{clique, from_sparse_coo, parse_adjacency_list, parse_edge_list};
pub use frequency::{
    count_vertex_frequencies, count_walk_frequencies, degree_frequencies, FrequencySource,
    VertexCounts,
};
pub use graph::{Graph, GraphRef, Vertex};
pub use plan::{estimated_corpus_tokens, Corpus, Materialization, MemoryBudget};
pub use random_walk::{
    build_corpus, build_corpus_from_nodes, generate_walk, stream_corpus, worker_seed, Walk,
    WalkConfig,
};
pub use serialized::{count_lines, partition_walks, write_walks_to_disk, DiskConfig, WalkFiles};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vertex not found: {0}")]
    VertexNotFound(Vertex),
    #[error("vertex {0} has no neighbors")]
    NoNeighbors(Vertex),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("malformed {format} input at line {line}: {message}")]
    Format {
        format: &'static str,
        line: usize,
        message: String,
    },
    #[error("malformed walk in {} at line {line}: {token:?} is not a vertex id", .path.display())]
    MalformedWalk {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("walk file {}: {source}", .path.display())]
    CorpusFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
