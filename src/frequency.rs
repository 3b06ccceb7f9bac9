//! Vertex frequency tables (the trainer's vocabulary counts).
//!
//! Counts come either from scanning the corpus or, when the caller explicitly asks for it,
//! from graph degree as a proxy. Neither is a default: which one approximates the walk
//! distribution well enough is the caller's modelling decision.

use crate::graph::{Graph, Vertex};
use crate::random_walk::Walk;
use crate::serialized::parse_vertex;
use crate::{Error, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Occurrence count per vertex.
pub type VertexCounts = HashMap<Vertex, u64>;

/// Where vocabulary counts come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrequencySource {
    /// Count occurrences in the generated walks.
    Corpus,
    /// Use each vertex's degree; never reads walk files.
    Degree,
}

/// Count vertex occurrences across walk files, scanning up to `parallelism` files at once.
///
/// Per-file tables are merged by summation once every scan has finished.
pub fn count_vertex_frequencies<P>(paths: &[P], parallelism: usize) -> Result<VertexCounts>
where
    P: AsRef<Path> + Sync,
{
    if parallelism == 0 {
        return Err(Error::InvalidParameter("parallelism must be at least 1".into()));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()?;
    let partials = pool.install(|| {
        paths
            .par_iter()
            .map(|path| count_file(path.as_ref()))
            .collect::<Result<Vec<VertexCounts>>>()
    })?;

    let mut total = VertexCounts::new();
    for partial in partials {
        merge_counts(&mut total, partial);
    }
    debug!(files = paths.len(), vertices = total.len(), "counted vertex frequencies");
    Ok(total)
}

fn count_file(path: &Path) -> Result<VertexCounts> {
    let file = File::open(path).map_err(|source| Error::CorpusFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut counts = VertexCounts::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| Error::CorpusFile {
            path: path.to_path_buf(),
            source,
        })?;
        for token in line.split_whitespace() {
            *counts.entry(parse_vertex(path, i + 1, token)?).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Add every count of `from` into `into`.
pub fn merge_counts(into: &mut VertexCounts, from: VertexCounts) {
    if into.is_empty() {
        *into = from;
        return;
    }
    for (v, c) in from {
        *into.entry(v).or_insert(0) += c;
    }
}

/// Vertex occurrences in an in-memory corpus.
pub fn count_walk_frequencies(walks: &[Walk]) -> VertexCounts {
    let mut counts = VertexCounts::new();
    for &v in walks.iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Degree of each requested vertex, as a stand-in for its corpus frequency.
///
/// Fails with `VertexNotFound` on the first vertex absent from the graph.
pub fn degree_frequencies<I>(graph: &Graph, vertices: I) -> Result<VertexCounts>
where
    I: IntoIterator<Item = Vertex>,
{
    vertices
        .into_iter()
        .map(|v| graph.degree(v).map(|d| (v, d as u64)))
        .collect()
}
