//! Random walk generation (uniform steps with restart).
//!
//! A walk starts at a vertex and, at every step, either jumps back to the start (with
//! probability `alpha`) or moves to a uniformly chosen neighbor of the current vertex. A
//! vertex with no neighbors ends the walk early; that is a truncation, not an error.

use crate::graph::{Graph, GraphRef, Vertex};
use crate::{Error, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// One walk: vertex labels in visitation order, starting at the start vertex.
pub type Walk = Vec<Vertex>;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkConfig {
    /// Maximum walk length (in vertices, including the start).
    pub length: usize,
    /// Number of walks started from every vertex.
    pub walks_per_node: usize,
    /// Restart probability.
    pub alpha: f64,
    /// Seed for the entry points that own their rng (`WalkConfig::rng`, disk workers).
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { length: 40, walks_per_node: 10, alpha: 0.0, seed: 0 }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<()> {
        validate_walk_params(self.length, self.alpha)
    }

    /// Deterministic rng seeded from `self.seed`.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

fn validate_walk_params(length: usize, alpha: f64) -> Result<()> {
    if length == 0 {
        return Err(Error::InvalidParameter("walk length must be at least 1".into()));
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidParameter(format!(
            "alpha must be in [0, 1], got {alpha}"
        )));
    }
    Ok(())
}

const MAX_RESERVED_WALK: usize = 1024;

/// Generate one walk from `start`.
///
/// Fails with `VertexNotFound` before drawing anything if `start` is not in the graph.
pub fn generate_walk<R: Rng>(
    graph: &Graph,
    start: Vertex,
    length: usize,
    alpha: f64,
    rng: &mut R,
) -> Result<Walk> {
    validate_walk_params(length, alpha)?;
    let node = graph.index_of(start).ok_or(Error::VertexNotFound(start))?;
    let mut walk = Vec::with_capacity(walk_capacity(length));
    restart_walk(graph, node, length, alpha, rng, &mut walk);
    Ok(walk)
}

/// Walks stop early at dead ends, so `length` is only an upper bound on what gets pushed.
fn walk_capacity(length: usize) -> usize {
    length.min(MAX_RESERVED_WALK)
}

/// Fill `walk` with a walk from dense index `start`, reusing its allocation.
fn restart_walk<G: GraphRef + ?Sized, R: Rng>(
    graph: &G,
    start: usize,
    length: usize,
    alpha: f64,
    rng: &mut R,
    walk: &mut Vec<Vertex>,
) {
    walk.clear();
    walk.push(graph.label(start));
    let mut curr = start;
    while walk.len() < length {
        let nbrs = graph.neighbors_ref(curr);
        if nbrs.is_empty() {
            break;
        }
        curr = if rng.random::<f64>() < alpha {
            start
        } else {
            nbrs[rng.random_range(0..nbrs.len())]
        };
        walk.push(graph.label(curr));
    }
}

/// Build the whole corpus in memory: `walks_per_node` passes over all vertices, each pass
/// in a freshly shuffled order.
pub fn build_corpus<G: GraphRef + ?Sized, R: Rng>(
    graph: &G,
    config: WalkConfig,
    rng: &mut R,
) -> Result<Vec<Walk>> {
    let mut walks = Vec::with_capacity(graph.node_count().saturating_mul(config.walks_per_node));
    stream_corpus(graph, config, rng, |walk| {
        walks.push(walk.to_vec());
        Ok(())
    })?;
    Ok(walks)
}

/// In-memory corpus restricted to an explicit set of start vertices.
///
/// This is the sharding / delta primitive: regenerate walks only for the vertices whose
/// neighborhood changed. Duplicated start vertices get walks per occurrence.
pub fn build_corpus_from_nodes<R: Rng>(
    graph: &Graph,
    start_nodes: &[Vertex],
    config: WalkConfig,
    rng: &mut R,
) -> Result<Vec<Walk>> {
    let order = start_nodes
        .iter()
        .map(|&v| graph.index_of(v).ok_or(Error::VertexNotFound(v)))
        .collect::<Result<Vec<usize>>>()?;
    let mut walks = Vec::with_capacity(order.len().saturating_mul(config.walks_per_node));
    stream_from_order(graph, order, config, rng, |walk| {
        walks.push(walk.to_vec());
        Ok(())
    })?;
    Ok(walks)
}

/// Streaming form of [`build_corpus`]: same walks in the same order, handed to `sink` as
/// borrowed slices of one reused buffer.
///
/// The first error returned by `sink` stops generation and is returned.
pub fn stream_corpus<G, R, F>(graph: &G, config: WalkConfig, rng: &mut R, sink: F) -> Result<()>
where
    G: GraphRef + ?Sized,
    R: Rng,
    F: FnMut(&[Vertex]) -> Result<()>,
{
    let order: Vec<usize> = (0..graph.node_count()).collect();
    stream_from_order(graph, order, config, rng, sink)
}

fn stream_from_order<G, R, F>(
    graph: &G,
    mut order: Vec<usize>,
    config: WalkConfig,
    rng: &mut R,
    mut sink: F,
) -> Result<()>
where
    G: GraphRef + ?Sized,
    R: Rng,
    F: FnMut(&[Vertex]) -> Result<()>,
{
    config.validate()?;
    let mut walk = Vec::with_capacity(walk_capacity(config.length));
    for _ in 0..config.walks_per_node {
        // Shuffles compound across passes; each pass sees a different order.
        order.shuffle(rng);
        for &node in &order {
            restart_walk(graph, node, config.length, config.alpha, rng, &mut walk);
            sink(&walk)?;
        }
    }
    Ok(())
}

fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

/// Seed for disk worker `worker` of a run seeded with `seed`.
///
/// SplitMix64 output at stream position `worker + 1`: distinct per worker, stable across
/// runs, and independent of how many workers there are.
pub fn worker_seed(seed: u64, worker: usize) -> u64 {
    const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;
    mix64(seed.wrapping_add((worker as u64).wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
}
