//! Index-addressed adjacency graph over integer vertex labels.
//!
//! Vertices carry external `u64` labels but are stored by dense index `0..n`, so a walk step
//! is a slice lookup rather than a hash lookup. After [`Graph::make_consistent`], index order
//! equals ascending label order and every neighbor list is sorted, deduplicated and free of
//! self-loops.

use crate::{Error, Result};
use rand::Rng;
use std::collections::HashMap;

/// External vertex label.
pub type Vertex = u64;

/// A graph view that can return **borrowed** neighbor slices over dense node indices.
///
/// This is the "cache-friendly" adapter the walk engine is generic over: it avoids
/// allocating a new `Vec` on every step of a random walk.
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: usize) -> &[usize];
    fn out_degree(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }
    /// External label of a dense node index. Identity by default.
    fn label(&self, node: usize) -> Vertex {
        node as Vertex
    }
}

/// Adjacency table keyed by vertex label.
///
/// Neighbor sequences may hold duplicates (edge multiplicity) until the graph is made
/// consistent. Every vertex that appears as a neighbor is itself a vertex, possibly with an
/// empty neighbor sequence.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    labels: Vec<Vertex>,
    index: HashMap<Vertex, usize>,
    adj: Vec<Vec<usize>>,
    directed: bool,
}

impl Graph {
    /// Empty graph whose edges are inserted in one direction only.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    /// Empty graph whose edges are materialized in both directions on insertion.
    pub fn undirected() -> Self {
        Self::default()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Register `v` with no outgoing edges; returns its dense index.
    pub fn add_vertex(&mut self, v: Vertex) -> usize {
        if let Some(&i) = self.index.get(&v) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(v);
        self.index.insert(v, i);
        self.adj.push(Vec::new());
        i
    }

    /// Append `v` to `u`'s neighbors (and `u` to `v`'s when undirected).
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) {
        let ui = self.add_vertex(u);
        let vi = self.add_vertex(v);
        self.adj[ui].push(vi);
        if !self.directed {
            self.adj[vi].push(ui);
        }
    }

    /// Renumber vertices into ascending label order, then sort and deduplicate every neighbor
    /// sequence and drop self-loops.
    ///
    /// Idempotent. Returns the vertex processing order (ascending labels).
    pub fn make_consistent(&mut self) -> &[Vertex] {
        let n = self.labels.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_unstable_by_key(|&i| self.labels[i]);

        let mut remap = vec![0usize; n];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = new;
        }

        let mut old_adj = std::mem::take(&mut self.adj);
        let mut adj = Vec::with_capacity(n);
        for (new, &old) in order.iter().enumerate() {
            let mut nbrs: Vec<usize> = std::mem::take(&mut old_adj[old])
                .into_iter()
                .map(|j| remap[j])
                .filter(|&j| j != new)
                .collect();
            nbrs.sort_unstable();
            nbrs.dedup();
            adj.push(nbrs);
        }

        self.labels = order.iter().map(|&i| self.labels[i]).collect();
        self.index = self.labels.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        self.adj = adj;
        &self.labels
    }

    /// Add the reverse of every edge, mark the graph undirected and make it consistent.
    pub fn make_undirected(&mut self) -> &[Vertex] {
        // Only the edges present before this call need mirroring.
        let lens: Vec<usize> = self.adj.iter().map(Vec::len).collect();
        for (u, &len) in lens.iter().enumerate() {
            for k in 0..len {
                let v = self.adj[u][k];
                if v != u {
                    self.adj[v].push(u);
                }
            }
        }
        self.directed = false;
        self.make_consistent()
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Sum of neighbor-sequence lengths, halved for undirected graphs.
    pub fn num_edges(&self) -> usize {
        let total: usize = self.adj.iter().map(Vec::len).sum();
        if self.directed {
            total
        } else {
            total / 2
        }
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.index.contains_key(&v)
    }

    /// Dense index of `v`, if present.
    pub fn index_of(&self, v: Vertex) -> Option<usize> {
        self.index.get(&v).copied()
    }

    /// Vertex labels in index order (ascending once the graph is consistent).
    pub fn vertices(&self) -> &[Vertex] {
        &self.labels
    }

    pub fn neighbors(&self, v: Vertex) -> Result<impl ExactSizeIterator<Item = Vertex> + '_> {
        let i = self.index_of(v).ok_or(Error::VertexNotFound(v))?;
        Ok(self.adj[i].iter().map(move |&j| self.labels[j]))
    }

    pub fn degree(&self, v: Vertex) -> Result<usize> {
        let i = self.index_of(v).ok_or(Error::VertexNotFound(v))?;
        Ok(self.adj[i].len())
    }

    /// Degrees of several vertices at once; fails on the first absent one.
    pub fn degrees<I>(&self, vertices: I) -> Result<HashMap<Vertex, usize>>
    where
        I: IntoIterator<Item = Vertex>,
    {
        vertices
            .into_iter()
            .map(|v| self.degree(v).map(|d| (v, d)))
            .collect()
    }

    pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
        match (self.index_of(u), self.index_of(v)) {
            (Some(ui), Some(vi)) => self.adj[ui].contains(&vi),
            _ => false,
        }
    }

    pub fn has_self_loops(&self) -> bool {
        self.adj
            .iter()
            .enumerate()
            .any(|(i, nbrs)| nbrs.contains(&i))
    }

    /// Uniform draw from `v`'s neighbor sequence (duplicates weigh in).
    pub fn random_neighbor<R: Rng>(&self, v: Vertex, rng: &mut R) -> Result<Vertex> {
        let i = self.index_of(v).ok_or(Error::VertexNotFound(v))?;
        let nbrs = &self.adj[i];
        if nbrs.is_empty() {
            return Err(Error::NoNeighbors(v));
        }
        Ok(self.labels[nbrs[rng.random_range(0..nbrs.len())]])
    }
}

impl GraphRef for Graph {
    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn label(&self, node: usize) -> Vertex {
        self.labels[node]
    }
}
