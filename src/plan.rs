//! Choosing where a corpus lives.
//!
//! The in-memory vs on-disk decision is an explicit, inspectable step: estimate the corpus
//! size, compare it to a budget, then hand the resulting [`Materialization`] to
//! [`Corpus::materialize`].

use crate::frequency::{
    count_vertex_frequencies, count_walk_frequencies, degree_frequencies, FrequencySource,
    VertexCounts,
};
use crate::graph::{Graph, GraphRef};
use crate::random_walk::{build_corpus, Walk, WalkConfig};
use crate::serialized::{write_walks_to_disk, DiskConfig, WalkFiles};
use crate::{Error, Result};
use std::path::Path;

/// Estimated number of vertex tokens in a corpus: `vertices * walks_per_node * walk_length`.
///
/// An upper bound (dead ends shorten walks); saturates instead of overflowing.
pub fn estimated_corpus_tokens(
    num_vertices: usize,
    walks_per_node: usize,
    walk_length: usize,
) -> u64 {
    (num_vertices as u64)
        .saturating_mul(walks_per_node as u64)
        .saturating_mul(walk_length as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    InMemory,
    OnDisk,
}

/// Largest corpus, in tokens, that may be held in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryBudget {
    pub max_tokens: u64,
}

impl Default for MemoryBudget {
    fn default() -> Self {
        Self { max_tokens: 1_000_000_000 }
    }
}

impl MemoryBudget {
    /// On disk iff the estimated token count exceeds the budget.
    pub fn choose(&self, num_vertices: usize, config: &WalkConfig) -> Materialization {
        let tokens = estimated_corpus_tokens(num_vertices, config.walks_per_node, config.length);
        if tokens > self.max_tokens {
            Materialization::OnDisk
        } else {
            Materialization::InMemory
        }
    }
}

/// A generated corpus in either of its physical forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Corpus {
    InMemory(Vec<Walk>),
    OnDisk(WalkFiles),
}

impl Corpus {
    /// Generate the corpus the way `how` says.
    ///
    /// In memory, walks come from a rng seeded with `config.seed`; on disk, from per-worker
    /// seeds derived from it. The two corpora are statistically alike but not identical.
    /// `prefix` and `disk` are ignored for `Materialization::InMemory`.
    pub fn materialize<G>(
        graph: &G,
        config: WalkConfig,
        how: Materialization,
        prefix: &Path,
        disk: DiskConfig,
    ) -> Result<Self>
    where
        G: GraphRef + Sync + ?Sized,
    {
        match how {
            Materialization::InMemory => {
                let mut rng = config.rng();
                Ok(Self::InMemory(build_corpus(graph, config, &mut rng)?))
            }
            Materialization::OnDisk => Ok(Self::OnDisk(WalkFiles::new(write_walks_to_disk(
                graph, prefix, config, disk,
            )?))),
        }
    }

    pub fn materialization(&self) -> Materialization {
        match self {
            Self::InMemory(_) => Materialization::InMemory,
            Self::OnDisk(_) => Materialization::OnDisk,
        }
    }

    /// Every walk, one at a time; disk corpora are read lazily.
    pub fn walks(&self) -> Box<dyn Iterator<Item = Result<Walk>> + '_> {
        match self {
            Self::InMemory(walks) => Box::new(walks.iter().cloned().map(Ok::<Walk, Error>)),
            Self::OnDisk(files) => Box::new(files.iter()),
        }
    }

    /// Vocabulary counts from the source the caller selected.
    ///
    /// `parallelism` bounds concurrent file scans for on-disk corpora.
    pub fn vertex_frequencies(
        &self,
        source: FrequencySource,
        graph: &Graph,
        parallelism: usize,
    ) -> Result<VertexCounts> {
        match source {
            FrequencySource::Degree => degree_frequencies(graph, graph.vertices().iter().copied()),
            FrequencySource::Corpus => match self {
                Self::InMemory(walks) => Ok(count_walk_frequencies(walks)),
                Self::OnDisk(files) => count_vertex_frequencies(files.paths(), parallelism),
            },
        }
    }
}
