//! Disk-backed corpora.
//!
//! Corpora too large for memory are split by walk repeats across a fixed pool of workers.
//! Each worker owns its rng, its buffer and its output file; the graph is the only shared
//! state and is only read. Files hold one walk per line as space-separated decimal labels.

use crate::graph::{GraphRef, Vertex};
use crate::random_walk::{stream_corpus, worker_seed, Walk, WalkConfig};
use crate::{Error, Result};
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiskConfig {
    /// Size of the worker pool, and the number of partitions.
    pub workers: usize,
    /// When false, a worker whose file already holds the expected number of lines is skipped.
    pub always_rebuild: bool,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self { workers: 1, always_rebuild: true }
    }
}

/// Split `walks_per_node` repeats into at most `workers` near-equal partitions.
///
/// The remainder goes one-per-worker to the leading workers (10 over 3 is `[4, 3, 3]`).
/// Empty partitions are dropped, so there are never more partitions than repeats.
pub fn partition_walks(walks_per_node: usize, workers: usize) -> Vec<usize> {
    if workers == 0 {
        return Vec::new();
    }
    let base = walks_per_node / workers;
    let rem = walks_per_node % workers;
    (0..workers)
        .map(|i| base + usize::from(i < rem))
        .filter(|&count| count > 0)
        .collect()
}

/// Path of worker `worker`'s file: `<prefix>.<worker>`.
pub fn shard_path(prefix: &Path, worker: usize) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!(".{worker}"));
    PathBuf::from(name)
}

/// Generate the corpus across `disk.workers` parallel workers, one file per partition.
///
/// Worker `i` walks with a `ChaCha8Rng` seeded by `worker_seed(config.seed, i)`, so the
/// files and their contents are reproducible regardless of scheduling. Returns once every
/// worker has flushed its file, with paths in partition order. The first worker error fails
/// the whole call; files already written are left in place.
///
/// Files are named `<prefix>.<worker>` rather than by partition size, since equal-sized
/// partitions (10 over 3 is `[4, 3, 3]`) would share a name.
pub fn write_walks_to_disk<G>(
    graph: &G,
    prefix: impl AsRef<Path>,
    config: WalkConfig,
    disk: DiskConfig,
) -> Result<Vec<PathBuf>>
where
    G: GraphRef + Sync + ?Sized,
{
    config.validate()?;
    if disk.workers == 0 {
        return Err(Error::InvalidParameter("workers must be at least 1".into()));
    }
    let prefix = prefix.as_ref();
    let partitions = partition_walks(config.walks_per_node, disk.workers);
    let num_nodes = graph.node_count();

    info!(
        prefix = %prefix.display(),
        nodes = num_nodes,
        walks_per_node = config.walks_per_node,
        partitions = partitions.len(),
        "writing walk corpus to disk"
    );
    let started = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(disk.workers)
        .build()?;
    let files = pool.install(|| {
        partitions
            .par_iter()
            .enumerate()
            .map(|(worker, &walks)| -> Result<PathBuf> {
                let path = shard_path(prefix, worker);
                if !disk.always_rebuild
                    && path.is_file()
                    && count_lines(&path)? == walks * num_nodes
                {
                    debug!(path = %path.display(), "reusing complete walk file");
                    return Ok(path);
                }
                let shard = WalkConfig {
                    walks_per_node: walks,
                    seed: worker_seed(config.seed, worker),
                    ..config
                };
                write_shard(graph, &path, shard)?;
                Ok(path)
            })
            .collect::<Result<Vec<PathBuf>>>()
    })?;

    info!(
        files = files.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "walk corpus written"
    );
    Ok(files)
}

fn write_shard<G>(graph: &G, path: &Path, config: WalkConfig) -> Result<()>
where
    G: GraphRef + ?Sized,
{
    let started = Instant::now();
    let file = File::create(path).map_err(|source| corpus_file_error(path, source))?;
    let mut out = BufWriter::new(file);
    let mut rng = config.rng();
    stream_corpus(graph, config, &mut rng, |walk| {
        write_walk(&mut out, walk).map_err(|source| corpus_file_error(path, source))
    })?;
    out.flush().map_err(|source| corpus_file_error(path, source))?;
    debug!(
        path = %path.display(),
        walks = config.walks_per_node * graph.node_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated walk file"
    );
    Ok(())
}

fn write_walk<W: Write>(out: &mut W, walk: &[Vertex]) -> io::Result<()> {
    let mut tokens = walk.iter();
    if let Some(first) = tokens.next() {
        write!(out, "{first}")?;
    }
    for v in tokens {
        write!(out, " {v}")?;
    }
    out.write_all(b"\n")
}

fn corpus_file_error(path: &Path, source: io::Error) -> Error {
    Error::CorpusFile { path: path.to_path_buf(), source }
}

/// Number of lines in `path`; 0 if the file does not exist.
pub fn count_lines(path: impl AsRef<Path>) -> Result<usize> {
    count_matching_lines(path.as_ref(), |_| true)
}

fn is_blank(line: &[u8]) -> bool {
    std::str::from_utf8(line).is_ok_and(|text| text.trim().is_empty())
}

fn count_matching_lines(path: &Path, keep: impl Fn(&[u8]) -> bool) -> Result<usize> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => return Err(corpus_file_error(path, source)),
    };
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut lines = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| corpus_file_error(path, source))?;
        if read == 0 {
            break;
        }
        if keep(&buf) {
            lines += 1;
        }
    }
    Ok(lines)
}

pub(crate) fn parse_vertex(path: &Path, line: usize, token: &str) -> Result<Vertex> {
    token.parse().map_err(|_| Error::MalformedWalk {
        path: path.to_path_buf(),
        line,
        token: token.to_string(),
    })
}

fn parse_walk(path: &Path, line: usize, text: &str) -> Result<Walk> {
    text.split_whitespace()
        .map(|token| parse_vertex(path, line, token))
        .collect()
}

/// The files of a disk-backed corpus, read back as one logical stream of walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkFiles {
    paths: Vec<PathBuf>,
}

impl WalkFiles {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Lazily yield every walk of every file, file by file, line by line.
    ///
    /// Blank lines are skipped. Only one line is held in memory at a time.
    pub fn iter(&self) -> impl Iterator<Item = Result<Walk>> + '_ {
        self.paths.iter().flat_map(|path| read_walks(path))
    }

    /// Total number of walks across all files: non-blank lines, as [`WalkFiles::iter`] yields.
    pub fn count_walks(&self) -> Result<usize> {
        self.paths
            .iter()
            .map(|path| count_matching_lines(path, |line| !is_blank(line)))
            .sum()
    }
}

fn read_walks(path: &Path) -> Box<dyn Iterator<Item = Result<Walk>> + '_> {
    match File::open(path) {
        Ok(file) => Box::new(
            BufReader::new(file)
                .lines()
                .enumerate()
                .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()))
                .map(move |(i, line)| -> Result<Walk> {
                    let text = line.map_err(|source| corpus_file_error(path, source))?;
                    parse_walk(path, i + 1, &text)
                }),
        ),
        Err(source) => Box::new(std::iter::once(Err(corpus_file_error(path, source)))),
    }
}
