use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use walkcorpus::{
    count_lines, count_vertex_frequencies, count_walk_frequencies, write_walks_to_disk,
    DiskConfig, Error, Graph, Vertex, WalkConfig, WalkFiles,
};

fn ring(n: u64) -> Graph {
    let mut g = Graph::undirected();
    for i in 0..n {
        g.add_edge(i, (i + 1) % n);
    }
    g.make_consistent();
    g
}

fn read_all(files: &WalkFiles) -> Vec<Vec<Vertex>> {
    files.iter().collect::<walkcorpus::Result<_>>().unwrap()
}

#[test]
fn partition_sizes_conserve_walk_count() {
    let dir = tempdir().expect("Failed to create temp dir");
    let g = ring(7);
    let cfg = WalkConfig { length: 5, walks_per_node: 10, alpha: 0.0, seed: 0 };
    let disk = DiskConfig { workers: 3, always_rebuild: true };

    let files = write_walks_to_disk(&g, dir.path().join("out.walks"), cfg, disk).unwrap();
    assert_eq!(files.len(), 3);

    let per_file: Vec<usize> = files.iter().map(|f| count_lines(f).unwrap()).collect();
    assert_eq!(per_file, vec![4 * 7, 3 * 7, 3 * 7]);
    assert_eq!(per_file.iter().sum::<usize>(), 10 * 7);
    assert_eq!(WalkFiles::new(files).count_walks().unwrap(), 70);
}

#[test]
fn files_are_named_by_worker_in_partition_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let prefix = dir.path().join("corpus");
    let cfg = WalkConfig { length: 3, walks_per_node: 4, alpha: 0.0, seed: 1 };
    let disk = DiskConfig { workers: 4, always_rebuild: true };

    let files = write_walks_to_disk(&ring(3), &prefix, cfg, disk).unwrap();
    let expected: Vec<PathBuf> = (0..4).map(|i| dir.path().join(format!("corpus.{i}"))).collect();
    assert_eq!(files, expected);
    for f in &files {
        assert!(f.is_file());
    }
}

#[test]
fn more_workers_than_walks_skips_empty_partitions() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cfg = WalkConfig { length: 3, walks_per_node: 2, alpha: 0.0, seed: 1 };
    let disk = DiskConfig { workers: 5, always_rebuild: true };
    let files = write_walks_to_disk(&ring(4), dir.path().join("w"), cfg, disk).unwrap();
    assert_eq!(files.len(), 2);
    assert!(!dir.path().join("w.2").exists());
}

#[test]
fn disk_output_is_deterministic_across_runs() {
    let g = ring(9);
    let cfg = WalkConfig { length: 12, walks_per_node: 6, alpha: 0.25, seed: 77 };

    let a = tempdir().expect("Failed to create temp dir");
    let b = tempdir().expect("Failed to create temp dir");
    let disk = DiskConfig { workers: 3, always_rebuild: true };
    let fa = write_walks_to_disk(&g, a.path().join("x"), cfg, disk).unwrap();
    let fb = write_walks_to_disk(&g, b.path().join("x"), cfg, disk).unwrap();

    for (pa, pb) in fa.iter().zip(&fb) {
        assert_eq!(fs::read(pa).unwrap(), fs::read(pb).unwrap());
    }
}

#[test]
fn walk_files_round_trip_through_reader() {
    let dir = tempdir().expect("Failed to create temp dir");
    let g = ring(5);
    let cfg = WalkConfig { length: 6, walks_per_node: 3, alpha: 0.0, seed: 3 };
    let disk = DiskConfig { workers: 2, always_rebuild: true };
    let files = WalkFiles::new(write_walks_to_disk(&g, dir.path().join("r"), cfg, disk).unwrap());

    let walks = read_all(&files);
    assert_eq!(walks.len(), 15);
    assert!(walks.iter().all(|w| w.len() == 6));
    for w in &walks {
        for win in w.windows(2) {
            assert!(g.has_edge(win[0], win[1]));
        }
    }

    // The file scan and the in-memory count of the same walks agree exactly.
    let scanned = count_vertex_frequencies(files.paths(), 2).unwrap();
    assert_eq!(scanned, count_walk_frequencies(&walks));
    assert_eq!(scanned.values().sum::<u64>(), 15 * 6);
}

#[test]
fn complete_files_are_reused_when_not_rebuilding() {
    let dir = tempdir().expect("Failed to create temp dir");
    let prefix = dir.path().join("keep");
    let g = ring(4);
    let cfg = WalkConfig { length: 4, walks_per_node: 2, alpha: 0.0, seed: 8 };

    let rebuild = DiskConfig { workers: 2, always_rebuild: true };
    let first = write_walks_to_disk(&g, &prefix, cfg, rebuild).unwrap();

    // Replace shard 0 with different content of the right size, and truncate shard 1.
    let sentinel = "0 0 0 0\n".repeat(4);
    fs::write(&first[0], &sentinel).unwrap();
    fs::write(&first[1], "1 2\n").unwrap();

    let reuse = DiskConfig { always_rebuild: false, ..rebuild };
    let second = write_walks_to_disk(&g, &prefix, cfg, reuse).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second[0]).unwrap(), sentinel);
    assert_eq!(count_lines(&second[1]).unwrap(), 4);
}

#[test]
fn unwritable_prefix_fails_the_whole_job() {
    let dir = tempdir().expect("Failed to create temp dir");
    let prefix = dir.path().join("missing").join("sub").join("w");
    let cfg = WalkConfig { length: 3, walks_per_node: 4, alpha: 0.0, seed: 0 };
    let disk = DiskConfig { workers: 2, always_rebuild: true };
    let err = write_walks_to_disk(&ring(3), prefix, cfg, disk).unwrap_err();
    assert!(matches!(err, Error::CorpusFile { .. }), "{err}");
}

#[test]
fn zero_workers_is_invalid() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cfg = WalkConfig::default();
    let disk = DiskConfig { workers: 0, always_rebuild: true };
    let err = write_walks_to_disk(&ring(3), dir.path().join("w"), cfg, disk).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn malformed_walk_file_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let good = dir.path().join("good");
    let bad = dir.path().join("bad");
    fs::write(&good, "1 2 3\n").unwrap();
    fs::write(&bad, "1 2\n3 x 4\n").unwrap();

    let err = count_vertex_frequencies(&[&good, &bad], 2).unwrap_err();
    match err {
        Error::MalformedWalk { path, line, token } => {
            assert_eq!(path, bad);
            assert_eq!(line, 2);
            assert_eq!(token, "x");
        }
        other => panic!("unexpected error: {other}"),
    }

    let files = WalkFiles::new([&good, &bad]);
    let results: Vec<_> = files.iter().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
}

#[test]
fn missing_walk_file_is_an_error_for_counting() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("nope");
    let err = count_vertex_frequencies(&[&missing], 1).unwrap_err();
    assert!(matches!(err, Error::CorpusFile { .. }));
}

#[test]
fn every_vertex_with_edges_appears_in_disk_counts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let g = ring(6);
    let cfg = WalkConfig { length: 5, walks_per_node: 2, alpha: 0.0, seed: 2 };
    let disk = DiskConfig { workers: 2, always_rebuild: true };
    let files = write_walks_to_disk(&g, dir.path().join("c"), cfg, disk).unwrap();
    let counts = count_vertex_frequencies(&files, 2).unwrap();
    let seen: HashSet<Vertex> = counts.keys().copied().collect();
    let all: HashSet<Vertex> = g.vertices().iter().copied().collect();
    assert_eq!(seen, all);
}

#[test]
fn empty_graph_with_reuse_still_writes_its_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cfg = WalkConfig { length: 5, walks_per_node: 4, alpha: 0.0, seed: 0 };
    let disk = DiskConfig { workers: 2, always_rebuild: false };
    let empty = Graph::undirected();
    let files = write_walks_to_disk(&empty, dir.path().join("e"), cfg, disk).unwrap();
    assert_eq!(files.len(), 2);
    for f in &files {
        assert!(f.is_file(), "{} was not written", f.display());
        assert_eq!(count_lines(f).unwrap(), 0);
    }
    assert!(count_vertex_frequencies(&files, 2).unwrap().is_empty());
}

#[test]
fn walk_count_skips_blank_lines_like_the_reader() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("hand");
    fs::write(&path, "1 2\n\n3 4\n   \n5\n").unwrap();

    let files = WalkFiles::new([&path]);
    assert_eq!(count_lines(&path).unwrap(), 5);
    assert_eq!(files.count_walks().unwrap(), 3);
    assert_eq!(read_all(&files).len(), 3);
}
