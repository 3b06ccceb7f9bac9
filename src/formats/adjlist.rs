//! Adjacency-list text: one row per line, the vertex followed by its neighbors.

use super::{is_skippable, parse_id};
use crate::graph::{Graph, Vertex};
use crate::Result;
use rayon::prelude::*;
use std::io::BufRead;

const FORMAT: &str = "adjlist";

/// Lines per parallel parse task.
const CHUNK_SIZE: usize = 10_000;

type Row = (Vertex, Vec<Vertex>);

/// Parse an adjacency list.
///
/// Lines are whitespace-separated vertex ids, the first being the row's vertex. Blank lines
/// and lines starting with `#` are skipped. Chunks of lines are parsed in parallel; rows are
/// inserted in file order, so the result does not depend on scheduling.
pub fn parse_adjacency_list<R: BufRead>(reader: R, undirected: bool) -> Result<Graph> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;

    let chunks = lines
        .par_chunks(CHUNK_SIZE)
        .enumerate()
        .map(|(chunk, lines)| -> Result<Vec<Row>> {
            let mut rows = Vec::with_capacity(lines.len());
            for (offset, line) in lines.iter().enumerate() {
                if let Some(row) = parse_row(line, chunk * CHUNK_SIZE + offset + 1)? {
                    rows.push(row);
                }
            }
            Ok(rows)
        })
        .collect::<Result<Vec<Vec<Row>>>>()?;

    let mut graph = Graph::directed();
    for (v, nbrs) in chunks.into_iter().flatten() {
        graph.add_vertex(v);
        for n in nbrs {
            graph.add_edge(v, n);
        }
    }
    if undirected {
        graph.make_undirected();
    } else {
        graph.make_consistent();
    }
    Ok(graph)
}

fn parse_row(line: &str, line_no: usize) -> Result<Option<Row>> {
    let line = line.trim();
    if is_skippable(line) {
        return Ok(None);
    }
    let mut ids = line.split_whitespace().map(|token| parse_id(FORMAT, line_no, token));
    let Some(vertex) = ids.next().transpose()? else {
        return Ok(None);
    };
    let mut nbrs = ids.collect::<Result<Vec<Vertex>>>()?;
    nbrs.sort_unstable();
    nbrs.dedup();
    Ok(Some((vertex, nbrs)))
}
