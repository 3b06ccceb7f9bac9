//! Edge-list text: `u v` per line, further columns (weights) ignored.

use super::{is_skippable, parse_id};
use crate::graph::Graph;
use crate::{Error, Result};
use std::io::BufRead;

const FORMAT: &str = "edgelist";

/// Parse an edge list. Blank lines and `#` comments are skipped.
pub fn parse_edge_list<R: BufRead>(reader: R, undirected: bool) -> Result<Graph> {
    let mut graph = if undirected {
        Graph::undirected()
    } else {
        Graph::directed()
    };
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if is_skippable(line) {
            continue;
        }
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();
        let (Some(u), Some(v)) = (tokens.next(), tokens.next()) else {
            return Err(Error::Format {
                format: FORMAT,
                line: line_no,
                message: "expected two vertex ids".into(),
            });
        };
        graph.add_edge(parse_id(FORMAT, line_no, u)?, parse_id(FORMAT, line_no, v)?);
    }
    graph.make_consistent();
    Ok(graph)
}
