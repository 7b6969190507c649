//! Read a graph from a plain text adjacency list
//!
//! Each line is a vertex label followed by the labels it points to, separated
//! by whitespace:
//!
//! ```text
//! # comment
//! a b c
//! b c
//! c a
//! ```
//!
//! Lines starting with `#` are comments. Labels are arbitrary tokens without
//! whitespace (including `c`); they get dense ids in the order they're first seen, whether as a source or
//! as a neighbor. A label may head more than one line, in which case the
//! neighbors are appended.

use crate::data::*;
use crate::graph::AdjacencyList;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::Path;

/// The graph, plus the label of every vertex (indexed by vertex id)
pub type Labeled = (AdjacencyList, IndexMap<String, VertexId>);

pub fn read_from_file(path: impl AsRef<Path>) -> Result<Labeled> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}

pub fn read(reader: impl BufRead) -> Result<Labeled> {
    let mut labels: IndexMap<String, VertexId> = IndexMap::new();
    let mut neighbors: Vec<Vec<VertexId>> = Vec::new();

    let mut intern = |label: &str, neighbors: &mut Vec<Vec<VertexId>>| -> VertexId {
        if let Some(&id) = labels.get(label) {
            return id;
        }
        let id = VertexId::from_index(labels.len());
        labels.insert(label.to_owned(), id);
        neighbors.push(Vec::new());
        id
    };

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let src = match tokens.next() {
            Some(label) => intern(label, &mut neighbors),
            // blank line
            None => continue,
        };
        for label in tokens {
            let dst = intern(label, &mut neighbors);
            neighbors[src.0 as usize].push(dst);
        }
    }

    log::info!(
        "Read {} vertices and {} edges",
        labels.len(),
        neighbors.iter().map(Vec::len).sum::<usize>()
    );

    Ok((AdjacencyList::new(neighbors), labels))
}
