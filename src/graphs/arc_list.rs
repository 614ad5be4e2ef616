/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Reading node sets from textual arc lists.
//!
//! Each line contains an arc, given as a source and a destination separated
//! by whitespace; further columns are ignored. Lines starting with the
//! comment symbol (by default `#`) and blank lines are skipped. Sources
//! should be sorted in non-decreasing order, but this is not required: a
//! warning is logged the first time the order is violated.

use super::node_set::{NodeSet, NodeSetBuilder, MAX_NODES};
use anyhow::{Context, Result};
use dsi_progress_logger::{no_logging, ProgressLog};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while parsing an arc list.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The underlying reader failed.
    #[error("Could not read line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line does not contain two columns.
    #[error("Line {line}: expected a source and a destination, got {content:?}")]
    MissingColumn { line: usize, content: String },

    /// A column is not a non-negative integer.
    #[error("Line {line}: {token:?} is not a valid node identifier")]
    InvalidNode {
        line: usize,
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A node identifier is too large to be stored.
    #[error("Line {line}: node {node} exceeds the largest identity ({})", MAX_NODES - 1)]
    NodeOutOfRange { line: usize, node: usize },

    /// The requested minimum number of nodes is too large to be stored.
    #[error("Cannot allocate {num_nodes} nodes (the maximum is {})", MAX_NODES)]
    TooManyNodes { num_nodes: usize },
}

/// A reader turning a textual arc list into a [`NodeSet`].
#[derive(Debug, Clone)]
pub struct ArcListReader {
    comment_symbol: char,
    num_nodes: Option<usize>,
}

impl Default for ArcListReader {
    fn default() -> Self {
        Self {
            comment_symbol: '#',
            num_nodes: None,
        }
    }
}

impl ArcListReader {
    /// Sets the symbol starting comment lines.
    pub fn comment_symbol(&mut self, comment_symbol: char) -> &mut Self {
        self.comment_symbol = comment_symbol;
        self
    }

    /// Sets a minimum number of nodes, to add isolated nodes at the end of
    /// the identity range.
    pub fn num_nodes(&mut self, num_nodes: Option<usize>) -> &mut Self {
        self.num_nodes = num_nodes;
        self
    }

    /// Parses a single line, returning `None` for comments and blank lines.
    fn parse_line(
        &self,
        line_num: usize,
        line: &str,
    ) -> std::result::Result<Option<(usize, usize)>, ParseError> {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(self.comment_symbol) {
            return Ok(None);
        }

        let mut tokens = trimmed.split_whitespace();
        let (Some(src), Some(dst)) = (tokens.next(), tokens.next()) else {
            return Err(ParseError::MissingColumn {
                line: line_num,
                content: line.to_owned(),
            });
        };

        let parse = |token: &str| -> std::result::Result<usize, ParseError> {
            let node = token
                .parse::<usize>()
                .map_err(|source| ParseError::InvalidNode {
                    line: line_num,
                    token: token.to_owned(),
                    source,
                })?;
            if node >= MAX_NODES {
                return Err(ParseError::NodeOutOfRange {
                    line: line_num,
                    node,
                });
            }
            Ok(node)
        };

        Ok(Some((parse(src)?, parse(dst)?)))
    }

    /// Reads all arcs from `reader` and builds a node set.
    pub fn read(&self, reader: impl BufRead) -> std::result::Result<NodeSet, ParseError> {
        self.read_with_logging(reader, no_logging![])
    }

    /// Reads all arcs from `reader` and builds a node set, logging progress
    /// on `pl`.
    pub fn read_with_logging(
        &self,
        reader: impl BufRead,
        pl: &mut impl ProgressLog,
    ) -> std::result::Result<NodeSet, ParseError> {
        let mut builder = NodeSetBuilder::default();
        if let Some(num_nodes) = self.num_nodes {
            if num_nodes > MAX_NODES {
                return Err(ParseError::TooManyNodes { num_nodes });
            }
            builder.num_nodes(num_nodes);
        }

        pl.item_name("arc");
        pl.expected_updates(None);
        pl.start("Reading arcs...");

        let mut last_src = 0;
        let mut warned = false;
        for (i, line) in reader.lines().enumerate() {
            let line_num = i + 1;
            let line = line.map_err(|source| ParseError::Io {
                line: line_num,
                source,
            })?;
            let Some((src, dst)) = self.parse_line(line_num, &line)? else {
                continue;
            };
            if src < last_src && !warned {
                log::warn!(
                    "Line {}: source {} follows source {}; sources are not sorted",
                    line_num,
                    src,
                    last_src
                );
                warned = true;
            }
            last_src = src;
            builder.push(src, dst);
            pl.light_update();
        }
        pl.done();

        pl.info(format_args!("Building node set..."));
        let node_set = builder.build();
        log::info!(
            "{} nodes, {} arcs, {} dangling nodes",
            node_set.num_nodes(),
            node_set.num_arcs(),
            node_set.num_dangling()
        );
        Ok(node_set)
    }

    /// Opens the file at `path` and reads a node set from it.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<NodeSet> {
        self.load_with_logging(path, no_logging![])
    }

    /// Opens the file at `path` and reads a node set from it, logging
    /// progress on `pl`.
    pub fn load_with_logging(
        &self,
        path: impl AsRef<Path>,
        pl: &mut impl ProgressLog,
    ) -> Result<NodeSet> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        log::info!("Loading arcs from {}", path.display());
        self.read_with_logging(std::io::BufReader::new(file), pl)
            .with_context(|| format!("Could not parse {}", path.display()))
    }
}

impl NodeSet {
    /// Loads a node set from an arc list file using the default
    /// [reader](ArcListReader) settings.
    pub fn load(path: impl AsRef<Path>) -> Result<NodeSet> {
        ArcListReader::default().load(path)
    }
}
