/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use barrank::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const ARCS: &str = "\
# Directed graph
# FromNodeId\tToNodeId
0\t1
0\t2
1\t2
3\t0
";

#[test]
fn test_load() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(ARCS.as_bytes())?;
    file.flush()?;

    let graph = NodeSet::load(file.path())?;
    assert_eq!(graph.num_nodes(), 4);
    assert_eq!(graph.num_arcs(), 4);
    assert_eq!(graph.outdegrees(), &[2, 1, 0, 1]);
    assert_eq!(graph.incoming(0), &[3]);
    assert_eq!(graph.incoming(1), &[0]);
    assert_eq!(graph.incoming(2), &[0, 1]);
    assert!(graph.incoming(3).is_empty());
    assert_eq!(graph.num_dangling(), 1);
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let err = NodeSet::load(&path).unwrap_err();
    assert!(err.to_string().contains("Could not open"));
    assert!(err.root_cause().downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn test_malformed_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "0 1")?;
    writeln!(file, "1 x")?;
    file.flush()?;

    let err = NodeSet::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Could not parse"));
    let parse_error = err.downcast_ref::<ParseError>().unwrap();
    assert!(matches!(parse_error, ParseError::InvalidNode { line: 2, .. }));
    Ok(())
}

#[test]
fn test_unsorted_and_gaps() -> Result<()> {
    let graph = ArcListReader::default().read("5 0\n\n2 5\n2 0\n".as_bytes())?;
    // Identities are dense up to the largest one
    assert_eq!(graph.num_nodes(), 6);
    assert_eq!(graph.outdegree(2), 2);
    assert_eq!(graph.outdegree(5), 1);
    assert_eq!(graph.incoming(0), &[5, 2]);
    assert_eq!(graph.num_dangling(), 4);
    Ok(())
}

#[test]
fn test_options() -> Result<()> {
    let graph = ArcListReader::default()
        .comment_symbol('%')
        .num_nodes(Some(10))
        .read("% header\n0 1 1.5\n1 0 2.5\n".as_bytes())?;
    assert_eq!(graph.num_nodes(), 10);
    assert_eq!(graph.num_arcs(), 2);
    assert!(graph.iter().skip(2).all(|node| node.is_dangling()));
    Ok(())
}

#[test]
fn test_empty_input() -> Result<()> {
    let graph = ArcListReader::default().read("# nothing\n".as_bytes())?;
    assert_eq!(graph.num_nodes(), 0);
    let mut pr = PageRank::new(&graph);
    pr.num_threads(4).run()?;
    assert!(pr.rank().is_empty());
    Ok(())
}

#[test]
fn test_identity_range() {
    let reader = ArcListReader::default();
    for node in [usize::MAX, usize::MAX - 1, MAX_NODES] {
        let err = reader.read(format!("0 1\n1 0\n0 {node}\n").as_bytes()).unwrap_err();
        assert!(
            matches!(err, ParseError::NodeOutOfRange { line: 3, node: n } if n == node),
            "{err}"
        );
        let err = reader.read(format!("{node} 0\n").as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::NodeOutOfRange { line: 1, .. }));
    }
    // Values beyond usize::MAX do not even parse
    let err = reader
        .read(format!("0 {}0\n", usize::MAX).as_bytes())
        .unwrap_err();
    assert!(matches!(err, ParseError::InvalidNode { line: 1, .. }));

    let err = ArcListReader::default()
        .num_nodes(Some(MAX_NODES + 1))
        .read("0 1\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, ParseError::TooManyNodes { .. }));
}

#[test]
fn test_identity_out_of_range_in_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "0 {}", usize::MAX)?;
    file.flush()?;

    let err = NodeSet::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Could not parse"));
    assert!(matches!(
        err.downcast_ref::<ParseError>(),
        Some(ParseError::NodeOutOfRange { line: 1, node: usize::MAX })
    ));
    Ok(())
}
