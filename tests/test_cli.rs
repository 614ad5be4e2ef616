/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use barrank::cli::cli_main;
use barrank::utils::RANK_HEADER;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CYCLE_WITH_DANGLING: &str = "\
# 3-cycle plus a dangling node
0 1
1 2
2 0
2 3
";

fn write_graph(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("cycle.txt");
    std::fs::write(&path, CYCLE_WITH_DANGLING)?;
    Ok(path)
}

fn read_ranks(path: &Path) -> Result<Vec<(usize, f64)>> {
    let text = std::fs::read_to_string(path)?;
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(RANK_HEADER));
    lines
        .map(|line| -> Result<(usize, f64)> {
            let (node, value) = line.split_once(", ").unwrap();
            Ok((node.parse()?, value.parse()?))
        })
        .collect()
}

#[test]
fn test_default_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(&dir)?;
    cli_main(["barrank", input.to_str().unwrap(), "2", "-i", "1"])?;

    let ranks = read_ranks(&dir.path().join("cycle_t2_i1.csv"))?;
    assert_eq!(ranks.len(), 4);
    for (i, &(node, _)) in ranks.iter().enumerate() {
        assert_eq!(node, i);
    }
    let (a, b) = (1.0 - 0.85, 0.85);
    assert!((ranks[0].1 - (a + b / 2.0)).abs() < 1E-15);
    assert!((ranks[1].1 - (a + b)).abs() < 1E-15);
    assert!((ranks[2].1 - (a + b)).abs() < 1E-15);
    assert!((ranks[3].1 - (a + b / 2.0)).abs() < 1E-15);
    Ok(())
}

#[test]
fn test_options() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(&dir)?;
    let output = dir.path().join("out").join("ranks.csv");
    cli_main([
        "barrank",
        input.to_str().unwrap(),
        "3",
        "--iterations",
        "5",
        "--alpha",
        "0.5",
        "--seed",
        "17",
        "--dangling",
        "propagate",
        "--precision",
        "4",
        "-o",
        output.to_str().unwrap(),
    ])?;

    let text = std::fs::read_to_string(&output)?;
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    for line in &lines[1..] {
        let (_, value) = line.split_once(", ").unwrap();
        assert_eq!(value.split_once('.').unwrap().1.len(), 4);
    }
    assert!(!dir.path().join("cycle_t3_i5.csv").exists());
    Ok(())
}

#[test]
fn test_timing_mode() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(&dir)?;
    cli_main(["barrank", input.to_str().unwrap(), "1", "-i", "10", "-m", "1"])?;
    assert!(!dir.path().join("cycle_t1_i10.csv").exists());

    cli_main(["barrank", input.to_str().unwrap(), "1", "-i", "10", "-m", "0"])?;
    assert!(dir.path().join("cycle_t1_i10.csv").exists());
    Ok(())
}

#[test]
fn test_usage() -> Result<()> {
    // Missing arguments and unreadable input files are not errors
    cli_main(["barrank"])?;
    let dir = tempfile::tempdir()?;
    let input = write_graph(&dir)?;
    cli_main(["barrank", input.to_str().unwrap()])?;
    let missing = dir.path().join("missing.txt");
    cli_main(["barrank", missing.to_str().unwrap(), "2"])?;
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_invalid_arguments() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_graph(&dir)?;
    let input = input.to_str().unwrap();
    assert!(cli_main(["barrank", input, "0"]).is_err());
    assert!(cli_main(["barrank", input, "two"]).is_err());
    assert!(cli_main(["barrank", input, "1", "--alpha", "1.5"]).is_err());
    // More threads than nodes
    assert!(cli_main(["barrank", input, "5"]).is_err());
    Ok(())
}
