/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The header line of rank files.
pub const RANK_HEADER: &str = "node, pagerank";

/// Writes values as comma-separated `<node>, <value>` lines, preceded by
/// the [header](RANK_HEADER), in increasing node order.
///
/// If `precision` is `None`, values are written in the shortest form that
/// parses back to the same value; otherwise, with `precision` decimal
/// digits.
pub fn store_ranks(
    mut writer: impl Write,
    ranks: &[f64],
    precision: Option<usize>,
) -> std::io::Result<()> {
    writeln!(writer, "{RANK_HEADER}")?;
    let mut buf = zmij::Buffer::new();
    for (node, &value) in ranks.iter().enumerate() {
        match precision {
            Some(precision) => writeln!(writer, "{node}, {value:.precision$}")?,
            None if value.is_finite() => writeln!(writer, "{node}, {}", buf.format(value))?,
            None => writeln!(writer, "{node}, {value}")?,
        }
    }
    writer.flush()
}

/// Stores values in the file at `path`, creating parent directories if
/// needed. See [`store_ranks`] for the format.
pub fn store_ranks_to(
    path: impl AsRef<Path>,
    ranks: &[f64],
    precision: Option<usize>,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent_dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!("Failed to create the directory {}", parent_dir.display())
        })?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    log::info!("Storing values at {}", path.display());
    store_ranks(BufWriter::new(file), ranks, precision)
        .with_context(|| format!("Could not write values to {}", path.display()))
}

/// Returns the default output path for a run: the file
/// `<stem>_t<threads>_i<iterations>.csv` in the directory of `input`.
///
/// # Examples
///
/// ```
/// use barrank::utils::output_path;
/// use std::path::Path;
///
/// assert_eq!(
///     output_path("graphs/Email-Enron.txt", 4, 500),
///     Path::new("graphs/Email-Enron_t4_i500.csv")
/// );
/// ```
pub fn output_path(input: impl AsRef<Path>, num_threads: usize, iterations: usize) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pagerank".to_owned());
    input.with_file_name(format!("{stem}_t{num_threads}_i{iterations}.csv"))
}
