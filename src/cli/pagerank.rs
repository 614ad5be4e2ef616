/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{alpha_parser, num_threads_parser, print_usage, GlobalArgs};
use crate::algo::pagerank::{Dangling, PageRank, DEFAULT_ALPHA, DEFAULT_ITERATIONS};
use crate::algo::partition::Order;
use crate::graphs::arc_list::ArcListReader;
use crate::utils::{output_path, store_ranks_to};
use anyhow::{Context, Result};
use clap::Args;
use dsi_progress_logger::{concurrent_progress_logger, progress_logger, ProgressLog};
use std::io::BufReader;
use std::path::PathBuf;

/// The policy for nodes without outgoing arcs.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum CliDangling {
    /// Give dangling nodes a zero share.
    #[default]
    Zero,
    /// Divide by a zero out-degree anyway.
    Propagate,
}

impl From<CliDangling> for Dangling {
    fn from(d: CliDangling) -> Self {
        match d {
            CliDangling::Zero => Dangling::Zero,
            CliDangling::Propagate => Dangling::Propagate,
        }
    }
}

#[derive(Args, Debug)]
pub struct CliArgs {
    /// The arc list: one "<source> <destination>" pair per line, with lines
    /// starting with '#' treated as comments.
    pub input_file: PathBuf,

    #[arg(value_parser = num_threads_parser)]
    /// The number of worker threads; it cannot exceed the number of nodes.
    pub thread_count: usize,

    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    /// The number of iterations.
    pub iterations: usize,

    #[arg(short, long, default_value_t = 0)]
    /// Zero writes the ranks; any other value only times the computation.
    pub mode: u32,

    #[arg(short, long)]
    /// Where to store the ranks. By default, a file named after the input
    /// file, the thread count, and the number of iterations, placed next to
    /// the input file.
    pub output: Option<PathBuf>,

    #[arg(short, long, default_value_t = DEFAULT_ALPHA, value_parser = alpha_parser)]
    /// The damping factor α (must be in the interval [0 . . 1)).
    pub alpha: f64,

    #[arg(long, value_enum, default_value_t = CliDangling::Zero)]
    /// How to compute the share of nodes without outgoing arcs.
    pub dangling: CliDangling,

    #[arg(long)]
    /// Assigns nodes to threads following a pseudorandom permutation generated
    /// with this seed, instead of by contiguous identity ranges.
    pub seed: Option<u64>,

    #[arg(long)]
    /// Decimal digits for the ranks; by default, the shortest representation
    /// that reads back to the same value is used.
    pub precision: Option<usize>,

    #[arg(long)]
    /// The minimum number of nodes; nodes not mentioned in the arc list are
    /// added as isolated nodes.
    pub num_nodes: Option<usize>,

    #[arg(long, default_value_t = '#')]
    /// The symbol starting comment lines.
    pub comment_symbol: char,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let file = match std::fs::File::open(&args.input_file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open {}: {}", args.input_file.display(), e);
            return print_usage();
        }
    };

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut cpl = concurrent_progress_logger![];
    cpl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        cpl.log_interval(log_interval);
    }

    log::info!("Loading arcs from {}", args.input_file.display());
    let graph = ArcListReader::default()
        .comment_symbol(args.comment_symbol)
        .num_nodes(args.num_nodes)
        .read_with_logging(BufReader::new(file), &mut pl)
        .with_context(|| format!("Could not parse {}", args.input_file.display()))?;

    let mut pr = PageRank::new(&graph);
    pr.alpha(args.alpha)
        .iterations(args.iterations)
        .num_threads(args.thread_count)
        .dangling(args.dangling.into())
        .order(match args.seed {
            Some(seed) => Order::Shuffled { seed },
            None => Order::Identity,
        });

    let start = std::time::Instant::now();
    pr.run_with_logging(&mut pl, &mut cpl)?;
    log::info!(
        "Completed {} iteration(s) on {} thread(s) in {:.3}s",
        pr.iterations_done(),
        args.thread_count,
        start.elapsed().as_secs_f64()
    );

    if args.mode != 0 {
        log::info!("Mode {}: not storing ranks", args.mode);
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| {
        output_path(&args.input_file, args.thread_count, args.iterations)
    });
    store_ranks_to(&output, pr.rank(), args.precision)?;

    Ok(())
}
