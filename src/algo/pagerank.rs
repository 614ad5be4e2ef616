/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Barrier-synchronized parallel PageRank.
//!
//! This implementation runs a fixed number of Jacobi-style iterations of the
//! unnormalized PageRank recurrence
//!
//! > *xᵢ*⁽*ᵗ* ⁺ ¹⁾ = (1 − α) + α ∑_(*j* → *i*) *xⱼ*⁽*ᵗ*⁾ / *d*⁺(*j*),
//!
//! where α is the damping factor and *d*⁺(*j*) is the outdegree of *j*.
//! Values start at 1, so on a graph without dangling nodes the values sum to
//! the number of nodes at every iteration.
//!
//! # Threads and barriers
//!
//! The nodes are [partitioned](super::partition::Partition) among *t*
//! worker threads, which are spawned once per run and joined at its end.
//! Each worker owns the values of the nodes in its part and the slots of the
//! [scratch buffer](super::scratch::ScratchBuffer) with the same indices.
//! At each iteration, every worker executes:
//!
//! 1. a barrier wait;
//! 2. _phase 1_: for each owned node *i*, store α *xᵢ* / *d*⁺(*i*) in slot
//!    *i* of the scratch buffer;
//! 3. a barrier wait;
//! 4. _phase 2_: for each owned node *i*, set *xᵢ* to (1 − α) plus the sum of
//!    the slots of the predecessors of *i*.
//!
//! The second barrier makes every phase-1 write visible before any phase-2
//! read of the same iteration. The first barrier keeps the phase-1 writes of
//! an iteration from overtaking the phase-2 reads of the previous one. No
//! other synchronization is used: values and slots are shared through
//! [`SyncCell`](sync_cell_slice::SyncCell)s, and disjointness of the parts
//! guarantees a single writer for each cell.
//!
//! Since every value is computed by the same sequence of floating-point
//! operations whatever the number of threads or the partition order, results
//! are bit-identical across thread counts and runs.
//!
//! # Dangling nodes
//!
//! The share of a node with outdegree zero is undefined. The [`Dangling`]
//! policy selects between giving such nodes a zero share (the default) and
//! performing the division anyway, which stores an infinity (or a NaN) in
//! the scratch buffer. A dangling node is never the source of an arc, so its
//! slot is never summed: the two policies yield the same values, and differ
//! only in the content of the scratch buffer.

use super::partition::{Order, Partition, PartitionError};
use super::scratch::ScratchBuffer;
use crate::graphs::node_set::NodeSet;
use dsi_progress_logger::{no_logging, ConcurrentProgressLog, ProgressLog};
use kahan::KahanSum;
use std::sync::Barrier;
use sync_cell_slice::SyncSlice;
use thiserror::Error;

/// The default damping factor.
pub const DEFAULT_ALPHA: f64 = 0.85;

/// The default number of iterations.
pub const DEFAULT_ITERATIONS: usize = 500;

/// How to compute the share of a node without outgoing arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dangling {
    /// Dangling nodes have a zero share; their value is not redistributed.
    #[default]
    Zero,
    /// Divide by zero anyway, storing a non-finite share (infinity, or NaN
    /// if the value is zero) in the scratch buffer.
    Propagate,
}

impl std::fmt::Display for Dangling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dangling::Zero => f.write_str("zero share"),
            Dangling::Propagate => f.write_str("propagate division"),
        }
    }
}

/// Errors detected before starting the workers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageRankError {
    /// Zero threads were requested.
    #[error("The number of threads must be positive")]
    NoThreads,

    /// More threads than nodes were requested.
    #[error("The number of threads ({num_threads}) exceeds the number of nodes ({num_nodes})")]
    TooManyThreads {
        num_threads: usize,
        num_nodes: usize,
    },

    /// The nodes could not be partitioned.
    #[error(transparent)]
    Partition(#[from] PartitionError),
}

/// Computes the share of a node with value `value` and outdegree
/// `connections`.
#[inline(always)]
fn share(alpha: f64, value: f64, connections: usize, dangling: Dangling) -> f64 {
    if connections == 0 && dangling == Dangling::Zero {
        0.0
    } else {
        alpha * value / connections as f64
    }
}

/// Performs sequentially one iteration, writing in `next` the values
/// obtained from `values`.
///
/// This is the same computation performed by the workers of
/// [`PageRank`], without scratch buffer and barriers, and it is useful as a
/// reference.
///
/// # Panics
///
/// Panics if `values` or `next` do not have one element per node.
pub fn step(graph: &NodeSet, alpha: f64, dangling: Dangling, values: &[f64], next: &mut [f64]) {
    let n = graph.num_nodes();
    assert_eq!(values.len(), n);
    assert_eq!(next.len(), n);
    let shares = values
        .iter()
        .zip(graph.outdegrees())
        .map(|(&value, &connections)| share(alpha, value, connections, dangling))
        .collect::<Vec<_>>();
    for (i, x) in next.iter_mut().enumerate() {
        let sum: f64 = graph.incoming(i).iter().map(|&s| shares[s]).sum();
        *x = (1.0 - alpha) + sum;
    }
}

/// Computes PageRank with a fixed pool of barrier-synchronized threads.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the values are available via the
/// [`rank`](Self::rank) method.
///
/// # Examples
///
/// ```
/// use barrank::algo::pagerank::PageRank;
/// use barrank::graphs::node_set::NodeSet;
///
/// // A 3-cycle and an isolated node
/// let mut builder = NodeSet::builder();
/// builder.num_nodes(4).extend([(0, 1), (1, 2), (2, 0)]);
/// let graph = builder.build();
///
/// let mut pr = PageRank::new(&graph);
/// pr.num_threads(2).iterations(20);
/// pr.run()?;
///
/// assert!((pr.rank()[0] - 1.0).abs() < 1E-12);
/// assert!((pr.rank()[3] - 0.15).abs() < 1E-12);
/// # Ok::<(), barrank::algo::pagerank::PageRankError>(())
/// ```
pub struct PageRank<'a> {
    graph: &'a NodeSet,
    alpha: f64,
    iterations: usize,
    num_threads: usize,
    order: Order,
    dangling: Dangling,

    rank: Box<[f64]>,
    scratch: ScratchBuffer,
    iterations_done: usize,
}

impl std::fmt::Debug for PageRank<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("alpha", &self.alpha)
            .field("iterations", &self.iterations)
            .field("num_threads", &self.num_threads)
            .field("order", &self.order)
            .field("dangling", &self.dangling)
            .field("iterations_done", &self.iterations_done)
            .finish_non_exhaustive()
    }
}

impl<'a> PageRank<'a> {
    /// Creates a new PageRank computation on the given graph.
    ///
    /// Vectors for values and shares are allocated here and reused by
    /// every [run](Self::run).
    pub fn new(graph: &'a NodeSet) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            alpha: DEFAULT_ALPHA,
            iterations: DEFAULT_ITERATIONS,
            num_threads: 1,
            order: Order::default(),
            dangling: Dangling::default(),
            rank: vec![1.0; n].into_boxed_slice(),
            scratch: ScratchBuffer::new(n),
            iterations_done: 0,
        }
    }

    /// Sets the damping factor α.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The damping factor must be in [0 . . 1), got {alpha}"
        );
        self.alpha = alpha;
        self
    }

    /// Sets the number of iterations.
    pub fn iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of worker threads.
    ///
    /// The value is checked by [`run`](Self::run): it must be positive and,
    /// unless the graph is empty, at most the number of nodes.
    pub fn num_threads(&mut self, num_threads: usize) -> &mut Self {
        self.num_threads = num_threads;
        self
    }

    /// Sets the order of the permutation partitioned among threads.
    pub fn order(&mut self, order: Order) -> &mut Self {
        self.order = order;
        self
    }

    /// Sets the policy for dangling nodes.
    pub fn dangling(&mut self, dangling: Dangling) -> &mut Self {
        self.dangling = dangling;
        self
    }

    /// Returns the values.
    ///
    /// After calling [`run`](Self::run), this contains the computed PageRank
    /// values, indexed by node identity.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation, returning the values.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the shares computed during the last iteration.
    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }

    /// Returns the number of iterations performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations_done(&self) -> usize {
        self.iterations_done
    }

    /// Runs the computation.
    pub fn run(&mut self) -> Result<(), PageRankError> {
        self.run_with_logging(no_logging![], no_logging![])
    }

    /// Runs the computation, logging progress.
    ///
    /// `pl` is a sequential [`ProgressLog`] tracking the whole run, whereas
    /// `cpl` is a [`ConcurrentProgressLog`] used for node-level progress
    /// inside the workers. Their options will be preserved, making thus
    /// possible to customize the logs.
    pub fn run_with_logging<C: ConcurrentProgressLog + Send>(
        &mut self,
        pl: &mut impl ProgressLog,
        cpl: &mut C,
    ) -> Result<(), PageRankError> {
        let n = self.graph.num_nodes();
        let num_threads = self.num_threads;
        if num_threads == 0 {
            return Err(PageRankError::NoThreads);
        }
        self.iterations_done = 0;
        if n == 0 {
            return Ok(());
        }
        if num_threads > n {
            return Err(PageRankError::TooManyThreads {
                num_threads,
                num_nodes: n,
            });
        }

        log::info!("Alpha: {}", self.alpha);
        log::info!("Iterations: {}", self.iterations);
        log::info!("Threads: {}", num_threads);
        log::info!("Partition order: {}", self.order);
        log::info!("Dangling nodes: {}", self.dangling);

        let partition = Partition::new(n, num_threads, self.order)?;
        self.rank.fill(1.0);

        let graph = self.graph;
        let alpha = self.alpha;
        let dangling = self.dangling;
        let iterations = self.iterations;
        let barrier = Barrier::new(num_threads);
        let rank = self.rank.as_sync_slice();
        let scratch = self.scratch.as_sync_slice();

        pl.item_name("iteration");
        pl.expected_updates(Some(iterations));
        pl.start(format!(
            "Computing PageRank (alpha={alpha}, threads={num_threads})..."
        ));

        cpl.item_name("node");
        cpl.expected_updates(Some(n * iterations));
        cpl.start("Updating values...");

        std::thread::scope(|s| {
            for part in partition.parts() {
                let barrier = &barrier;
                let mut local_cpl = cpl.clone();
                s.spawn(move || {
                    for iteration in 0..iterations {
                        barrier.wait();

                        // SAFETY: each node, and thus each value and each
                        // slot, belongs to exactly one part.
                        for &i in part {
                            unsafe {
                                scratch[i].set(share(
                                    alpha,
                                    rank[i].get(),
                                    graph.outdegree(i),
                                    dangling,
                                ));
                            }
                        }

                        if barrier.wait().is_leader() {
                            log::debug!("Iteration {}: shares computed", iteration + 1);
                        }

                        for &i in part {
                            // SAFETY: slots are not written until the next
                            // barrier, and each value belongs to a single part.
                            unsafe {
                                let sum: f64 =
                                    graph.incoming(i).iter().map(|&s| scratch[s].get()).sum();
                                rank[i].set((1.0 - alpha) + sum);
                            }
                        }

                        local_cpl.update_with_count(part.len());
                    }
                });
            }
        });

        cpl.done();
        pl.done_with_count(iterations);
        self.iterations_done = iterations;

        let mass = self
            .rank
            .iter()
            .fold(KahanSum::<f64>::new(), |sum, &x| sum + x);
        log::info!("Sum of values: {} ({} nodes)", mass.sum(), n);

        Ok(())
    }
}

/// Computes PageRank with the default damping factor and dangling-node
/// policy, returning the values.
pub fn pagerank(
    graph: &NodeSet,
    num_threads: usize,
    iterations: usize,
) -> Result<Box<[f64]>, PageRankError> {
    let mut pr = PageRank::new(graph);
    pr.num_threads(num_threads).iterations(iterations);
    pr.run()?;
    Ok(pr.into_rank())
}
