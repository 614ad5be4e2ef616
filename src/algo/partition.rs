/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Assignment of node identities to workers.
//!
//! A [`Partition`] is a permutation π of [0 . . *n*) split into *t*
//! contiguous ranges, one per worker. All ranges but the last one contain
//! ⌊*n* / *t*⌋ identities; the last one contains ⌊*n* / *t*⌋ + *n* mod *t*
//! identities. Every identity appears in exactly one range, so workers own
//! disjoint sets of nodes.
//!
//! The permutation does not affect the values computed by
//! [`PageRank`](super::pagerank::PageRank): it only changes which worker
//! performs which update.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::ops::Range;
use thiserror::Error;

/// The permutation from which ranges are cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Identities in increasing order, so each worker owns an interval of
    /// identities.
    #[default]
    Identity,
    /// A pseudorandom permutation generated by a [`SmallRng`] seeded with the
    /// given value. The same seed yields the same permutation on the same
    /// platform.
    Shuffled { seed: u64 },
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Identity => f.write_str("identity"),
            Order::Shuffled { seed } => write!(f, "shuffled (seed {seed})"),
        }
    }
}

/// Errors that can occur while partitioning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// Zero parts were requested.
    #[error("The number of parts must be positive")]
    NoParts,
}

/// A permutation of [0 . . *n*) split into contiguous, disjoint ranges.
///
/// # Examples
///
/// ```
/// use barrank::algo::partition::{Order, Partition};
///
/// let partition = Partition::new(10, 3, Order::Identity)?;
/// assert_eq!(partition.part(0), &[0, 1, 2]);
/// assert_eq!(partition.part(1), &[3, 4, 5]);
/// // The last part takes the remainder
/// assert_eq!(partition.part(2), &[6, 7, 8, 9]);
/// # Ok::<(), barrank::algo::partition::PartitionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    perm: Box<[usize]>,
    bounds: Box<[usize]>,
}

impl Partition {
    /// Partitions [0 . . `n`) into `num_parts` parts, using the given order.
    ///
    /// When `num_parts` is larger than `n`, all parts but the last one are
    /// empty.
    pub fn new(n: usize, num_parts: usize, order: Order) -> Result<Self, PartitionError> {
        if num_parts == 0 {
            return Err(PartitionError::NoParts);
        }

        let mut perm = (0..n).collect::<Vec<_>>();
        if let Order::Shuffled { seed } = order {
            let mut rng = SmallRng::seed_from_u64(seed);
            perm.shuffle(&mut rng);
        }

        let part_len = n / num_parts;
        let mut bounds = (0..num_parts).map(|i| i * part_len).collect::<Vec<_>>();
        bounds.push(n);

        Ok(Self {
            perm: perm.into_boxed_slice(),
            bounds: bounds.into_boxed_slice(),
        })
    }

    /// Returns the number of parts.
    #[inline(always)]
    pub fn num_parts(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Returns the number of identities in the partition.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    /// Returns true if there are no identities to partition.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// Returns the positions in the [permutation](Self::permutation)
    /// delimiting part `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not smaller than the number of parts.
    #[inline(always)]
    pub fn bounds(&self, i: usize) -> Range<usize> {
        self.bounds[i]..self.bounds[i + 1]
    }

    /// Returns the identities of part `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not smaller than the number of parts.
    #[inline(always)]
    pub fn part(&self, i: usize) -> &[usize] {
        &self.perm[self.bounds(i)]
    }

    /// Returns an iterator over the parts.
    pub fn parts(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        (0..self.num_parts()).map(move |i| self.part(i))
    }

    /// Returns the underlying permutation.
    #[inline(always)]
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }
}
