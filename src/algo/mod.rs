/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The parallel PageRank engine and its building blocks.

pub mod pagerank;
pub mod partition;
pub mod scratch;

pub mod prelude {
    pub use super::pagerank::{pagerank, Dangling, PageRank, PageRankError};
    pub use super::partition::{Order, Partition, PartitionError};
    pub use super::scratch::ScratchBuffer;
}
