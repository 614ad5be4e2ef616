/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The per-iteration buffer of shares.
//!
//! The buffer has a slot per node. During the first phase of an iteration
//! the owner of node *i* writes the share of *i* into slot *i*; during the
//! second phase any worker may read any slot. A barrier separates the two
//! phases, so slots are never read and written concurrently.
//!
//! Since every slot is overwritten in each first phase, the buffer is never
//! cleared between iterations.

use sync_cell_slice::{SyncCell, SyncSlice};

/// A reusable buffer of shares, one per node.
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    shares: Box<[f64]>,
}

impl ScratchBuffer {
    /// Allocates a buffer with `n` slots.
    pub fn new(n: usize) -> Self {
        Self {
            shares: vec![0.0; n].into_boxed_slice(),
        }
    }

    /// Returns the number of slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Returns true if the buffer has no slots.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Returns the shares written during the last iteration.
    #[inline(always)]
    pub fn shares(&self) -> &[f64] {
        &self.shares
    }

    /// Returns a view of the buffer that can be shared among threads.
    ///
    /// Reading and writing the cells is unsafe: callers must guarantee that
    /// each slot has a single writer, and that writes are separated from reads
    /// by a synchronization point.
    #[inline(always)]
    pub fn as_sync_slice(&mut self) -> &[SyncCell<f64>] {
        self.shares.as_sync_slice()
    }
}
