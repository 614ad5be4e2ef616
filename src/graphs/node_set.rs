/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! An immutable arena of node records indexed by dense identity.
//!
//! A [`NodeSet`] stores, for each node in [0 . . *n*), its outdegree and the
//! list of its predecessors (the sources of its incoming arcs). Incoming
//! lists are stored in compressed form: a single boxed slice of sources and a
//! boxed slice of *n* + 1 offsets, so that the list of node *i* is
//! `sources[offsets[i]..offsets[i + 1]]`.
//!
//! The topology never changes after construction; PageRank values live in
//! separate vectors indexed by the same identities.

use rayon::prelude::*;

/// The number of identities a [`NodeSet`] can address.
///
/// Node identities must be smaller than this value, so that the vectors of
/// outdegrees and offsets can be allocated without overflowing `isize`.
pub const MAX_NODES: usize = isize::MAX as usize / core::mem::size_of::<usize>() - 1;

/// A borrowed view of a node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a> {
    /// The identity of the node.
    pub id: usize,
    /// The outdegree of the node; zero means that the node is dangling.
    pub connections: usize,
    /// The sources of the arcs pointing to the node.
    pub incoming: &'a [usize],
}

impl Node<'_> {
    /// Returns true if the node has no outgoing arcs.
    #[inline(always)]
    pub fn is_dangling(&self) -> bool {
        self.connections == 0
    }
}

/// Dense, immutable node records: outdegrees and incoming lists.
///
/// # Examples
///
/// ```
/// use barrank::graphs::node_set::NodeSet;
///
/// // 0 → 1, 0 → 2, 1 → 2, 3 is isolated
/// let mut builder = NodeSet::builder();
/// builder.num_nodes(4);
/// builder.extend([(0, 1), (0, 2), (1, 2)]);
/// let graph = builder.build();
///
/// assert_eq!(graph.num_nodes(), 4);
/// assert_eq!(graph.num_arcs(), 3);
/// assert_eq!(graph.outdegree(0), 2);
/// assert_eq!(graph.incoming(2), &[0, 1]);
/// assert!(graph.node(3).is_dangling());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    outdegrees: Box<[usize]>,
    offsets: Box<[usize]>,
    sources: Box<[usize]>,
}

impl Default for NodeSet {
    fn default() -> Self {
        Self::empty(0)
    }
}

impl NodeSet {
    /// Creates a node set with `n` nodes and no arcs.
    pub fn empty(n: usize) -> Self {
        Self {
            outdegrees: vec![0; n].into_boxed_slice(),
            offsets: vec![0; n + 1].into_boxed_slice(),
            sources: Box::default(),
        }
    }

    /// Returns a new empty [builder](NodeSetBuilder).
    pub fn builder() -> NodeSetBuilder {
        NodeSetBuilder::default()
    }

    /// Creates a node set from a sequence of `(source, destination)` arcs.
    ///
    /// The number of nodes is one plus the largest identity appearing in
    /// the arcs.
    pub fn from_arcs(arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut builder = Self::builder();
        builder.extend(arcs);
        builder.build()
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.outdegrees.len()
    }

    /// Returns the number of arcs.
    #[inline(always)]
    pub fn num_arcs(&self) -> usize {
        self.sources.len()
    }

    /// Returns the outdegree of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not smaller than the number of nodes.
    #[inline(always)]
    pub fn outdegree(&self, i: usize) -> usize {
        self.outdegrees[i]
    }

    /// Returns the outdegrees of all nodes.
    #[inline(always)]
    pub fn outdegrees(&self) -> &[usize] {
        &self.outdegrees
    }

    /// Returns the sources of the arcs pointing to node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not smaller than the number of nodes.
    #[inline(always)]
    pub fn incoming(&self, i: usize) -> &[usize] {
        &self.sources[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Returns the record of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not smaller than the number of nodes.
    pub fn node(&self, i: usize) -> Node<'_> {
        Node {
            id: i,
            connections: self.outdegrees[i],
            incoming: self.incoming(i),
        }
    }

    /// Returns an iterator over the node records in increasing identity
    /// order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Node<'_>> + '_ {
        (0..self.num_nodes()).map(move |i| self.node(i))
    }

    /// Returns true if node `i` has no outgoing arcs.
    #[inline(always)]
    pub fn is_dangling(&self, i: usize) -> bool {
        self.outdegrees[i] == 0
    }

    /// Returns the number of nodes without outgoing arcs.
    pub fn num_dangling(&self) -> usize {
        self.outdegrees.iter().filter(|&&d| d == 0).count()
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = Node<'a>;
    type IntoIter = Box<dyn ExactSizeIterator<Item = Node<'a>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Accumulates arcs and builds a [`NodeSet`].
///
/// Arcs can be pushed in any order; within the incoming list of a node,
/// sources appear in the order in which the corresponding arcs were pushed.
#[derive(Debug, Clone, Default)]
pub struct NodeSetBuilder {
    arcs: Vec<(usize, usize)>,
    min_nodes: usize,
}

impl NodeSetBuilder {
    /// Ensures that the resulting node set has at least `n` nodes.
    ///
    /// This is useful to add isolated nodes at the end of the identity
    /// range. [`build`](Self::build) panics if `n` exceeds [`MAX_NODES`].
    pub fn num_nodes(&mut self, n: usize) -> &mut Self {
        self.min_nodes = n;
        self
    }

    /// Adds an arc.
    #[inline(always)]
    pub fn push(&mut self, src: usize, dst: usize) -> &mut Self {
        self.arcs.push((src, dst));
        self
    }

    /// Adds all arcs of an iterator.
    pub fn extend(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) -> &mut Self {
        self.arcs.extend(arcs);
        self
    }

    /// Returns the number of arcs pushed so far.
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Builds the node set, consuming the accumulated arcs.
    ///
    /// # Panics
    ///
    /// Panics if an identity is not smaller than [`MAX_NODES`], or if the
    /// minimum number of nodes exceeds it.
    pub fn build(self) -> NodeSet {
        let mut arcs = self.arcs;
        let max_id = arcs.par_iter().map(|&(src, dst)| src.max(dst)).max();
        if let Some(max_id) = max_id {
            assert!(
                max_id < MAX_NODES,
                "Node identity {max_id} is not smaller than {MAX_NODES}"
            );
        }
        assert!(
            self.min_nodes <= MAX_NODES,
            "Cannot build {} nodes (the maximum is {MAX_NODES})",
            self.min_nodes
        );
        let num_nodes = max_id.map_or(0, |max_id| max_id + 1).max(self.min_nodes);

        let mut outdegrees = vec![0; num_nodes];
        let mut offsets = vec![0; num_nodes + 1];
        for &(src, dst) in &arcs {
            outdegrees[src] += 1;
            offsets[dst + 1] += 1;
        }
        for i in 0..num_nodes {
            offsets[i + 1] += offsets[i];
        }

        // Stable, so sources keep their insertion order
        arcs.par_sort_by_key(|&(_, dst)| dst);
        let sources = arcs
            .into_par_iter()
            .map(|(src, _)| src)
            .collect::<Vec<_>>();

        debug_assert_eq!(offsets[num_nodes], sources.len());

        NodeSet {
            outdegrees: outdegrees.into_boxed_slice(),
            offsets: offsets.into_boxed_slice(),
            sources: sources.into_boxed_slice(),
        }
    }
}
