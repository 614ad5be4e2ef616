/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The in-memory graph model and its textual input format.

pub mod arc_list;
pub mod node_set;

pub mod prelude {
    pub use super::arc_list::{ArcListReader, ParseError};
    pub use super::node_set::{Node, NodeSet, NodeSetBuilder, MAX_NODES};
}
