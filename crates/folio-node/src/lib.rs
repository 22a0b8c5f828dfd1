//! Content node hierarchy.
//!
//! Nodes of a user form a tree of at most two levels. All nodes of a user share
//! one dense sort sequence `0..N`, kept intact by every create, delete and move.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod node;
pub mod order;
mod prelude;

pub use node::{CreateNode, ListNodes, NodeSelector, ParentChange, UpdateNodeInfo};

// vim: ts=4
