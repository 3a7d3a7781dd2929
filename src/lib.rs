//! A red-black tree that rebalances on the way down.
//!
//! This crate provides [`RBTree`], an ordered set of opaque payloads. The order
//! comes from a [`Comparator`] chosen when the tree is built, and every payload
//! leaving the tree goes through a [`Disposer`], so the tree can hold values
//! whose ordering or cleanup the payload type itself knows nothing about.
//!
//! # Example
//!
//! ```
//! use topdown_rbtree::RBTree;
//!
//! // Order jobs by priority only; the label rides along.
//! let mut jobs = RBTree::with_comparator(|a: &(u8, &str), b: &(u8, &str)| a.0.cmp(&b.0));
//! jobs.insert((3, "compact"));
//! jobs.insert((1, "flush"));
//! assert!(!jobs.insert((3, "duplicate priority")));
//!
//! assert_eq!(jobs.find(&(3, "")), Some(&(3, "compact")));
//! assert_eq!(jobs.first(), Some(&(1, "flush")));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Pluggable ordering and disposal** - Closures or the provided [`NaturalOrder`] / [`DropDisposer`]
//! - **Single-pass balancing** - Insert and remove fix colors and rotate during one top-down descent
//! - **Fallible insert** - [`RBTree::try_insert`] reports duplicates and allocation failure without touching the tree
//!
//! # Implementation
//!
//! Nodes are stored in a single arena and link to their children and parent by
//! index. Insertion flips colors and rotates ahead of itself so that the new red
//! leaf can be attached with at most one more rotation. Removal pushes a red
//! node down the search path toward the in-order predecessor of the key, so the
//! node finally unlinked is always red. Clearing rotates left links away and
//! consumes the resulting chain, using constant extra space.
//!
//! Diagnostic events are emitted through the [`log`] facade at `trace` and
//! `debug` level; install any logger to see them.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod hooks;
mod raw;

pub mod rbtree;

pub use error::InsertError;
pub use hooks::{Comparator, Disposer, DropDisposer, NaturalOrder};
pub use rbtree::RBTree;
