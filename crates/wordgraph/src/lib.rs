//!
//! A crate containing deterministic edge labelled graphs, so called word
//! graphs, where every node has at most one outgoing edge per label. The
//! labels of the paths starting in a node form a language of words, which
//! can be counted and enumerated in shortlex order.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod analysis;
mod paths;
mod random_word_graph;
mod reachability;
mod word_graph;

pub use analysis::*;
pub use paths::*;
pub use random_word_graph::*;
pub use reachability::*;
pub use word_graph::*;
