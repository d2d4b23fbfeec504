#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod error;
mod gilman;
mod helpers;
mod knuth_bendix;
mod normal_forms;
mod options;
mod overlap;
mod presentation;
mod rewriter;
mod rule;
mod trie;
mod word;

#[cfg(test)]
pub mod test_utility;

pub use error::*;
pub use gilman::*;
pub use helpers::*;
pub use knuth_bendix::*;
pub use normal_forms::*;
pub use options::*;
pub use overlap::*;
pub use presentation::*;
pub use rewriter::*;
pub use rule::*;
pub use trie::*;
pub use word::*;
