//! Utility types and functions shared by the kbc crates.
//!
//! Forbid unsafe code in this crate.
#![forbid(unsafe_code)]

mod compressed_vec;
mod error;
mod limit;
mod macros;
mod progress;
mod random_test;
mod tagged_index;
mod timing;

pub use compressed_vec::*;
pub use error::*;
pub use limit::*;
pub use progress::*;
pub use random_test::*;
pub use tagged_index::*;
pub use timing::*;
