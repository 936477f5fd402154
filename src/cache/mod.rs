//! Cache module for keeping the last good quiz feed on disk
//!
//! The cache holds a single file: the verbatim body of the last successful
//! fetch. It is read back when the network is unavailable or returns a body
//! that does not decode.

mod manager;

pub use manager::{CachedFeed, QuizCache};
