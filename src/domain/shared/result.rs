//! Crate-wide result alias

pub use super::error::Result;
