//! Audio rendering helpers

pub mod tone;
