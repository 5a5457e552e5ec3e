//! Interface layer - presentation helpers and observers

pub mod console;
