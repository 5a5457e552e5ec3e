//! Application layer - orchestration of the call lifecycle

pub mod call_controller;

pub use call_controller::CallController;
