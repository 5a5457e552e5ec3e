//! Domain layer - call lifecycle model and collaborator ports
//!
//! This layer contains:
//! - The call session aggregate and its state machine
//! - Value objects: states, speakers, timing constants
//! - Domain events consumed by observers
//! - Ports for the speech and agent-response collaborators

pub mod agent;
pub mod call;
pub mod shared;
pub mod speech;

// Re-export commonly used types
pub use shared::{DomainError, Result};
