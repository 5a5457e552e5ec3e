//! Infrastructure layer - concrete collaborator implementations

pub mod agent;
pub mod audio;
pub mod speech;
