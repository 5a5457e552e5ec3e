//! Agent response services

pub mod canned;
pub mod instructions;
pub mod realtime;

pub use canned::CannedResponder;
pub use instructions::assistant_instructions;
pub use realtime::{RealtimeConfig, RealtimeResponder};
