//! Hotline - a simulated "phone call" to a conversational voice agent
//!
//! A caller dials, hears a ringing tone, the call connects, the agent greets,
//! and caller speech is transcribed and answered with synthesized replies.
//! The call lifecycle is a small domain state machine; speech transcription,
//! speech synthesis and the agent reply source are pluggable collaborators.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
