//! Speech engines

pub mod paced;
pub mod scripted;
pub mod unsupported;

pub use paced::PacedSynthesizer;
pub use scripted::ScriptedTranscriber;
pub use unsupported::UnsupportedTranscriber;
