//! Call lifecycle domain model

pub mod aggregate;
pub mod entity;
pub mod event;
pub mod transcript;
pub mod value_object;

pub use aggregate::CallSession;
pub use entity::Message;
pub use event::CallEvent;
pub use transcript::Transcript;
pub use value_object::{CallState, CallTimings, Speaker};
