//! Speech collaborator ports
//!
//! The call controller consumes speech-to-text and text-to-speech through
//! these traits; concrete engines live in the infrastructure layer and the
//! browser/platform engines they wrap stay opaque.

use crate::domain::shared::result::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Event emitted by a [`Transcriber`] while listening
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriberEvent {
    /// A final (non-interim) transcript of caller speech
    Transcript(String),
    /// The engine failed; listening has stopped
    Error(String),
}

/// Continuous speech-to-text engine.
///
/// `start` begins listening and delivers zero or more events on the given
/// channel; `stop` halts listening and is idempotent. An engine must support
/// being restarted after a stop.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn start(&self, events: mpsc::Sender<TranscriberEvent>) -> Result<()>;

    async fn stop(&self);

    /// Whether the capability exists at all; a false value degrades the call
    /// to text-only mode instead of failing it.
    fn is_supported(&self) -> bool {
        true
    }
}

/// Text-to-speech engine.
///
/// `speak` resolves once playback has settled; `cancel_all` stops any
/// in-flight utterance immediately (call end, mute toggled on).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;

    fn cancel_all(&self);
}
