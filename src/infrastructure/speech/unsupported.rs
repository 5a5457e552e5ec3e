//! Absent speech-recognition capability
//!
//! Used when the platform has no speech engine at all; the call then runs
//! in text-only mode.

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::speech::{Transcriber, TranscriberEvent};
use async_trait::async_trait;
use tokio::sync::mpsc;

#[derive(Debug, Default)]
pub struct UnsupportedTranscriber;

#[async_trait]
impl Transcriber for UnsupportedTranscriber {
    async fn start(&self, _events: mpsc::Sender<TranscriberEvent>) -> Result<()> {
        Err(DomainError::SpeechUnavailable(
            "speech recognition is not available on this platform".to_string(),
        ))
    }

    async fn stop(&self) {}

    fn is_supported(&self) -> bool {
        false
    }
}
