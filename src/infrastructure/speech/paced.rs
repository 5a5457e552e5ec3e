//! Paced speech synthesizer
//!
//! Simulates utterance playback by holding `speak` open for the time the
//! audio would take, so callers that wait for playback to settle behave as
//! they would against a real engine. `cancel_all` releases any in-flight
//! utterance immediately.

use crate::domain::shared::result::Result;
use crate::domain::speech::SpeechSynthesizer;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Spoken-word pacing, roughly 150 words per minute
const DEFAULT_MILLIS_PER_WORD: u64 = 400;
/// Cap so a runaway reply cannot stall the call
const MAX_UTTERANCE_MS: u64 = 10_000;

pub struct PacedSynthesizer {
    millis_per_word: u64,
    cancel: Notify,
}

impl PacedSynthesizer {
    pub fn new(millis_per_word: u64) -> Self {
        Self {
            millis_per_word,
            cancel: Notify::new(),
        }
    }

    fn playback_time(&self, text: &str) -> Duration {
        let words = text.split_whitespace().count().max(1) as u64;
        Duration::from_millis((words * self.millis_per_word).min(MAX_UTTERANCE_MS))
    }
}

impl Default for PacedSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_MILLIS_PER_WORD)
    }
}

#[async_trait]
impl SpeechSynthesizer for PacedSynthesizer {
    async fn speak(&self, text: &str) -> Result<()> {
        let playback = self.playback_time(text);
        info!(text = %text, "agent speaking");
        tokio::select! {
            _ = tokio::time::sleep(playback) => {}
            _ = self.cancel.notified() => {
                debug!("utterance cancelled");
            }
        }
        Ok(())
    }

    fn cancel_all(&self) {
        self.cancel.notify_waiters();
    }
}
