//! Call entities

use crate::domain::call::value_object::Speaker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the call transcript
///
/// Immutable once created; ordering is owned by the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Spoken text
    text: String,
    /// Who said it
    speaker: Speaker,
    /// When it was observed
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, speaker: Speaker) -> Self {
        Self {
            text: text.into(),
            speaker,
            timestamp: Utc::now(),
        }
    }

    pub fn caller(text: impl Into<String>) -> Self {
        Self::new(text, Speaker::Caller)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(text, Speaker::Agent)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }
}
