//! Call domain events
//!
//! Everything an observer (console UI, tests) needs to render the call:
//! state changes, transcript appends, ring tones, the duration timer and the
//! listening/mute indicators.

use crate::domain::call::entity::Message;
use crate::domain::call::value_object::CallState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEvent {
    /// The call moved to a new state
    StateChanged { state: CallState },
    /// A message was appended to the transcript
    MessageAppended { message: Message },
    /// One ring-tone burst should play
    RingTone,
    /// The call-duration timer ticked
    DurationTick { seconds: u64 },
    /// Transcription became active or inactive
    ListeningChanged { listening: bool },
    /// Outbound audio was muted or unmuted
    MutedChanged { muted: bool },
}
