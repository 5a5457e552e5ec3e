//! Call value objects

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Call state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallState {
    /// No call in progress
    Idle,
    /// Caller dialed, agent is being "rung"
    Calling,
    /// Call is connected and the conversation is live
    Connected,
    /// Call has ended, about to return to idle
    Ended,
}

impl CallState {
    /// Check if state transition is valid
    pub fn can_transition_to(&self, new_state: &CallState) -> bool {
        use CallState::*;

        match (self, new_state) {
            // From Idle
            (Idle, Calling) => true,

            // From Calling
            (Calling, Connected) => true,
            (Calling, Ended) => true,

            // From Connected
            (Connected, Ended) => true,

            // From Ended
            (Ended, Idle) => true,

            // All other transitions are invalid
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CallState::Calling | CallState::Connected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Idle => "idle",
            CallState::Calling => "calling",
            CallState::Connected => "connected",
            CallState::Ended => "ended",
        }
    }
}

/// Who produced a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Caller,
    Agent,
}

/// Delay constants driving the call lifecycle.
///
/// These are presentation choices, not load-bearing semantics, so every one
/// of them is configurable. Defaults mirror the classic "agent picks up
/// after a few rings" pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallTimings {
    /// Interval between ring-tone bursts while calling
    pub ring_interval_ms: u64,
    /// How long the agent "rings" before answering
    pub answer_delay_ms: u64,
    /// Pause after connecting before the agent greets
    pub greeting_delay_ms: u64,
    /// Pause after the greeting before transcription starts
    pub listen_delay_ms: u64,
    /// Lower bound of the agent "thinking" pause
    pub thinking_min_ms: u64,
    /// Upper bound of the agent "thinking" pause
    pub thinking_max_ms: u64,
    /// Pause after an agent reply before transcription resumes
    pub resume_delay_ms: u64,
    /// How long the ended banner holds before returning to idle
    pub ended_delay_ms: u64,
    /// Call-duration timer tick
    pub duration_tick_ms: u64,
}

impl Default for CallTimings {
    fn default() -> Self {
        Self {
            ring_interval_ms: 1_000,
            answer_delay_ms: 3_500,
            greeting_delay_ms: 500,
            listen_delay_ms: 2_000,
            thinking_min_ms: 1_000,
            thinking_max_ms: 2_000,
            resume_delay_ms: 1_500,
            ended_delay_ms: 2_000,
            duration_tick_ms: 1_000,
        }
    }
}

impl CallTimings {
    pub fn ring_interval(&self) -> Duration {
        Duration::from_millis(self.ring_interval_ms)
    }

    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }

    pub fn listen_delay(&self) -> Duration {
        Duration::from_millis(self.listen_delay_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn ended_delay(&self) -> Duration {
        Duration::from_millis(self.ended_delay_ms)
    }

    pub fn duration_tick(&self) -> Duration {
        Duration::from_millis(self.duration_tick_ms)
    }

    /// Random "thinking" pause drawn uniformly from the configured range
    pub fn thinking_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let millis = if self.thinking_max_ms > self.thinking_min_ms {
            rng.gen_range(self.thinking_min_ms..=self.thinking_max_ms)
        } else {
            self.thinking_min_ms
        };
        Duration::from_millis(millis)
    }
}
