//! Call session aggregate root

use crate::domain::call::entity::Message;
use crate::domain::call::event::CallEvent;
use crate::domain::call::transcript::Transcript;
use crate::domain::call::value_object::CallState;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::CallId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call session aggregate root
///
/// Owns the call state machine, the transcript, the duration counter and the
/// listening/mute flags, and enforces that every mutation happens along the
/// legal transition table.
///
/// The `generation` counter is the stale-callback guard: it is bumped every
/// time a call starts or ends, and scheduled work stamped with an older
/// generation is refused by [`CallSession::guard`]. A timer or transcription
/// callback that outlives the call it was scheduled for can therefore never
/// mutate the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    /// Identifier of the current call attempt
    id: CallId,
    /// Current state
    state: CallState,
    /// Transcript of the current call
    transcript: Transcript,
    /// Seconds elapsed since the call connected
    duration_seconds: u64,
    /// Whether transcription is currently active
    listening: bool,
    /// Whether outbound synthesized speech is suppressed
    muted: bool,
    /// Stale-callback guard, bumped on call start and call end
    generation: u64,
    /// When the current call was dialed
    dialed_at: Option<DateTime<Utc>>,
    /// When the current call connected
    connected_at: Option<DateTime<Utc>>,
    /// When the current call ended
    ended_at: Option<DateTime<Utc>>,
    /// Pending domain events
    #[serde(skip)]
    events: Vec<CallEvent>,
}

impl CallSession {
    pub fn new() -> Self {
        Self {
            id: CallId::new(),
            state: CallState::Idle,
            transcript: Transcript::new(),
            duration_seconds: 0,
            listening: false,
            muted: false,
            generation: 0,
            dialed_at: None,
            connected_at: None,
            ended_at: None,
            events: Vec::new(),
        }
    }

    /// Start a new call: Idle -> Calling
    ///
    /// Clears the transcript, resets the duration and opens a new generation.
    pub fn dial(&mut self) -> Result<()> {
        self.transition_to(CallState::Calling)?;
        self.id = CallId::new();
        self.transcript.clear();
        self.duration_seconds = 0;
        self.generation += 1;
        self.dialed_at = Some(Utc::now());
        self.connected_at = None;
        self.ended_at = None;
        self.record(CallEvent::StateChanged {
            state: CallState::Calling,
        });
        Ok(())
    }

    /// Record one ring-tone burst while calling
    pub fn ring(&mut self) -> Result<()> {
        if self.state != CallState::Calling {
            return Err(DomainError::InvalidOperation(
                "ring tone only plays while calling".to_string(),
            ));
        }
        self.record(CallEvent::RingTone);
        Ok(())
    }

    /// Agent picked up: Calling -> Connected
    pub fn connect(&mut self) -> Result<()> {
        self.transition_to(CallState::Connected)?;
        self.connected_at = Some(Utc::now());
        self.record(CallEvent::StateChanged {
            state: CallState::Connected,
        });
        Ok(())
    }

    /// Caller hung up: Calling | Connected -> Ended
    ///
    /// Clears the transcript, resets the duration, drops the listening flag
    /// and opens a new generation so pending callbacks go stale.
    pub fn hang_up(&mut self) -> Result<()> {
        self.transition_to(CallState::Ended)?;
        self.transcript.clear();
        self.duration_seconds = 0;
        self.set_listening(false);
        self.generation += 1;
        self.ended_at = Some(Utc::now());
        self.record(CallEvent::StateChanged {
            state: CallState::Ended,
        });
        Ok(())
    }

    /// Ended banner elapsed: Ended -> Idle
    pub fn finish(&mut self) -> Result<()> {
        self.transition_to(CallState::Idle)?;
        self.transcript.clear();
        self.record(CallEvent::StateChanged {
            state: CallState::Idle,
        });
        Ok(())
    }

    /// Advance the call-duration timer by one tick
    pub fn tick(&mut self) -> Result<()> {
        if self.state != CallState::Connected {
            return Err(DomainError::InvalidOperation(
                "duration only advances while connected".to_string(),
            ));
        }
        self.duration_seconds += 1;
        self.record(CallEvent::DurationTick {
            seconds: self.duration_seconds,
        });
        Ok(())
    }

    /// Append a message to the transcript
    pub fn push_message(&mut self, message: Message) -> Result<()> {
        if self.state != CallState::Connected {
            return Err(DomainError::InvalidOperation(
                "transcript is closed outside a connected call".to_string(),
            ));
        }
        self.transcript.push(message.clone());
        self.record(CallEvent::MessageAppended { message });
        Ok(())
    }

    pub fn set_listening(&mut self, listening: bool) {
        if self.listening != listening {
            self.listening = listening;
            self.record(CallEvent::ListeningChanged { listening });
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.record(CallEvent::MutedChanged { muted: self.muted });
        self.muted
    }

    /// Check that scheduled work is still current: same generation, expected
    /// state. Stale callbacks must discard themselves when this fails.
    pub fn guard(&self, generation: u64, expected: CallState) -> bool {
        self.generation == generation && self.state == expected
    }

    /// Transition to a new state
    fn transition_to(&mut self, new_state: CallState) -> Result<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(DomainError::InvalidStateTransition(format!(
                "Cannot transition from {:?} to {:?}",
                self.state, new_state
            )));
        }
        self.state = new_state;
        Ok(())
    }

    fn record(&mut self, event: CallEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn take_events(&mut self) -> Vec<CallEvent> {
        std::mem::take(&mut self.events)
    }

    // Getters
    pub fn id(&self) -> &CallId {
        &self.id
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn listening(&self) -> bool {
        self.listening
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dialed_at(&self) -> Option<&DateTime<Utc>> {
        self.dialed_at.as_ref()
    }

    pub fn connected_at(&self) -> Option<&DateTime<Utc>> {
        self.connected_at.as_ref()
    }

    pub fn ended_at(&self) -> Option<&DateTime<Utc>> {
        self.ended_at.as_ref()
    }
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}
