//! Console presentation
//!
//! Formatting for the call-status line and transcript, plus an observer task
//! that prints call events as they happen.

use crate::domain::call::{CallEvent, CallState, Message, Speaker};
use crate::infrastructure::audio::tone;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// `mm:ss` call duration
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// The status-banner text for a state
pub fn state_label(state: CallState, duration_seconds: u64) -> String {
    match state {
        CallState::Idle => "Ready to Call".to_string(),
        CallState::Calling => "Calling...".to_string(),
        CallState::Connected => format!("Connected - {}", format_duration(duration_seconds)),
        CallState::Ended => "Call Ended".to_string(),
    }
}

pub fn speaker_label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Caller => "Caller",
        Speaker::Agent => "Agent",
    }
}

/// One transcript line
pub fn render_message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.timestamp().format("%H:%M:%S"),
        speaker_label(message.speaker()),
        message.text()
    )
}

/// Print call events until the controller goes away.
pub fn spawn_printer(mut events: broadcast::Receiver<CallEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ring = tone::ring_burst();
        loop {
            match events.recv().await {
                Ok(CallEvent::StateChanged { state }) => {
                    info!(state = state.as_str(), "call state changed");
                }
                Ok(CallEvent::MessageAppended { message }) => {
                    info!("{}", render_message(&message));
                }
                Ok(CallEvent::RingTone) => {
                    info!(samples = ring.len(), "ring");
                }
                Ok(CallEvent::DurationTick { seconds }) => {
                    debug!(elapsed = %format_duration(seconds), "call timer");
                }
                Ok(CallEvent::ListeningChanged { listening }) => {
                    info!(listening, "listening indicator");
                }
                Ok(CallEvent::MutedChanged { muted }) => {
                    info!(muted, "mute toggled");
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
