//! Call lifecycle integration tests
//!
//! Drives the controller through real (shortened) timings with scripted
//! collaborators and checks the observable call behavior: state
//! transitions, transcript contents, duration, and the stale-callback
//! guarantees.

use async_trait::async_trait;
use hotline::application::CallController;
use hotline::domain::agent::ResponseService;
use hotline::domain::call::{CallEvent, CallState, CallTimings, Speaker, Transcript};
use hotline::domain::speech::{SpeechSynthesizer, Transcriber, TranscriberEvent};
use hotline::infrastructure::agent::CannedResponder;
use hotline::infrastructure::speech::{PacedSynthesizer, ScriptedTranscriber, UnsupportedTranscriber};
use hotline::DomainError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

fn test_timings() -> CallTimings {
    CallTimings {
        ring_interval_ms: 15,
        answer_delay_ms: 40,
        greeting_delay_ms: 5,
        listen_delay_ms: 10,
        thinking_min_ms: 5,
        thinking_max_ms: 10,
        resume_delay_ms: 5,
        ended_delay_ms: 30,
        duration_tick_ms: 20,
    }
}

fn fast_synthesizer() -> Arc<dyn SpeechSynthesizer> {
    Arc::new(PacedSynthesizer::new(1))
}

fn scripted(utterances: &[&str], cadence_ms: u64) -> Arc<dyn Transcriber> {
    Arc::new(ScriptedTranscriber::new(
        utterances.iter().map(|s| s.to_string()).collect(),
        Duration::from_millis(cadence_ms),
    ))
}

fn canned_controller(utterances: &[&str]) -> Arc<CallController> {
    CallController::new(
        test_timings(),
        scripted(utterances, 10),
        fast_synthesizer(),
        Arc::new(CannedResponder::new()),
    )
}

fn collect_events(controller: &Arc<CallController>) -> Arc<Mutex<Vec<CallEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            sink.lock().unwrap().push(event);
        }
    });
    events
}

/// Transcriber whose emissions the test drives by hand. The stored sender
/// deliberately survives `stop`, standing in for a platform engine that
/// fires a result after the call is torn down.
#[derive(Default)]
struct ManualTranscriber {
    sender: Mutex<Option<mpsc::Sender<TranscriberEvent>>>,
}

impl ManualTranscriber {
    fn emit(&self, event: TranscriberEvent) {
        if let Some(tx) = self.sender.lock().unwrap().clone() {
            let _ = tx.try_send(event);
        }
    }
}

#[async_trait]
impl Transcriber for ManualTranscriber {
    async fn start(&self, events: mpsc::Sender<TranscriberEvent>) -> hotline::Result<()> {
        *self.sender.lock().unwrap() = Some(events);
        Ok(())
    }

    async fn stop(&self) {}
}

struct FailingResponder;

#[async_trait]
impl ResponseService for FailingResponder {
    async fn greeting(&self) -> hotline::Result<String> {
        Err(DomainError::ResponderUnavailable("offline".to_string()))
    }

    async fn reply(&self, _transcript: &Transcript) -> hotline::Result<String> {
        Err(DomainError::ResponderUnavailable("offline".to_string()))
    }
}

// Scenario A: start -> ring delay -> connected with exactly one greeting.
#[tokio::test]
async fn call_connects_and_greets_once() {
    let controller = canned_controller(&[]);
    let events = collect_events(&controller);

    controller.start_call().await.unwrap();
    assert_eq!(controller.state(), CallState::Calling);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.state(), CallState::Connected);

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].speaker(), Speaker::Agent);

    // The caller heard at least one ring before the agent picked up
    let rings = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, CallEvent::RingTone))
        .count();
    assert!(rings >= 1);

    controller.end_call().await.unwrap();
}

// Scenario B: a transcribed utterance produces a caller message followed by
// exactly one agent reply.
#[tokio::test]
async fn transcribed_speech_gets_one_reply() {
    let controller = canned_controller(&["I need help"]);

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0].speaker(), Speaker::Agent);
    assert_eq!(transcript[1].speaker(), Speaker::Caller);
    assert_eq!(transcript[1].text(), "I need help");
    assert_eq!(transcript[2].speaker(), Speaker::Agent);

    controller.end_call().await.unwrap();
}

// Scenario C: hanging up while calling goes ended then idle, transcript
// empty at idle.
#[tokio::test]
async fn hangup_while_calling_returns_to_idle() {
    let controller = canned_controller(&[]);

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(controller.state(), CallState::Calling);

    controller.end_call().await.unwrap();
    assert_eq!(controller.state(), CallState::Ended);
    assert!(controller.transcript().is_empty());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(controller.state(), CallState::Idle);
    assert!(controller.transcript().is_empty());
}

// Scenario D: mute changes neither the call state nor an active
// transcription session.
#[tokio::test]
async fn mute_leaves_state_and_listening_alone() {
    let controller = canned_controller(&[]);

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.state(), CallState::Connected);
    assert!(controller.is_listening());

    controller.toggle_mute();
    assert!(controller.is_muted());
    assert_eq!(controller.state(), CallState::Connected);
    assert!(controller.is_listening());

    controller.toggle_mute();
    assert!(!controller.is_muted());

    controller.end_call().await.unwrap();
}

#[tokio::test]
async fn duration_runs_only_while_connected() {
    let controller = canned_controller(&[]);

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(controller.duration_seconds(), 0);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(controller.state(), CallState::Connected);
    assert!(controller.duration_seconds() >= 2);

    controller.end_call().await.unwrap();
    assert_eq!(controller.duration_seconds(), 0);
}

#[tokio::test]
async fn stale_transcript_after_hangup_is_discarded() {
    let transcriber = Arc::new(ManualTranscriber::default());
    let controller = CallController::new(
        test_timings(),
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        fast_synthesizer(),
        Arc::new(CannedResponder::new()),
    );
    let events = collect_events(&controller);

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(controller.is_listening());

    controller.end_call().await.unwrap();
    let ended_event_count = events.lock().unwrap().len();

    // A recognition result that was in flight when the caller hung up
    transcriber.emit(TranscriberEvent::Transcript("too late".to_string()));
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(controller.state(), CallState::Idle);
    assert!(controller.transcript().is_empty());

    // Nothing but the ended->idle transition was published afterwards
    let events = events.lock().unwrap();
    for event in &events[ended_event_count..] {
        assert!(!matches!(event, CallEvent::MessageAppended { .. }));
    }
}

#[tokio::test]
async fn transcription_error_clears_listening_but_not_the_call() {
    let transcriber = Arc::new(ManualTranscriber::default());
    let controller = CallController::new(
        test_timings(),
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        fast_synthesizer(),
        Arc::new(CannedResponder::new()),
    );

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(controller.is_listening());

    transcriber.emit(TranscriberEvent::Error("no-speech".to_string()));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(controller.state(), CallState::Connected);
    assert!(!controller.is_listening());

    controller.end_call().await.unwrap();
}

#[tokio::test]
async fn empty_transcripts_are_ignored() {
    let transcriber = Arc::new(ManualTranscriber::default());
    let controller = CallController::new(
        test_timings(),
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        fast_synthesizer(),
        Arc::new(CannedResponder::new()),
    );

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    transcriber.emit(TranscriberEvent::Transcript("   ".to_string()));
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Only the greeting
    assert_eq!(controller.transcript().len(), 1);

    controller.end_call().await.unwrap();
}

#[tokio::test]
async fn failed_responder_degrades_but_call_continues() {
    let controller = CallController::new(
        test_timings(),
        scripted(&["anyone there?"], 10),
        fast_synthesizer(),
        Arc::new(FailingResponder),
    );

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(controller.state(), CallState::Connected);
    let transcript = controller.transcript();
    // The caller line made it in; no greeting and no reply ever arrived
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].speaker(), Speaker::Caller);

    // Listening resumed after the failed reply attempt
    assert!(controller.is_listening());

    controller.end_call().await.unwrap();
}

#[tokio::test]
async fn missing_speech_support_yields_a_silent_call() {
    let controller = CallController::new(
        test_timings(),
        Arc::new(UnsupportedTranscriber),
        fast_synthesizer(),
        Arc::new(CannedResponder::new()),
    );

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Connected with the greeting, but never listening
    assert_eq!(controller.state(), CallState::Connected);
    assert!(!controller.is_listening());
    assert_eq!(controller.transcript().len(), 1);

    controller.end_call().await.unwrap();
}

#[tokio::test]
async fn a_new_call_starts_clean() {
    let controller = canned_controller(&["first call utterance"]);

    controller.start_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(controller.transcript().len() >= 3);

    controller.end_call().await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(controller.state(), CallState::Idle);

    controller.start_call().await.unwrap();
    assert_eq!(controller.state(), CallState::Calling);
    assert!(controller.transcript().is_empty());
    assert_eq!(controller.duration_seconds(), 0);

    tokio::time::sleep(Duration::from_millis(150)).await;
    // Fresh greeting, nothing from the first call
    assert_eq!(controller.transcript().len(), 1);

    controller.end_call().await.unwrap();
}
