//! Call lifecycle controller
//!
//! Single owner of the call session: drives the timed transitions
//! (ring -> connect -> greet -> listen), runs the transcription/reply cycle
//! and coordinates the speech and agent-response collaborators. All timers
//! are tasks whose handles live here and are aborted on every exit path;
//! any callback that fires after cancellation re-checks the session
//! generation and discards itself.

use crate::domain::agent::ResponseService;
use crate::domain::call::{CallEvent, CallSession, CallState, CallTimings, Message};
use crate::domain::shared::result::Result;
use crate::domain::speech::{SpeechSynthesizer, Transcriber, TranscriberEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const TRANSCRIPT_CHANNEL_CAPACITY: usize = 16;

/// Handles of the scheduled tasks owned by the controller.
///
/// Exactly one ring loop and one duration ticker can be live at a time;
/// `abort_all` is the cancel-everything path used on hang-up.
#[derive(Default)]
struct TaskSet {
    ring: Option<JoinHandle<()>>,
    answer: Option<JoinHandle<()>>,
    duration: Option<JoinHandle<()>>,
    conversation: Option<JoinHandle<()>>,
    teardown: Option<JoinHandle<()>>,
}

impl TaskSet {
    fn abort_all(&mut self) {
        for handle in [
            self.ring.take(),
            self.answer.take(),
            self.duration.take(),
            self.conversation.take(),
            self.teardown.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

pub struct CallController {
    session: Mutex<CallSession>,
    timings: CallTimings,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    responder: Arc<dyn ResponseService>,
    events: broadcast::Sender<CallEvent>,
    tasks: Mutex<TaskSet>,
}

impl CallController {
    pub fn new(
        timings: CallTimings,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        responder: Arc<dyn ResponseService>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            session: Mutex::new(CallSession::new()),
            timings,
            transcriber,
            synthesizer,
            responder,
            events,
            tasks: Mutex::new(TaskSet::default()),
        })
    }

    /// Subscribe to call events
    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }

    /// Start a call. Only legal from idle.
    pub async fn start_call(self: &Arc<Self>) -> Result<()> {
        let generation = {
            let mut session = self.session.lock().unwrap();
            session.dial()?;
            self.publish(&mut session);
            session.generation()
        };

        self.spawn_ring(generation);
        self.spawn_answer(generation);

        // Hosted sessions connect while the phone rings; a failure degrades
        // the call to one without agent replies instead of failing it.
        if let Err(e) = self.responder.connect().await {
            error!(error = %e, "response service connect failed; call continues without agent replies");
        }

        Ok(())
    }

    /// End the call. Valid from calling or connected; a no-op otherwise.
    pub async fn end_call(self: &Arc<Self>) -> Result<()> {
        let generation = {
            let mut session = self.session.lock().unwrap();
            if !session.state().is_active() {
                return Ok(());
            }
            session.hang_up()?;
            self.publish(&mut session);
            session.generation()
        };

        // Cancel every pending timer before anything can await.
        self.tasks.lock().unwrap().abort_all();
        self.synthesizer.cancel_all();
        self.transcriber.stop().await;
        self.responder.disconnect().await;

        let ctrl = Arc::clone(self);
        let teardown = tokio::spawn(async move {
            tokio::time::sleep(ctrl.timings.ended_delay()).await;
            let mut session = ctrl.session.lock().unwrap();
            if !session.guard(generation, CallState::Ended) {
                return;
            }
            if session.finish().is_ok() {
                ctrl.publish(&mut session);
            }
        });
        self.tasks.lock().unwrap().teardown = Some(teardown);

        Ok(())
    }

    /// Toggle the mute flag. Muting cancels in-flight synthesis but never
    /// touches the call state or an active transcription session.
    pub fn toggle_mute(&self) {
        let muted = {
            let mut session = self.session.lock().unwrap();
            let muted = session.toggle_mute();
            self.publish(&mut session);
            muted
        };
        if muted {
            self.synthesizer.cancel_all();
        }
    }

    pub fn state(&self) -> CallState {
        self.session.lock().unwrap().state()
    }

    pub fn duration_seconds(&self) -> u64 {
        self.session.lock().unwrap().duration_seconds()
    }

    pub fn is_listening(&self) -> bool {
        self.session.lock().unwrap().listening()
    }

    pub fn is_muted(&self) -> bool {
        self.session.lock().unwrap().muted()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.session
            .lock()
            .unwrap()
            .transcript()
            .messages()
            .to_vec()
    }

    /// Ring loop: one burst immediately, then one per interval, until the
    /// call leaves the calling state.
    fn spawn_ring(self: &Arc<Self>, generation: u64) {
        let ctrl = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                {
                    let mut session = ctrl.session.lock().unwrap();
                    if !session.guard(generation, CallState::Calling) {
                        break;
                    }
                    if session.ring().is_err() {
                        break;
                    }
                    ctrl.publish(&mut session);
                }
                tokio::time::sleep(ctrl.timings.ring_interval()).await;
            }
        });
        self.tasks.lock().unwrap().ring = Some(handle);
    }

    /// Answer task: after the ring delay the agent "picks up", the duration
    /// timer starts, the agent greets and transcription begins.
    fn spawn_answer(self: &Arc<Self>, generation: u64) {
        let ctrl = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ctrl.timings.answer_delay()).await;
            {
                let mut session = ctrl.session.lock().unwrap();
                if !session.guard(generation, CallState::Calling) {
                    return;
                }
                if session.connect().is_err() {
                    return;
                }
                ctrl.publish(&mut session);
            }
            if let Some(ring) = ctrl.tasks.lock().unwrap().ring.take() {
                ring.abort();
            }
            ctrl.spawn_duration(generation);

            tokio::time::sleep(ctrl.timings.greeting_delay()).await;
            if !ctrl.guarded(generation, CallState::Connected) {
                return;
            }
            match ctrl.responder.greeting().await {
                Ok(text) => {
                    if ctrl.append_agent(generation, &text) {
                        ctrl.speak_if_unmuted(&text).await;
                    }
                }
                Err(e) => error!(error = %e, "agent greeting unavailable; call continues"),
            }

            tokio::time::sleep(ctrl.timings.listen_delay()).await;
            ctrl.begin_listening(generation).await;
        });
        self.tasks.lock().unwrap().answer = Some(handle);
    }

    /// Call-duration ticker, live only while connected.
    fn spawn_duration(self: &Arc<Self>, generation: u64) {
        let ctrl = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(ctrl.timings.duration_tick()).await;
                let mut session = ctrl.session.lock().unwrap();
                if !session.guard(generation, CallState::Connected) {
                    break;
                }
                if session.tick().is_err() {
                    break;
                }
                ctrl.publish(&mut session);
            }
        });
        self.tasks.lock().unwrap().duration = Some(handle);
    }

    /// Start transcription and the conversation loop that answers it.
    async fn begin_listening(self: &Arc<Self>, generation: u64) {
        if !self.transcriber.is_supported() {
            warn!("speech transcription unsupported; call continues in silent mode");
            return;
        }

        let (tx, rx) = mpsc::channel(TRANSCRIPT_CHANNEL_CAPACITY);
        if !self.set_listening(generation, true) {
            return;
        }
        if let Err(e) = self.transcriber.start(tx.clone()).await {
            warn!(error = %e, "failed to start transcription");
            self.set_listening(generation, false);
            return;
        }

        let ctrl = Arc::clone(self);
        let handle = tokio::spawn(async move {
            ctrl.conversation_loop(generation, tx, rx).await;
        });
        self.tasks.lock().unwrap().conversation = Some(handle);
    }

    async fn conversation_loop(
        self: Arc<Self>,
        generation: u64,
        tx: mpsc::Sender<TranscriberEvent>,
        mut rx: mpsc::Receiver<TranscriberEvent>,
    ) {
        while let Some(event) = rx.recv().await {
            match event {
                TranscriberEvent::Transcript(text) => {
                    let text = text.trim().to_string();
                    if text.is_empty() {
                        continue;
                    }
                    if !self.handle_utterance(generation, &text, &tx).await {
                        return;
                    }
                }
                TranscriberEvent::Error(reason) => {
                    warn!(%reason, "transcription error; call continues");
                    self.set_listening(generation, false);
                }
            }
        }
    }

    /// One transcription/response cycle: append the caller line, pause
    /// listening, think, reply, speak, then resume listening.
    ///
    /// Returns false when the call this cycle belongs to is over.
    async fn handle_utterance(
        self: &Arc<Self>,
        generation: u64,
        text: &str,
        tx: &mpsc::Sender<TranscriberEvent>,
    ) -> bool {
        {
            let mut session = self.session.lock().unwrap();
            if !session.guard(generation, CallState::Connected) {
                debug!("discarding stale transcript");
                return false;
            }
            if session.push_message(Message::caller(text)).is_err() {
                return false;
            }
            session.set_listening(false);
            self.publish(&mut session);
        }
        self.transcriber.stop().await;

        let thinking = {
            let mut rng = rand::thread_rng();
            self.timings.thinking_delay(&mut rng)
        };
        tokio::time::sleep(thinking).await;
        if !self.guarded(generation, CallState::Connected) {
            return false;
        }

        let transcript = self.session.lock().unwrap().transcript().clone();
        match self.responder.reply(&transcript).await {
            Ok(reply) => {
                if self.append_agent(generation, &reply) {
                    self.speak_if_unmuted(&reply).await;
                }
            }
            Err(e) => error!(error = %e, "agent reply unavailable; call continues"),
        }

        tokio::time::sleep(self.timings.resume_delay()).await;
        if !self.set_listening(generation, true) {
            return false;
        }
        if let Err(e) = self.transcriber.start(tx.clone()).await {
            warn!(error = %e, "failed to resume transcription");
            self.set_listening(generation, false);
        }
        true
    }

    fn append_agent(&self, generation: u64, text: &str) -> bool {
        let mut session = self.session.lock().unwrap();
        if !session.guard(generation, CallState::Connected) {
            debug!("discarding stale agent reply");
            return false;
        }
        if session.push_message(Message::agent(text)).is_err() {
            return false;
        }
        self.publish(&mut session);
        true
    }

    async fn speak_if_unmuted(&self, text: &str) {
        if self.is_muted() {
            debug!("muted; skipping synthesis");
            return;
        }
        if let Err(e) = self.synthesizer.speak(text).await {
            warn!(error = %e, "speech synthesis failed; call continues");
        }
    }

    /// Set the listening flag, refusing stale callers. Returns whether the
    /// guard held.
    fn set_listening(&self, generation: u64, listening: bool) -> bool {
        let mut session = self.session.lock().unwrap();
        if !session.guard(generation, CallState::Connected) {
            return false;
        }
        session.set_listening(listening);
        self.publish(&mut session);
        true
    }

    fn guarded(&self, generation: u64, expected: CallState) -> bool {
        self.session.lock().unwrap().guard(generation, expected)
    }

    /// Drain pending domain events to subscribers.
    fn publish(&self, session: &mut CallSession) {
        for event in session.take_events() {
            // Nobody listening is fine
            let _ = self.events.send(event);
        }
    }
}

impl Drop for CallController {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.abort_all();
        }
    }
}
