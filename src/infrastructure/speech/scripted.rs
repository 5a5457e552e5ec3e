//! Scripted transcriber
//!
//! Stands in for a platform speech-recognition engine: each `start` emits
//! the next queued utterance after a fixed cadence, as a browser engine
//! would deliver a final transcript once the caller stops speaking. Drives
//! the demo binary and the integration tests.

use crate::domain::shared::result::Result;
use crate::domain::speech::{Transcriber, TranscriberEvent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct ScriptedTranscriber {
    utterances: Arc<Mutex<VecDeque<String>>>,
    cadence: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ScriptedTranscriber {
    pub fn new(utterances: Vec<String>, cadence: Duration) -> Self {
        Self {
            utterances: Arc::new(Mutex::new(utterances.into())),
            cadence,
            task: Mutex::new(None),
        }
    }

    /// Utterances not yet delivered
    pub fn remaining(&self) -> usize {
        self.utterances.lock().unwrap().len()
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn start(&self, events: mpsc::Sender<TranscriberEvent>) -> Result<()> {
        self.cancel_pending();
        let utterances = Arc::clone(&self.utterances);
        let cadence = self.cadence;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(cadence).await;
            let next = utterances.lock().unwrap().pop_front();
            if let Some(text) = next {
                let _ = events.send(TranscriberEvent::Transcript(text)).await;
            }
        });
        *self.task.lock().unwrap() = Some(handle);
        Ok(())
    }

    async fn stop(&self) {
        self.cancel_pending();
    }
}
