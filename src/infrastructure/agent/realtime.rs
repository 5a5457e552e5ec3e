//! Hosted realtime agent session
//!
//! Thin WebSocket client for the OpenAI Realtime API. `connect` opens the
//! session and configures it for text replies; `reply` forwards the latest
//! caller utterance and collects the streamed response. A failed connect
//! leaves the session absent: later calls report the responder as
//! unavailable instead of failing the call.

use crate::domain::agent::ResponseService;
use crate::domain::call::{Speaker, Transcript};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub api_key: String,
    pub model: String,
    pub instructions: String,
    pub endpoint: String,
}

impl RealtimeConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "wss://api.openai.com/v1/realtime";

    pub fn new(api_key: String, model: String, instructions: String) -> Self {
        Self {
            api_key,
            model,
            instructions,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

pub struct RealtimeResponder {
    config: RealtimeConfig,
    socket: Mutex<Option<WsStream>>,
}

impl RealtimeResponder {
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            config,
            socket: Mutex::new(None),
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.socket.lock().await.is_some()
    }

    fn client_request(&self) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request> {
        let url = format!("{}?model={}", self.config.endpoint, self.config.model);
        let mut request = url
            .into_client_request()
            .map_err(|e| DomainError::ResponderUnavailable(format!("bad endpoint: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|e| DomainError::Configuration(format!("invalid API key: {e}")))?;
        let headers = request.headers_mut();
        headers.insert("Authorization", bearer);
        headers.insert("OpenAI-Beta", HeaderValue::from_static("realtime=v1"));
        Ok(request)
    }

    /// Issue one request event and collect the streamed text reply.
    async fn request_text(&self, events: Vec<Value>) -> Result<String> {
        let mut guard = self.socket.lock().await;
        let socket = guard.as_mut().ok_or_else(|| {
            DomainError::ResponderUnavailable("no active realtime session".to_string())
        })?;

        for event in events {
            socket
                .send(WsMessage::Text(event.to_string()))
                .await
                .map_err(|e| DomainError::ResponderUnavailable(format!("send failed: {e}")))?;
        }

        let reply = tokio::time::timeout(RESPONSE_TIMEOUT, Self::collect_text(socket))
            .await
            .map_err(|_| {
                DomainError::ResponderUnavailable("timed out waiting for agent reply".to_string())
            })??;
        Ok(reply)
    }

    async fn collect_text(socket: &mut WsStream) -> Result<String> {
        let mut reply = String::new();
        while let Some(frame) = socket.next().await {
            let frame = frame
                .map_err(|e| DomainError::ResponderUnavailable(format!("receive failed: {e}")))?;
            let WsMessage::Text(payload) = frame else {
                continue;
            };
            let value: Value = match serde_json::from_str(&payload) {
                Ok(value) => value,
                Err(_) => continue,
            };
            match value.get("type").and_then(Value::as_str) {
                Some("response.text.delta") | Some("response.output_text.delta") => {
                    if let Some(delta) = value.get("delta").and_then(Value::as_str) {
                        reply.push_str(delta);
                    }
                }
                Some("response.done") => return Ok(reply),
                Some("error") => {
                    return Err(DomainError::ResponderUnavailable(format!(
                        "realtime error: {}",
                        value.get("error").unwrap_or(&Value::Null)
                    )));
                }
                _ => {}
            }
        }
        Err(DomainError::ResponderUnavailable(
            "realtime session closed".to_string(),
        ))
    }

    fn latest_caller_utterance(transcript: &Transcript) -> Option<&str> {
        transcript
            .messages()
            .iter()
            .rev()
            .find(|m| m.speaker() == Speaker::Caller)
            .map(|m| m.text())
    }
}

#[async_trait]
impl ResponseService for RealtimeResponder {
    async fn connect(&self) -> Result<()> {
        let request = self.client_request()?;
        let (mut socket, _) = connect_async(request).await.map_err(|e| {
            DomainError::ResponderUnavailable(format!("realtime connect failed: {e}"))
        })?;

        let update = json!({
            "type": "session.update",
            "session": {
                "instructions": self.config.instructions,
                "modalities": ["text"],
            }
        });
        socket
            .send(WsMessage::Text(update.to_string()))
            .await
            .map_err(|e| {
                DomainError::ResponderUnavailable(format!("session.update failed: {e}"))
            })?;

        *self.socket.lock().await = Some(socket);
        info!(model = %self.config.model, "realtime session connected");
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(mut socket) = self.socket.lock().await.take() {
            if let Err(e) = socket.close(None).await {
                warn!(error = %e, "realtime session close failed");
            }
        }
    }

    async fn greeting(&self) -> Result<String> {
        self.request_text(vec![json!({
            "type": "response.create",
            "response": {
                "modalities": ["text"],
                "instructions": "Greet the caller and ask how you can help.",
            }
        })])
        .await
    }

    async fn reply(&self, transcript: &Transcript) -> Result<String> {
        let utterance = Self::latest_caller_utterance(transcript).ok_or_else(|| {
            DomainError::InvalidOperation("no caller utterance to reply to".to_string())
        })?;
        self.request_text(vec![
            json!({
                "type": "conversation.item.create",
                "item": {
                    "type": "message",
                    "role": "user",
                    "content": [{ "type": "input_text", "text": utterance }],
                }
            }),
            json!({
                "type": "response.create",
                "response": { "modalities": ["text"] }
            }),
        ])
        .await
    }
}
