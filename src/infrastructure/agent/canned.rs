//! Canned response picker
//!
//! The offline agent variant: replies are drawn uniformly at random from a
//! fixed prompt list, with no repetition constraint. The greeting is the
//! first entry.

use crate::domain::agent::ResponseService;
use crate::domain::call::Transcript;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use rand::Rng;

const DEFAULT_RESPONSES: [&str; 10] = [
    "Hello! This is Agent Sarah. How can I help you today?",
    "I understand. Can you tell me more about that?",
    "That's interesting. What would you like to know?",
    "I see. Let me help you with that.",
    "Is there anything specific you'd like assistance with?",
    "Thank you for sharing that. How else can I support you?",
    "I'm here to help. What's your main concern today?",
    "That makes sense. Would you like me to explain further?",
    "I appreciate you calling. What can I do for you?",
    "Let me make sure I understand correctly...",
];

pub struct CannedResponder {
    responses: Vec<String>,
}

impl CannedResponder {
    pub fn new() -> Self {
        Self {
            responses: DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Use a custom prompt list; at least one entry is required.
    pub fn with_responses(responses: Vec<String>) -> Result<Self> {
        if responses.is_empty() {
            return Err(DomainError::InvalidOperation(
                "canned responder requires at least one response".to_string(),
            ));
        }
        Ok(Self { responses })
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseService for CannedResponder {
    async fn greeting(&self) -> Result<String> {
        Ok(self.responses[0].clone())
    }

    async fn reply(&self, _transcript: &Transcript) -> Result<String> {
        let pick = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0..self.responses.len())
        };
        Ok(self.responses[pick].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_list_is_rejected() {
        assert!(CannedResponder::with_responses(Vec::new()).is_err());
    }

    #[test]
    fn test_single_response_list_always_picked() {
        let responder =
            CannedResponder::with_responses(vec!["Only line".to_string()]).unwrap();
        let transcript = Transcript::new();
        for _ in 0..10 {
            let reply = tokio_test::block_on(responder.reply(&transcript)).unwrap();
            assert_eq!(reply, "Only line");
        }
    }

    #[test]
    fn test_replies_come_from_the_list() {
        let responder = CannedResponder::new();
        let transcript = Transcript::new();
        for _ in 0..50 {
            let reply = tokio_test::block_on(responder.reply(&transcript)).unwrap();
            assert!(responder.responses().contains(&reply));
        }
    }

    #[test]
    fn test_greeting_is_fixed() {
        let responder = CannedResponder::new();
        let greeting = tokio_test::block_on(responder.greeting()).unwrap();
        assert_eq!(greeting, DEFAULT_RESPONSES[0]);
    }
}
