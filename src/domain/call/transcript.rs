//! Append-only call transcript

use crate::domain::call::entity::Message;
use serde::{Deserialize, Serialize};

/// Ordered message sequence for the duration of one call.
///
/// Messages are appended in observation order and the whole transcript is
/// cleared when a call starts and when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::agent("Hello!"));
        transcript.push(Message::caller("Hi"));
        transcript.push(Message::agent("How can I help?"));

        let texts: Vec<&str> = transcript.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["Hello!", "Hi", "How can I help?"]);
        assert_eq!(transcript.last().unwrap().text(), "How can I help?");
    }

    #[test]
    fn test_transcript_clear() {
        let mut transcript = Transcript::new();
        transcript.push(Message::caller("one"));
        assert_eq!(transcript.len(), 1);

        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }
}
