//! Conversational response port
//!
//! One capability interface with two variants: a canned-response picker and
//! a hosted realtime agent session. The controller treats every reply as an
//! opaque string to append and speak.

use crate::domain::call::transcript::Transcript;
use crate::domain::shared::result::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseService: Send + Sync {
    /// Establish the backing session. No-op for the canned variant; for the
    /// hosted variant a failure here leaves the service degraded, and later
    /// `reply` calls report [`crate::DomainError::ResponderUnavailable`].
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Tear down the backing session, if any.
    async fn disconnect(&self) {}

    /// The line the agent opens the call with.
    async fn greeting(&self) -> Result<String>;

    /// Produce the next agent reply given the conversation so far.
    async fn reply(&self, transcript: &Transcript) -> Result<String>;
}
