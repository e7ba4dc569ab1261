use async_trait::async_trait;

use crate::domain::token::errors::NotifierError;
use crate::domain::token::ports::Notifier;

/// Notifier that writes the message to the log instead of delivering it.
///
/// Used when no delivery channel is configured (mirrors the upstream email
/// service, which degrades to console output without an API key) and in
/// local development, where the setup link in the log is the fastest way to
/// finish the flow.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        tracing::info!(
            address = %address,
            subject = %subject,
            body = %body,
            "Notification (log delivery)"
        );
        Ok(())
    }
}
