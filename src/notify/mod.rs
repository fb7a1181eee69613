pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;

pub use telegram::TelegramNotifier;

/// Capability for delivering a finished report to its destination channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` as a single text payload.
    async fn send(&self, message: &str) -> Result<()>;
}
