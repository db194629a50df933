pub mod discord;
pub mod format;

use anyhow::Result;

pub use discord::{DiscordNotifier, Embed, EmbedAuthor, EmbedField, WebhookMessage};

#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Deliver one message; returns the HTTP status code.
    async fn publish(&self, message: &WebhookMessage) -> Result<u16>;
}
