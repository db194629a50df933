use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Publisher;

pub const USERNAME: &str = "Congratulations, you got an internship!";
pub const AVATAR_URL: &str =
    "https://cdn.iconscout.com/icon/free/png-256/celebration-party-popper-tada-decoration-christmas-38099.png";
pub const EMBED_COLOR: u32 = 65280;

#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Option<Duration>,
}

impl DiscordNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Publisher for DiscordNotifier {
    /// One POST, no retry. The status is handed back for logging only.
    async fn publish(&self, message: &WebhookMessage) -> Result<u16> {
        let mut req = self.client.post(&self.webhook).json(message);
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }
        let rsp = req.send().await.context("discord webhook request failed")?;
        Ok(rsp.status().as_u16())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub username: String,
    pub avatar_url: String,
    pub attachments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WebhookMessage {
    pub fn single_embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
            username: USERNAME.to_string(),
            avatar_url: AVATAR_URL.to_string(),
            attachments: Vec::new(),
        }
    }

    pub fn push_field(&mut self, field: EmbedField) {
        if let Some(embed) = self.embeds.first_mut() {
            embed.fields.push(field);
        }
    }
}
