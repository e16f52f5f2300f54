//! Chat backend client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;

/// Produces a bot reply for a user message
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String, ClientError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Posts `{message}` to the chat endpoint and reads back `{reply}`
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    url: String,
}

impl HttpChatClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn reply(&self, message: &str) -> Result<String, ClientError> {
        debug!("POST {} ({} chars)", self.url, message.len());

        let resp = self
            .client
            .post(&self.url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint: self.url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let data: ChatResponse = resp.json().await.map_err(|source| ClientError::Decode {
            endpoint: self.url.clone(),
            source,
        })?;
        Ok(data.reply)
    }
}
