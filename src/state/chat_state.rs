//! Chat conversation state

use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{services::ChatClient, store::ChatHistoryStore};

/// Shown in place of a reply when the chat backend cannot be reached
pub const FALLBACK_REPLY: &str = "⚠️ Error: Couldn't get a reply.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One line of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }
}

/// Conversation plus the "bot is typing" flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
    /// Bumped by every clear, so replies to messages sent before it are dropped
    #[serde(skip)]
    generation: u64,
}

impl ChatState {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            typing: false,
            generation: 0,
        }
    }
}

/// The conversation, its persisted history and the backend it talks to
pub struct ChatSession {
    state: Mutex<ChatState>,
    history: ChatHistoryStore,
    client: Arc<dyn ChatClient>,
}

impl ChatSession {
    /// Restore the conversation saved in `history`
    pub fn restore(history: ChatHistoryStore, client: Arc<dyn ChatClient>) -> Self {
        let messages = history.load();
        debug!("Restored {} chat messages", messages.len());
        Self {
            state: Mutex::new(ChatState::new(messages)),
            history,
            client,
        }
    }

    pub fn snapshot(&self) -> ChatState {
        self.lock().clone()
    }

    /// Send `input` and append the bot's answer. Blank input is ignored and
    /// yields `None`, as does a reply that arrives after the conversation was
    /// cleared. A failed request appends [`FALLBACK_REPLY`] instead of
    /// erroring.
    pub async fn send(&self, input: &str) -> Option<ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        let generation = {
            let mut state = self.lock();
            state.messages.push(ChatMessage::new(input, Sender::User));
            state.typing = true;
            self.persist(&state.messages);
            state.generation
        };

        let text = match self.client.reply(input).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };
        let reply = ChatMessage::new(text, Sender::Bot);

        let mut state = self.lock();
        if state.generation != generation {
            debug!("Conversation was cleared while waiting, dropping reply");
            return None;
        }
        state.messages.push(reply.clone());
        state.typing = false;
        self.persist(&state.messages);
        Some(reply)
    }

    /// Drop the whole conversation
    pub fn clear(&self) {
        let mut state = self.lock();
        state.messages.clear();
        state.typing = false;
        state.generation += 1;
        if let Err(e) = self.history.clear() {
            warn!("Failed to clear chat history: {}", e);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, messages: &[ChatMessage]) {
        if let Err(e) = self.history.save(messages) {
            warn!("Failed to persist chat history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ClientError, store::MemoryStore};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct EchoClient;

    #[async_trait]
    impl ChatClient for EchoClient {
        async fn reply(&self, message: &str) -> Result<String, ClientError> {
            Ok(format!("**echo:** {}", message))
        }
    }

    struct DownClient;

    #[async_trait]
    impl ChatClient for DownClient {
        async fn reply(&self, _message: &str) -> Result<String, ClientError> {
            Err(ClientError::Status {
                endpoint: "chat".to_string(),
                status: 502,
                body: String::new(),
            })
        }
    }

    /// Holds every reply until released
    #[derive(Default)]
    struct GatedClient {
        release: Notify,
    }

    #[async_trait]
    impl ChatClient for GatedClient {
        async fn reply(&self, message: &str) -> Result<String, ClientError> {
            self.release.notified().await;
            Ok(format!("late answer to {}", message))
        }
    }

    fn session(client: Arc<dyn ChatClient>) -> (Arc<MemoryStore>, ChatSession) {
        let kv = Arc::new(MemoryStore::new());
        let session = ChatSession::restore(ChatHistoryStore::new(kv.clone()), client);
        (kv, session)
    }

    #[tokio::test]
    async fn reply_is_appended_and_persisted() {
        let (kv, chat) = session(Arc::new(EchoClient));

        let reply = chat.send("what is a monad?").await.unwrap();
        assert_eq!(reply, ChatMessage::new("**echo:** what is a monad?", Sender::Bot));

        let state = chat.snapshot();
        assert!(!state.typing);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].sender, Sender::User);

        let restored = ChatSession::restore(ChatHistoryStore::new(kv), Arc::new(EchoClient));
        assert_eq!(restored.snapshot().messages, state.messages);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (_, chat) = session(Arc::new(EchoClient));

        assert!(chat.send("   \n").await.is_none());
        assert!(chat.snapshot().messages.is_empty());
    }

    #[tokio::test]
    async fn failure_appends_fallback() {
        let (_, chat) = session(Arc::new(DownClient));

        let reply = chat.send("hello").await.unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert_eq!(chat.snapshot().messages.len(), 2);
        assert!(!chat.snapshot().typing);
    }

    #[tokio::test]
    async fn clear_empties_conversation() {
        let (kv, chat) = session(Arc::new(EchoClient));
        chat.send("hello").await;

        chat.clear();
        assert!(chat.snapshot().messages.is_empty());
        assert!(kv.is_empty());
    }

    #[tokio::test]
    async fn reply_after_clear_is_dropped() {
        let client = Arc::new(GatedClient::default());
        let (kv, chat) = session(client.clone());
        let chat = Arc::new(chat);

        let pending = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("still there?").await }
        });
        while !chat.snapshot().typing {
            tokio::task::yield_now().await;
        }

        chat.clear();
        assert!(!chat.snapshot().typing);

        client.release.notify_one();
        assert!(pending.await.unwrap().is_none());

        let state = chat.snapshot();
        assert!(state.messages.is_empty());
        assert!(!state.typing);
        assert!(kv.is_empty());
    }
}
