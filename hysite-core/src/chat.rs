//! Chat completion contract shared by the narrative and comparison features.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions framing the conversation.
    System,
    /// A question or request from the user.
    User,
    /// A reply produced by the model.
    Assistant,
}

impl ChatRole {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message in a chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a message with an explicit role.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Errors raised by a chat completion backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// No API credential was configured.
    #[error("{variable} not found in environment variables")]
    MissingCredential {
        /// Environment variable expected to hold the credential.
        variable: String,
    },
    /// The backend answered with a non-success status.
    #[error("chat request to {url} failed with status {status}: {message}")]
    Http {
        /// Endpoint that was called.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The request never reached the backend.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Endpoint that was called.
        url: String,
        /// Transport diagnostic.
        message: String,
    },
    /// The backend did not answer in time.
    #[error("chat request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was called.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The backend answered without any message content.
    #[error("chat completion returned no content")]
    EmptyResponse,
    /// The response body could not be decoded.
    #[error("failed to parse chat completion: {message}")]
    Parse {
        /// Decoder diagnostic.
        message: String,
    },
}

/// Produces the next assistant message for a chat history.
pub trait ChatCompletion: Send + Sync {
    /// Complete `messages` and return the assistant's reply text.
    ///
    /// # Errors
    /// Returns [`CompletionError`] when the backend cannot produce a reply.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

impl<T: ChatCompletion + ?Sized> ChatCompletion for &T {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        (**self).complete(messages)
    }
}

impl<T: ChatCompletion + ?Sized> ChatCompletion for std::sync::Arc<T> {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        (**self).complete(messages)
    }
}
