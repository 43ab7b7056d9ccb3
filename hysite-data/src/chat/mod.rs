//! Chat completion adapter.
//!
//! [`GroqChatClient`] implements [`ChatCompletion`](hysite_core::ChatCompletion)
//! against any OpenAI-compatible endpoint; the defaults target Groq.

mod client;
pub mod wire;

pub use client::{
    ChatClientConfig, DEFAULT_API_KEY_ENV, DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL,
    GroqChatClient,
};
