//! HTTP adapters for the hydrogen siting engine.
//!
//! - [`inventory`] fetches the asset inventory and implements
//!   [`hysite_core::AssetSource`].
//! - [`chat`] talks to an OpenAI-compatible chat completion endpoint and
//!   implements [`hysite_core::ChatCompletion`].
//!
//! Both adapters expose synchronous traits and bridge to `reqwest` through a
//! Tokio runtime they own; see [`BlockingRuntime`].

#![forbid(unsafe_code)]

pub mod chat;
pub mod inventory;
mod runtime;

pub use chat::{ChatClientConfig, GroqChatClient};
pub use inventory::{HttpAssetSource, HttpAssetSourceConfig};
pub use runtime::{BlockingRuntime, ClientBuildError};
