//! Blocking client for OpenAI-compatible chat completion endpoints.

use std::fmt;
use std::time::Duration;

use hysite_core::{ChatCompletion, ChatMessage, CompletionError};
use reqwest::Client;

use super::wire::{CompletionRequest, CompletionResponse};
use crate::runtime::{BlockingRuntime, ClientBuildError, http_client};

/// Default API base URL (Groq's OpenAI-compatible endpoint).
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier.
pub const DEFAULT_CHAT_MODEL: &str = "llama3-8b-8192";

/// Environment variable consulted when no key is configured.
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

const DEFAULT_USER_AGENT: &str = "hysite-chat/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`GroqChatClient`].
///
/// The API key is resolved on every call: an explicit `api_key` wins,
/// otherwise the variable named by `api_key_env` is read.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatClientConfig {
    /// API base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Explicit API key.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with each request.
    pub user_agent: String,
}

impl fmt::Debug for ChatClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClientConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHAT_BASE_URL.to_owned(),
            model: DEFAULT_CHAT_MODEL.to_owned(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ChatClientConfig {
    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use an explicit API key instead of the environment.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read the API key from a different environment variable.
    #[must_use]
    pub fn with_api_key_env(mut self, variable: impl Into<String>) -> Self {
        self.api_key_env = variable.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full URL of the completion endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Resolve the API key from configuration or the environment.
    ///
    /// # Errors
    /// Returns [`CompletionError::MissingCredential`] naming `api_key_env`
    /// when neither source provides a non-blank key.
    pub fn resolve_api_key(&self) -> Result<String, CompletionError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CompletionError::MissingCredential {
                variable: self.api_key_env.clone(),
            })
    }
}

/// [`ChatCompletion`] over an OpenAI-compatible HTTP API.
///
/// Sends `{ model, messages }` with bearer authentication and returns the
/// first choice's content. Calls are not retried.
///
/// # Example
///
/// ```no_run
/// use hysite_core::{ChatCompletion, ChatMessage};
/// use hysite_data::{ChatClientConfig, GroqChatClient};
///
/// let client = GroqChatClient::with_config(ChatClientConfig::default())?;
/// let reply = client.complete(&[ChatMessage::user("Summarise site A.")])?;
/// println!("{reply}");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct GroqChatClient {
    client: Client,
    config: ChatClientConfig,
    runtime: BlockingRuntime,
}

impl GroqChatClient {
    /// Create a client with the default Groq configuration.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the HTTP client or runtime cannot be
    /// built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(ChatClientConfig::default())
    }

    /// Create a client from explicit configuration.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the HTTP client or runtime cannot be
    /// built.
    pub fn with_config(config: ChatClientConfig) -> Result<Self, ClientBuildError> {
        let client = http_client(&config.user_agent, config.timeout)?;
        let runtime = BlockingRuntime::new()?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Borrow the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    async fn complete_async(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let url = self.config.completions_url();
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let completion: CompletionResponse =
            response
                .json()
                .await
                .map_err(|err| CompletionError::Parse {
                    message: err.to_string(),
                })?;
        completion
            .into_content()
            .ok_or(CompletionError::EmptyResponse)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> CompletionError {
        if error.is_timeout() {
            return CompletionError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return CompletionError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        CompletionError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl ChatCompletion for GroqChatClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let api_key = self.config.resolve_api_key()?;
        log::debug!(
            "requesting chat completion from {} with {} message(s)",
            self.config.model,
            messages.len()
        );
        self.runtime
            .block_on(self.complete_async(&api_key, messages))
    }
}
