//! Synchronous bridge over the async HTTP clients.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Errors raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The `reqwest` client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The Tokio runtime could not be built.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// A current-thread Tokio runtime reused across blocking calls.
///
/// Outside any runtime, futures run on the owned runtime. Inside a
/// multi-threaded runtime the caller's handle is used through
/// [`tokio::task::block_in_place`], which avoids the nested-runtime panic.
/// Inside a `current_thread` runtime the owned runtime is used; this blocks
/// the caller's executor for the duration of the request.
pub struct BlockingRuntime {
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingRuntime")
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingRuntime {
    /// Build the owned runtime with IO and timers enabled.
    ///
    /// # Errors
    /// Returns [`ClientBuildError::Runtime`] when Tokio cannot start.
    pub fn new() -> Result<Self, ClientBuildError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self { runtime })
    }

    /// Drive `future` to completion from synchronous code.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Build a `reqwest` client with a shared user agent and timeout policy.
pub(crate) fn http_client(user_agent: &str, timeout: Duration) -> Result<Client, ClientBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ClientBuildError::HttpClient)
}
