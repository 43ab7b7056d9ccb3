//! Deterministic collaborators for unit and behaviour tests.
//!
//! Each double records how it was called so tests can assert on the number of
//! inventory fetches or on the chat history that reached a completion backend.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    Asset, AssetSource, AssetSourceError, ChatCompletion, ChatMessage, CompletionError,
    FactorScores, ModelError, ModelScorer, NarrativeContext, NarrativeSource,
};

/// In-memory [`AssetSource`] that counts how often it is queried.
#[derive(Debug)]
pub struct MemoryAssetSource {
    result: Result<Vec<Asset>, AssetSourceError>,
    fetches: AtomicUsize,
}

impl MemoryAssetSource {
    /// Serve `assets` on every fetch.
    pub fn with_assets<I>(assets: I) -> Self
    where
        I: IntoIterator<Item = Asset>,
    {
        Self {
            result: Ok(assets.into_iter().collect()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Fail every fetch with `error`.
    #[must_use]
    pub const fn failing(error: AssetSourceError) -> Self {
        Self {
            result: Err(error),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MemoryAssetSource {
    fn default() -> Self {
        Self::with_assets([])
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Model double with a fixed behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StubModel {
    /// Always predict the same score.
    Constant(f64),
    /// Predict the unweighted mean of the factor scores.
    Mean,
    /// Fail every prediction as if the artefact were missing.
    Unavailable,
}

impl ModelScorer for StubModel {
    #[expect(clippy::float_arithmetic, reason = "mean of three scores")]
    fn predict(&self, scores: &FactorScores) -> Result<f64, ModelError> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Mean => Ok(scores.as_array().iter().sum::<f64>() / 3.0),
            Self::Unavailable => Err(ModelError::InvalidArtefact {
                reason: "stub model unavailable".to_owned(),
            }),
        }
    }
}

/// [`ChatCompletion`] that replays scripted replies in order.
///
/// Once the script runs out every call fails with
/// [`CompletionError::EmptyResponse`]. Each request's message history is
/// recorded for inspection.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompletion {
    /// Script the given outcomes.
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, CompletionError>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script a sequence of successful replies.
    pub fn replying<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(replies.into_iter().map(|reply| Ok(reply.into())))
    }

    /// Script a single failure.
    #[must_use]
    pub fn failing(error: CompletionError) -> Self {
        Self::new([Err(error)])
    }

    /// Message histories received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl ChatCompletion for ScriptedCompletion {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or(Err(CompletionError::EmptyResponse))
    }
}

/// [`NarrativeSource`] returning a fixed summary and counting calls.
#[derive(Debug, Default)]
pub struct FixedNarrative {
    text: String,
    calls: AtomicUsize,
}

impl FixedNarrative {
    /// Always narrate `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of narratives produced so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NarrativeSource for FixedNarrative {
    fn narrate(&self, _context: &NarrativeContext) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }
}
