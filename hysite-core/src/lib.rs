//! Core domain types for the hydrogen site scoring engine.
//!
//! This crate holds the vocabulary shared by the scorer, narrative, data and
//! CLI crates: assets and their categories, great-circle distance, the
//! brute-force proximity filter, factor outcomes, the two aggregation
//! strategies and the collaborator traits ([`AssetSource`], [`ModelScorer`],
//! [`ChatCompletion`], [`NarrativeSource`]). It performs no I/O of its own.

#![forbid(unsafe_code)]

mod aggregate;
mod asset;
mod chat;
mod distance;
mod factor;
mod model;
mod narrative;
mod proximity;
mod query;
mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use aggregate::{BLENDING_FACTOR, CategoryWeights, baseline_aggregate, weighted_blend};
pub use asset::{Asset, AssetCategory, ScoredAsset, ScoringDomain};
pub use chat::{ChatCompletion, ChatMessage, ChatRole, CompletionError};
pub use distance::{EARTH_RADIUS_KM, haversine_km, haversine_km_between};
pub use factor::{
    FALLBACK_SCORE, FactorOutcome, FactorScores, FactorStatus, FallbackReason, ScoringError,
    sanitise_score,
};
pub use model::{ModelError, ModelScorer, checked_model_score};
pub use narrative::{NarrativeContext, NarrativeSource};
pub use proximity::{CategoryTally, fetch_nearby_assets, nearby_assets, proximity_factor};
pub use query::{RequestError, SearchArea, SiteQuery, SiteQueryPayload};
pub use source::{AssetSnapshot, AssetSource, AssetSourceError};
