//! Facade crate for the hydrogen infrastructure siting engine.
//!
//! This crate re-exports the domain types, the factor scorers and the report
//! conversation layer. The HTTP adapters for the asset inventory and the chat
//! completion service sit behind the default `http` feature.

#![forbid(unsafe_code)]

pub use hysite_core::{
    Asset, AssetCategory, AssetSnapshot, AssetSource, AssetSourceError, CategoryWeights,
    ChatCompletion, ChatMessage, ChatRole, CompletionError, FactorOutcome, FactorScores,
    FactorStatus, FallbackReason, ModelError, ModelScorer, NarrativeContext, NarrativeSource,
    RequestError, ScoredAsset, ScoringDomain, ScoringError, SearchArea, SiteQuery,
    SiteQueryPayload, fetch_nearby_assets, haversine_km, nearby_assets,
};

pub use hysite_scorer::{
    AnalysisConfig, AnalysisError, ArtefactModel, EconomicScorer, EnvironmentalScorer,
    FactorScorer, InfrastructureScorer, ModelArtefact, SiteAnalyser, SiteAssessment,
    SiteAssessmentReport,
};

pub use hysite_narrative::{
    ComparisonError, ComparisonReply, ComparisonRequest, ConversationStore,
    ConversationStoreConfig, NarrativeWriter, Report, ReportComparator,
};

#[cfg(feature = "http")]
pub use hysite_data::{
    ChatClientConfig, ClientBuildError, GroqChatClient, HttpAssetSource, HttpAssetSourceConfig,
};
