//! Site suitability scoring for hydrogen infrastructure.
//!
//! The crate turns an asset inventory into three factor scores and combines
//! them into a recommendation:
//! - [`InfrastructureScorer`] rewards nearby hydrogen, transport and renewable
//!   generation assets using exponential proximity weights.
//! - [`EnvironmentalScorer`] balances land suitability, water and climate
//!   resilience against zoning and biodiversity penalties.
//! - [`EconomicScorer`] combines cluster cost efficiency, subsidy zones and
//!   cluster proximity.
//!
//! [`SiteAnalyser`] runs the three scorers over a single inventory fetch,
//! applies a [`ModelScorer`](hysite_core::ModelScorer) such as
//! [`ArtefactModel`], and blends the result with the caller's weights.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use hysite_core::SiteQuery;
//! use hysite_core::test_support::MemoryAssetSource;
//! use hysite_scorer::{ArtefactModel, SiteAnalyser};
//!
//! let model = ArtefactModel::load(Utf8Path::new("artifacts/model.json")).expect("load model");
//! let analyser = SiteAnalyser::new(MemoryAssetSource::default(), model);
//! let assessment = analyser
//!     .analyse(&SiteQuery::new(12.9716, 77.5946, 5.0))
//!     .expect("score site");
//! assert!(assessment.user_weighted_score <= 1.0);
//! ```

#![forbid(unsafe_code)]

mod analysis;
mod economic;
mod environmental;
mod factor;
mod infrastructure;
mod model;

pub use analysis::{
    AnalysisConfig, AnalysisError, NoNarrative, SiteAnalyser, SiteAssessment,
    SiteAssessmentReport,
};
pub use economic::{
    DEFAULT_CAPEX_BASELINE, DEFAULT_OPEX_BASELINE, EconomicBreakdown, EconomicScorer,
};
pub use environmental::{EnvironmentalBreakdown, EnvironmentalScorer};
pub use factor::{FactorEvaluation, FactorScorer};
pub use infrastructure::{INFRASTRUCTURE_TOP_K, InfrastructureBreakdown, InfrastructureScorer};
pub use model::{ArtefactModel, ModelArtefact, RegressionTree, TreeNode};
