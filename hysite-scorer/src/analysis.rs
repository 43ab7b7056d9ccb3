//! The site scoring operation.
//!
//! [`SiteAnalyser`] validates a [`SiteQuery`], fetches the asset inventory
//! once, scores the three factors against that single snapshot, aggregates
//! them with and without the model, and optionally asks a narrative source to
//! explain the result.

use hysite_core::{
    AssetSnapshot, AssetSource, BLENDING_FACTOR, FactorOutcome, FactorScores, ModelError,
    ModelScorer, NarrativeContext, NarrativeSource, RequestError, SiteQuery, baseline_aggregate,
    weighted_blend,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EconomicScorer, EnvironmentalScorer, FactorScorer, InfrastructureScorer};

/// Fatal outcomes of [`SiteAnalyser::analyse`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The query was rejected before any scoring ran.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),
    /// The recommendation model failed.
    #[error("model scoring failed: {0}")]
    Model(#[from] ModelError),
}

/// Placeholder narrative source for analysers built without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNarrative;

impl NarrativeSource for NoNarrative {
    fn narrate(&self, _context: &NarrativeContext) -> String {
        String::new()
    }
}

/// Tunable scorer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Share of the final score taken from the model score.
    pub blending_factor: f64,
    /// Infrastructure scorer settings.
    pub infrastructure: InfrastructureScorer,
    /// Economic scorer settings.
    pub economic: EconomicScorer,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            blending_factor: BLENDING_FACTOR,
            infrastructure: InfrastructureScorer::default(),
            economic: EconomicScorer::default(),
        }
    }
}

impl AnalysisConfig {
    /// Override the blending factor.
    #[must_use]
    pub const fn with_blending_factor(mut self, blending_factor: f64) -> Self {
        self.blending_factor = blending_factor;
        self
    }

    /// Override the infrastructure scorer.
    #[must_use]
    pub const fn with_infrastructure(mut self, scorer: InfrastructureScorer) -> Self {
        self.infrastructure = scorer;
        self
    }

    /// Override the economic scorer.
    #[must_use]
    pub const fn with_economic(mut self, scorer: EconomicScorer) -> Self {
        self.economic = scorer;
        self
    }
}

/// Full result of scoring one site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteAssessment {
    /// Infrastructure factor.
    pub infrastructure: FactorOutcome,
    /// Environmental factor.
    pub environmental: FactorOutcome,
    /// Economic factor.
    pub economic: FactorOutcome,
    /// Unweighted mean of the three factors.
    pub baseline_score: f64,
    /// Model recommendation score.
    pub model_score: f64,
    /// Model score blended with the caller's weighted preference.
    pub user_weighted_score: f64,
    /// Supplementary explanation, when a narrative source is configured.
    pub narrative: Option<String>,
}

impl SiteAssessment {
    /// The three factor scores in model order.
    #[must_use]
    pub const fn scores(&self) -> FactorScores {
        FactorScores::new(
            self.infrastructure.score,
            self.environmental.score,
            self.economic.score,
        )
    }

    /// Factors that fell back to the neutral score.
    pub fn fallbacks(&self) -> impl Iterator<Item = &FactorOutcome> {
        [&self.infrastructure, &self.environmental, &self.economic]
            .into_iter()
            .filter(|outcome| outcome.is_fallback())
    }

    /// Flatten into the serialisable response shape.
    #[must_use]
    pub fn report(&self) -> SiteAssessmentReport {
        SiteAssessmentReport::from(self)
    }
}

/// Serialisable response of the scoring operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAssessmentReport {
    /// Infrastructure factor score.
    pub infra_score: f64,
    /// Environmental factor score.
    pub env_score: f64,
    /// Economic factor score.
    pub econ_score: f64,
    /// Unweighted mean of the factor scores.
    pub baseline_score: f64,
    /// Model recommendation score.
    pub model_score: f64,
    /// Weighted blend of model score and preference.
    pub user_weighted_score: f64,
    /// Narrative summary, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// One entry per factor that fell back, e.g. `economic: ...`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<String>,
}

impl From<&SiteAssessment> for SiteAssessmentReport {
    fn from(assessment: &SiteAssessment) -> Self {
        let fallbacks = assessment
            .fallbacks()
            .filter_map(|outcome| match &outcome.status {
                hysite_core::FactorStatus::Fallback(reason) => {
                    Some(format!("{}: {reason}", outcome.domain))
                }
                _ => None,
            })
            .collect();
        Self {
            infra_score: assessment.infrastructure.score,
            env_score: assessment.environmental.score,
            econ_score: assessment.economic.score,
            baseline_score: assessment.baseline_score,
            model_score: assessment.model_score,
            user_weighted_score: assessment.user_weighted_score,
            narrative: assessment.narrative.clone(),
            fallbacks,
        }
    }
}

/// Scores candidate sites against an asset inventory and a model.
///
/// # Examples
/// ```
/// use hysite_core::test_support::{MemoryAssetSource, StubModel};
/// use hysite_core::SiteQuery;
/// use hysite_scorer::SiteAnalyser;
///
/// let analyser = SiteAnalyser::new(MemoryAssetSource::default(), StubModel::Mean);
/// let assessment = analyser.analyse(&SiteQuery::new(12.9716, 77.5946, 5.0))?;
/// assert_eq!(assessment.baseline_score, 0.0);
/// # Ok::<(), hysite_scorer::AnalysisError>(())
/// ```
#[derive(Debug)]
pub struct SiteAnalyser<S, M, N = NoNarrative> {
    source: S,
    model: M,
    narrative: Option<N>,
    config: AnalysisConfig,
}

impl<S, M> SiteAnalyser<S, M, NoNarrative>
where
    S: AssetSource,
    M: ModelScorer,
{
    /// Build an analyser with default settings and no narrative.
    pub fn new(source: S, model: M) -> Self {
        Self {
            source,
            model,
            narrative: None,
            config: AnalysisConfig::default(),
        }
    }
}

impl<S, M, N> SiteAnalyser<S, M, N>
where
    S: AssetSource,
    M: ModelScorer,
    N: NarrativeSource,
{
    /// Explain every assessment with `narrative`.
    pub fn with_narrative<T: NarrativeSource>(self, narrative: T) -> SiteAnalyser<S, M, T> {
        SiteAnalyser {
            source: self.source,
            model: self.model,
            narrative: Some(narrative),
            config: self.config,
        }
    }

    /// Replace the scorer settings.
    #[must_use]
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// The asset source backing this analyser.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Score the site described by `query`.
    ///
    /// The inventory is fetched once and shared by the three scorers. Factor
    /// failures degrade to the neutral fallback and are reported in the
    /// returned outcomes; only request validation and model failures abort.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidRequest`] before any I/O when the query
    /// is malformed, and [`AnalysisError::Model`] when the model cannot
    /// produce a score.
    pub fn analyse(&self, query: &SiteQuery) -> Result<SiteAssessment, AnalysisError> {
        query.validate()?;
        let area = query.area();
        let snapshot = AssetSnapshot::fetch(&self.source);

        let infrastructure = self.config.infrastructure.assess(&snapshot, &area);
        let environmental = EnvironmentalScorer.assess(&snapshot, &area);
        let economic = self.config.economic.assess(&snapshot, &area);

        let scores = FactorScores::new(infrastructure.score, environmental.score, economic.score);
        let baseline_score = baseline_aggregate(&scores);
        let model_score = self.model.predict(&scores)?;
        let user_weighted_score = weighted_blend(
            model_score,
            &scores,
            &query.weights,
            self.config.blending_factor,
        );
        log::info!(
            "scored site ({}, {}) r={}km: infra={:.3} env={:.3} econ={:.3} baseline={:.3} model={:.3} weighted={:.3}",
            query.latitude,
            query.longitude,
            query.radius_km,
            scores.infrastructure,
            scores.environmental,
            scores.economic,
            baseline_score,
            model_score,
            user_weighted_score
        );

        let narrative = self.narrative.as_ref().map(|source| {
            source.narrate(&NarrativeContext {
                scores,
                weights: query.weights,
                baseline_score,
                model_score,
                user_weighted_score,
                description: query.description.clone(),
            })
        });

        Ok(SiteAssessment {
            infrastructure,
            environmental,
            economic,
            baseline_score,
            model_score,
            user_weighted_score,
            narrative,
        })
    }
}
