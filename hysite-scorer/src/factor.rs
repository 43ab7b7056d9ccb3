//! The contract shared by the three category scorers.

use hysite_core::{
    Asset, AssetSnapshot, FactorOutcome, FallbackReason, ScoringDomain, ScoringError, SearchArea,
};

/// A computed factor score and the number of assets that informed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorEvaluation {
    /// Score in `0.0..=1.0`.
    pub score: f64,
    /// Qualifying assets found within the search area.
    pub evidence: usize,
}

/// Scores one domain of site suitability from nearby assets.
///
/// Implementors provide [`FactorScorer::evaluate`]; [`FactorScorer::assess`]
/// layers the fallback policy on top so every scorer degrades the same way.
pub trait FactorScorer: Send + Sync {
    /// Domain whose assets this scorer consumes.
    fn domain(&self) -> ScoringDomain;

    /// Evaluate the factor over the full, unfiltered asset list.
    ///
    /// # Errors
    /// Returns [`ScoringError`] when the area or an in-domain asset is
    /// unusable, or when the heuristic produces a non-finite value.
    fn evaluate(&self, assets: &[Asset], area: &SearchArea)
    -> Result<FactorEvaluation, ScoringError>;

    /// Evaluate and return only the score.
    ///
    /// # Errors
    /// Propagates [`FactorScorer::evaluate`] failures.
    fn score(&self, assets: &[Asset], area: &SearchArea) -> Result<f64, ScoringError> {
        self.evaluate(assets, area).map(|evaluation| evaluation.score)
    }

    /// Score a fetched inventory, substituting the neutral fallback on failure.
    ///
    /// An unavailable inventory and a rejected computation both produce
    /// [`hysite_core::FALLBACK_SCORE`] with a status naming the cause.
    fn assess(&self, snapshot: &AssetSnapshot, area: &SearchArea) -> FactorOutcome {
        let domain = self.domain();
        let assets = match snapshot.assets() {
            Ok(assets) => assets,
            Err(err) => {
                return FactorOutcome::fallback(
                    domain,
                    FallbackReason::AssetSourceUnavailable(err.clone()),
                );
            }
        };
        match self.evaluate(assets, area) {
            Ok(evaluation) => FactorOutcome::computed(domain, evaluation.score, evaluation.evidence),
            Err(err) => FactorOutcome::fallback(domain, FallbackReason::Computation(err)),
        }
    }
}

/// Convert an asset count into a float operand.
pub(crate) fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// Reject a non-finite intermediate value.
pub(crate) fn ensure_finite(component: &'static str, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFiniteScore { component })
    }
}
