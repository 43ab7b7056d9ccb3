//! Infrastructure and proximity scoring.
//!
//! Each nearby asset contributes an exponential proximity weight
//! `exp(-d / (r * 0.5))`. The weights are summed and mapped through a tiered
//! policy so a lone asset scores low while three or more nearby assets lift the
//! score into the upper band:
//!
//! | assets | score                                   |
//! |--------|-----------------------------------------|
//! | 0      | `0.0`                                   |
//! | 1      | `min(0.3, sum * 0.3)`                   |
//! | 2      | `0.4 + 0.2 * sum / 2`                   |
//! | 3+     | `0.55 + 0.45 * min(1.0, sum / count)`   |

use hysite_core::{Asset, ScoringDomain, ScoringError, SearchArea, nearby_assets};

use crate::factor::{FactorEvaluation, FactorScorer, count_as_f64, ensure_finite};

/// Maximum number of nearest assets considered by default.
pub const INFRASTRUCTURE_TOP_K: usize = 15;

/// Intermediate values of an infrastructure score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfrastructureBreakdown {
    /// Assets considered after the nearest-`k` cap.
    pub asset_count: usize,
    /// Sum of the exponential proximity weights.
    pub proximity_sum: f64,
    /// Tiered score in `0.0..=1.0`.
    pub score: f64,
}

/// Scores proximity to hydrogen and transport infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfrastructureScorer {
    top_k: usize,
}

impl Default for InfrastructureScorer {
    fn default() -> Self {
        Self::new(INFRASTRUCTURE_TOP_K)
    }
}

impl InfrastructureScorer {
    /// Consider at most `top_k` of the nearest assets.
    #[must_use]
    pub const fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Cap on the number of assets considered.
    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Compute the score together with its intermediate values.
    ///
    /// # Errors
    /// Returns [`ScoringError`] for an invalid radius, an unusable asset
    /// coordinate, or a non-finite result.
    #[expect(clippy::float_arithmetic, reason = "exponential proximity weighting")]
    pub fn breakdown(
        &self,
        assets: &[Asset],
        area: &SearchArea,
    ) -> Result<InfrastructureBreakdown, ScoringError> {
        let nearby = nearby_assets(assets, area, ScoringDomain::Infrastructure, Some(self.top_k))?;
        let decay = area.radius_km * 0.5;
        let proximity_sum = ensure_finite(
            "infrastructure proximity sum",
            nearby
                .iter()
                .map(|scored| (-scored.distance_km / decay).exp())
                .sum(),
        )?;
        let score = ensure_finite(
            "infrastructure score",
            tiered_score(nearby.len(), proximity_sum),
        )?;
        let breakdown = InfrastructureBreakdown {
            asset_count: nearby.len(),
            proximity_sum,
            score: score.clamp(0.0, 1.0),
        };
        log::debug!(
            "infrastructure breakdown: assets={} proximity_sum={:.3} score={:.3}",
            breakdown.asset_count,
            breakdown.proximity_sum,
            breakdown.score
        );
        Ok(breakdown)
    }
}

#[expect(clippy::float_arithmetic, reason = "tiered normalisation")]
fn tiered_score(count: usize, proximity_sum: f64) -> f64 {
    match count {
        0 => 0.0,
        1 => (proximity_sum * 0.3).min(0.3),
        2 => 0.4 + 0.2 * (proximity_sum / 2.0),
        n => 0.55 + 0.45 * (proximity_sum / count_as_f64(n)).min(1.0),
    }
}

impl FactorScorer for InfrastructureScorer {
    fn domain(&self) -> ScoringDomain {
        ScoringDomain::Infrastructure
    }

    fn evaluate(
        &self,
        assets: &[Asset],
        area: &SearchArea,
    ) -> Result<FactorEvaluation, ScoringError> {
        self.breakdown(assets, area).map(|breakdown| FactorEvaluation {
            score: breakdown.score,
            evidence: breakdown.asset_count,
        })
    }
}
