//! Factor scores and the record of how each one was obtained.
//!
//! A factor score is always a number in `0.0..=1.0`. Alongside the number the
//! engine keeps a [`FactorStatus`] so that a neutral fallback can be told
//! apart from a genuine low score in logs and responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AssetSourceError, ScoringDomain};

/// Neutral score substituted when a factor cannot be computed.
pub const FALLBACK_SCORE: f64 = 0.5;

/// Clamp a raw score into `0.0..=1.0`, mapping non-finite values to `0.0`.
///
/// # Examples
/// ```
/// use hysite_core::sanitise_score;
///
/// assert_eq!(sanitise_score(1.4), 1.0);
/// assert_eq!(sanitise_score(-0.2), 0.0);
/// assert_eq!(sanitise_score(f64::NAN), 0.0);
/// ```
#[must_use]
pub fn sanitise_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Errors raised while computing a single factor score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The search radius was zero, negative or not finite.
    #[error("search radius must be a positive, finite number of kilometres (got {radius_km})")]
    InvalidRadius {
        /// Offending radius.
        radius_km: f64,
    },
    /// An asset carried a non-finite coordinate.
    #[error("asset '{category}' has a non-finite coordinate ({latitude}, {longitude})")]
    NonFiniteCoordinate {
        /// Category label of the asset.
        category: String,
        /// Reported latitude.
        latitude: f64,
        /// Reported longitude.
        longitude: f64,
    },
    /// An asset carried a negative or non-finite cost estimate.
    #[error("asset '{category}' has an invalid {field} estimate ({value})")]
    InvalidCost {
        /// Category label of the asset.
        category: String,
        /// Either `capex` or `opex`.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The heuristic produced a non-finite intermediate value.
    #[error("{component} evaluated to a non-finite value")]
    NonFiniteScore {
        /// Name of the component that failed.
        component: &'static str,
    },
}

/// Why a factor fell back to [`FALLBACK_SCORE`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FallbackReason {
    /// The asset inventory could not be read.
    #[error("asset source unavailable: {0}")]
    AssetSourceUnavailable(#[source] AssetSourceError),
    /// The heuristic rejected its input.
    #[error("computation failed: {0}")]
    Computation(#[source] ScoringError),
}

/// How a factor score was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorStatus {
    /// Computed from at least one qualifying asset.
    Computed,
    /// No qualifying asset lay within the radius.
    NoEvidence,
    /// The neutral fallback was substituted.
    Fallback(FallbackReason),
}

/// A factor score together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorOutcome {
    /// Domain the score belongs to.
    pub domain: ScoringDomain,
    /// Score in `0.0..=1.0`.
    pub score: f64,
    /// Provenance of `score`.
    pub status: FactorStatus,
}

impl FactorOutcome {
    /// Build an outcome from a computed score.
    ///
    /// `evidence` is the number of qualifying assets that contributed.
    #[must_use]
    pub fn computed(domain: ScoringDomain, score: f64, evidence: usize) -> Self {
        let status = if evidence == 0 {
            FactorStatus::NoEvidence
        } else {
            FactorStatus::Computed
        };
        Self {
            domain,
            score: sanitise_score(score),
            status,
        }
    }

    /// Build a neutral fallback outcome and log the reason.
    #[must_use]
    pub fn fallback(domain: ScoringDomain, reason: FallbackReason) -> Self {
        log::warn!("{domain} factor fell back to {FALLBACK_SCORE}: {reason}");
        Self {
            domain,
            score: FALLBACK_SCORE,
            status: FactorStatus::Fallback(reason),
        }
    }

    /// Report whether the score is a substituted fallback.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.status, FactorStatus::Fallback(_))
    }
}

/// The three factor scores in the fixed model feature order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorScores {
    /// Infrastructure and proximity score.
    pub infrastructure: f64,
    /// Environmental and land score.
    pub environmental: f64,
    /// Economic and policy score.
    pub economic: f64,
}

impl FactorScores {
    /// Construct from the three scores.
    #[must_use]
    pub const fn new(infrastructure: f64, environmental: f64, economic: f64) -> Self {
        Self {
            infrastructure,
            environmental,
            economic,
        }
    }

    /// Return the scores as a feature vector `[infra, env, econ]`.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.infrastructure, self.environmental, self.economic]
    }

    /// Return the score for a domain.
    #[must_use]
    pub const fn get(&self, domain: ScoringDomain) -> f64 {
        match domain {
            ScoringDomain::Infrastructure => self.infrastructure,
            ScoringDomain::Environmental => self.environmental,
            ScoringDomain::Economic => self.economic,
        }
    }
}
