//! Input and contract for supplementary narrative summaries.

use serde::{Deserialize, Serialize};

use crate::{CategoryWeights, FactorScores};

/// Everything a narrative summary may refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeContext {
    /// The three factor scores.
    pub scores: FactorScores,
    /// Raw user weights, as supplied.
    pub weights: CategoryWeights,
    /// Unweighted mean of the factor scores.
    pub baseline_score: f64,
    /// Model recommendation score.
    pub model_score: f64,
    /// Model score blended with the user's weighted preference.
    pub user_weighted_score: f64,
    /// Free-text recommendation request.
    pub description: String,
}

/// Explains computed scores in prose.
///
/// Narratives are supplementary: implementations report their own failures
/// as explanatory text instead of returning an error.
pub trait NarrativeSource: Send + Sync {
    /// Produce a summary for `context`.
    fn narrate(&self, context: &NarrativeContext) -> String;
}

impl<T: NarrativeSource + ?Sized> NarrativeSource for &T {
    fn narrate(&self, context: &NarrativeContext) -> String {
        (**self).narrate(context)
    }
}

impl<T: NarrativeSource + ?Sized> NarrativeSource for Box<T> {
    fn narrate(&self, context: &NarrativeContext) -> String {
        (**self).narrate(context)
    }
}
