//! Contract for the pre-trained recommendation model.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::FactorScores;

/// Errors raised while loading or evaluating a model.
///
/// Unlike factor fallbacks these are fatal for the request that hit them.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artefact could not be read from disk.
    #[error("failed to read model artefact {path}: {source}")]
    Read {
        /// Path that was opened.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The artefact was read but is not valid JSON for any known model kind.
    #[error("failed to decode model artefact {path}: {message}")]
    Decode {
        /// Path that was decoded.
        path: Utf8PathBuf,
        /// Decoder diagnostic.
        message: String,
    },
    /// The artefact decoded but describes an unusable model.
    #[error("invalid model artefact: {reason}")]
    InvalidArtefact {
        /// Description of the defect.
        reason: String,
    },
    /// Evaluation produced NaN or an infinity.
    #[error("model produced a non-finite score ({value})")]
    NonFiniteOutput {
        /// Raw model output.
        value: f64,
    },
}

/// Maps the three factor scores to one recommendation score.
///
/// Implementations are loaded once and must behave as pure functions for the
/// lifetime of the process. Returned scores are expected in `[0, 1]`.
pub trait ModelScorer: Send + Sync {
    /// Predict a recommendation score for `scores`.
    ///
    /// # Errors
    /// Returns [`ModelError`] when the model cannot produce a finite score.
    fn predict(&self, scores: &FactorScores) -> Result<f64, ModelError>;
}

impl<T: ModelScorer + ?Sized> ModelScorer for &T {
    fn predict(&self, scores: &FactorScores) -> Result<f64, ModelError> {
        (**self).predict(scores)
    }
}

impl<T: ModelScorer + ?Sized> ModelScorer for Box<T> {
    fn predict(&self, scores: &FactorScores) -> Result<f64, ModelError> {
        (**self).predict(scores)
    }
}

/// Reject non-finite model output and clamp the rest into `[0, 1]`.
///
/// # Errors
/// Returns [`ModelError::NonFiniteOutput`] for NaN or infinite input.
///
/// # Examples
/// ```
/// use hysite_core::checked_model_score;
///
/// assert_eq!(checked_model_score(1.2).ok(), Some(1.0));
/// assert!(checked_model_score(f64::NAN).is_err());
/// ```
pub fn checked_model_score(value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value.clamp(0.0, 1.0))
    } else {
        Err(ModelError::NonFiniteOutput { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-0.2, 0.0)]
    #[case(0.42, 0.42)]
    #[case(3.0, 1.0)]
    fn clamps_finite_output(#[case] raw: f64, #[case] expected: f64) {
        let value = checked_model_score(raw).expect("finite output");
        assert!((value - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn rejects_non_finite_output(#[case] raw: f64) {
        assert!(matches!(
            checked_model_score(raw),
            Err(ModelError::NonFiniteOutput { .. })
        ));
    }
}
