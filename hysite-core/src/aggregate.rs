//! Combine factor scores into a single recommendation.
//!
//! Two strategies exist: an unweighted mean of the three factors, and a blend
//! of a base (model) score with the caller's category weights.

use serde::{Deserialize, Serialize};

use crate::FactorScores;

/// Share of trust given to the base score when blending with user weights.
///
/// `0.7` means 70% base score and 30% user preference.
pub const BLENDING_FACTOR: f64 = 0.7;

/// Caller-supplied category weights.
///
/// Weights need not sum to one; [`CategoryWeights::normalised`] rescales
/// them before blending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    /// Weight of the infrastructure factor.
    pub infrastructure: f64,
    /// Weight of the environmental factor.
    pub environmental: f64,
    /// Weight of the economic factor.
    pub economic: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self::equal()
    }
}

impl CategoryWeights {
    /// Construct from raw weights.
    #[must_use]
    pub const fn new(infrastructure: f64, environmental: f64, economic: f64) -> Self {
        Self {
            infrastructure,
            environmental,
            economic,
        }
    }

    /// Unit weight for every category.
    #[must_use]
    pub const fn equal() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Rescale the weights so they sum to one.
    ///
    /// When the weights sum to zero the divisor is replaced with `1.0`, which
    /// leaves every weight at zero rather than spreading them evenly. Weights
    /// are first divided by the largest magnitude so sums near `f64::MAX` do
    /// not overflow.
    ///
    /// # Examples
    /// ```
    /// use hysite_core::CategoryWeights;
    ///
    /// let weights = CategoryWeights::new(2.0, 1.0, 1.0).normalised();
    /// assert_eq!(weights.infrastructure, 0.5);
    ///
    /// let zero = CategoryWeights::new(0.0, 0.0, 0.0).normalised();
    /// assert_eq!(zero.economic, 0.0);
    ///
    /// let huge = CategoryWeights::new(f64::MAX, f64::MAX, 0.0).normalised();
    /// assert_eq!(huge.infrastructure, 0.5);
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "normalising weights divides by their sum"
    )]
    #[must_use]
    pub fn normalised(self) -> Self {
        let largest = self
            .infrastructure
            .abs()
            .max(self.environmental.abs())
            .max(self.economic.abs());
        if !(largest.is_finite() && largest > 0.0) {
            return self;
        }
        let scaled = Self::new(
            self.infrastructure / largest,
            self.environmental / largest,
            self.economic / largest,
        );
        let sum = scaled.infrastructure + scaled.environmental + scaled.economic;
        if sum == 0.0 {
            return self;
        }
        Self::new(
            scaled.infrastructure / sum,
            scaled.environmental / sum,
            scaled.economic / sum,
        )
    }
}

/// Unweighted arithmetic mean of the three factor scores.
///
/// # Examples
/// ```
/// use hysite_core::{FactorScores, baseline_aggregate};
///
/// let mean = baseline_aggregate(&FactorScores::new(0.3, 0.6, 0.9));
/// assert!((mean - 0.6).abs() < 1e-12);
/// ```
#[expect(clippy::float_arithmetic, reason = "averaging three scores")]
#[must_use]
pub fn baseline_aggregate(scores: &FactorScores) -> f64 {
    (scores.infrastructure + scores.environmental + scores.economic) / 3.0
}

/// Blend a base score with the user-weighted factor scores.
///
/// Computes `blending_factor * base + (1 - blending_factor) * weighted` where
/// `weighted` applies the normalised `weights` to `scores`. The result is not
/// re-clamped; it stays in `0.0..=1.0` whenever its inputs do.
///
/// # Examples
/// ```
/// use hysite_core::{BLENDING_FACTOR, CategoryWeights, FactorScores, weighted_blend};
///
/// let scores = FactorScores::new(1.0, 0.0, 0.0);
/// let weights = CategoryWeights::new(1.0, 0.0, 0.0);
/// let blended = weighted_blend(0.5, &scores, &weights, BLENDING_FACTOR);
/// assert!((blended - (0.7 * 0.5 + 0.3 * 1.0)).abs() < 1e-12);
/// ```
#[expect(clippy::float_arithmetic, reason = "score blending is a weighted sum")]
#[must_use]
pub fn weighted_blend(
    base: f64,
    scores: &FactorScores,
    weights: &CategoryWeights,
    blending_factor: f64,
) -> f64 {
    let normalised = weights.normalised();
    let weighted = normalised.infrastructure * scores.infrastructure
        + normalised.environmental * scores.environmental
        + normalised.economic * scores.economic;
    blending_factor * base + (1.0 - blending_factor) * weighted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-12;

    #[rstest]
    fn baseline_of_zeroes_is_zero() {
        assert!(baseline_aggregate(&FactorScores::default()).abs() < TOLERANCE);
    }

    #[rstest]
    fn zero_weights_drop_the_preference_component() {
        let scores = FactorScores::new(0.9, 0.9, 0.9);
        let blended = weighted_blend(
            0.4,
            &scores,
            &CategoryWeights::new(0.0, 0.0, 0.0),
            BLENDING_FACTOR,
        );
        assert!((blended - 0.7 * 0.4).abs() < TOLERANCE);
    }

    #[rstest]
    #[case(CategoryWeights::new(3.0, 1.0, 0.0), [0.75, 0.25, 0.0])]
    #[case(CategoryWeights::new(1.0, 1.0, 2.0), [0.25, 0.25, 0.5])]
    fn normalised_weights_sum_to_one(#[case] weights: CategoryWeights, #[case] expected: [f64; 3]) {
        let normalised = weights.normalised();
        let actual = [
            normalised.infrastructure,
            normalised.environmental,
            normalised.economic,
        ];
        for (lhs, rhs) in actual.iter().zip(expected) {
            assert!((lhs - rhs).abs() < TOLERANCE);
        }
    }

    #[rstest]
    fn weights_near_the_float_limit_still_blend() {
        let blended = weighted_blend(
            0.5,
            &FactorScores::new(1.0, 1.0, 1.0),
            &CategoryWeights::new(1e308, 1e308, 1e308),
            BLENDING_FACTOR,
        );
        assert!((blended - 0.65).abs() < TOLERANCE, "got {blended}");
    }

    proptest! {
        #[test]
        fn huge_equal_weights_reduce_to_baseline_average(
            weight in (f64::MAX / 4.0)..=f64::MAX,
            base in 0.0_f64..=1.0,
            infra in 0.0_f64..=1.0,
            env in 0.0_f64..=1.0,
            econ in 0.0_f64..=1.0,
        ) {
            let scores = FactorScores::new(infra, env, econ);
            let weights = CategoryWeights::new(weight, weight, weight);
            let blended = weighted_blend(base, &scores, &weights, BLENDING_FACTOR);
            let expected = BLENDING_FACTOR * base
                + (1.0 - BLENDING_FACTOR) * baseline_aggregate(&scores);
            prop_assert!((blended - expected).abs() < 1e-9);
        }

        #[test]
        fn huge_weights_sum_to_one(
            w_infra in 0.0_f64..=f64::MAX,
            w_env in 0.0_f64..=f64::MAX,
            w_econ in (f64::MAX / 2.0)..=f64::MAX,
        ) {
            let normalised = CategoryWeights::new(w_infra, w_env, w_econ).normalised();
            let sum = normalised.infrastructure + normalised.environmental + normalised.economic;
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        #[test]
        fn equal_weights_reduce_to_baseline_average(
            weight in 0.001_f64..100.0,
            base in 0.0_f64..=1.0,
            infra in 0.0_f64..=1.0,
            env in 0.0_f64..=1.0,
            econ in 0.0_f64..=1.0,
        ) {
            let scores = FactorScores::new(infra, env, econ);
            let weights = CategoryWeights::new(weight, weight, weight);
            let blended = weighted_blend(base, &scores, &weights, BLENDING_FACTOR);
            let expected = BLENDING_FACTOR * base
                + (1.0 - BLENDING_FACTOR) * baseline_aggregate(&scores);
            prop_assert!((blended - expected).abs() < 1e-9);
        }

        #[test]
        fn blend_stays_within_unit_interval(
            w_infra in 0.0_f64..10.0,
            w_env in 0.0_f64..10.0,
            w_econ in 0.0_f64..10.0,
            base in 0.0_f64..=1.0,
            infra in 0.0_f64..=1.0,
            env in 0.0_f64..=1.0,
            econ in 0.0_f64..=1.0,
        ) {
            let blended = weighted_blend(
                base,
                &FactorScores::new(infra, env, econ),
                &CategoryWeights::new(w_infra, w_env, w_econ),
                BLENDING_FACTOR,
            );
            prop_assert!((-1e-12..=1.0 + 1e-12).contains(&blended));
        }
    }
}
