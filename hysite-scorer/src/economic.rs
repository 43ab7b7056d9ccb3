//! Economic and policy scoring.
//!
//! The cost baselines default to 200 (CAPEX) and 100 (OPEX). They have no
//! documented derivation and are exposed for calibration.

use hysite_core::{
    Asset, AssetCategory, CategoryTally, ScoredAsset, ScoringDomain, ScoringError, SearchArea,
    nearby_assets,
};

use crate::factor::{FactorEvaluation, FactorScorer, count_as_f64, ensure_finite};

/// Default CAPEX normalisation baseline.
pub const DEFAULT_CAPEX_BASELINE: f64 = 200.0;
/// Default OPEX normalisation baseline.
pub const DEFAULT_OPEX_BASELINE: f64 = 100.0;

/// Component values of an economic score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EconomicBreakdown {
    /// Cost efficiency of nearby clusters, `0.0..=0.35`.
    pub cost_efficiency: f64,
    /// Subsidy and incentive zone bonus, `0.0..=0.35`.
    pub regulatory_favourability: f64,
    /// Industrial or urban cluster proximity bonus, `0.0..=0.30`.
    pub cluster_proximity: f64,
    /// Economic assets found within the radius.
    pub asset_count: usize,
}

impl EconomicBreakdown {
    /// Sum of the components clamped into `0.0..=1.0`.
    #[expect(clippy::float_arithmetic, reason = "component sum")]
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.cost_efficiency + self.regulatory_favourability + self.cluster_proximity)
            .clamp(0.0, 1.0)
    }
}

/// Scores subsidies, cluster access and cost efficiency around a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicScorer {
    capex_baseline: f64,
    opex_baseline: f64,
}

impl Default for EconomicScorer {
    fn default() -> Self {
        Self {
            capex_baseline: DEFAULT_CAPEX_BASELINE,
            opex_baseline: DEFAULT_OPEX_BASELINE,
        }
    }
}

impl EconomicScorer {
    /// Override the CAPEX baseline.
    #[must_use]
    pub const fn with_capex_baseline(mut self, baseline: f64) -> Self {
        self.capex_baseline = baseline;
        self
    }

    /// Override the OPEX baseline.
    #[must_use]
    pub const fn with_opex_baseline(mut self, baseline: f64) -> Self {
        self.opex_baseline = baseline;
        self
    }

    /// Compute each economic component.
    ///
    /// # Errors
    /// Returns [`ScoringError`] for an invalid radius, an unusable asset
    /// coordinate, a negative or non-finite cost estimate, or a non-finite
    /// component.
    #[expect(clippy::float_arithmetic, reason = "economic heuristic")]
    pub fn breakdown(
        &self,
        assets: &[Asset],
        area: &SearchArea,
    ) -> Result<EconomicBreakdown, ScoringError> {
        let nearby = nearby_assets(assets, area, ScoringDomain::Economic, None)?;
        let tally = CategoryTally::from_scored(&nearby);
        let radius = area.radius_km;

        let cost_efficiency = self.cost_efficiency(&nearby)?;

        let subsidy = AssetCategory::SubsidyZone;
        let regulatory_favourability = tally.proximity(&subsidy, radius).map_or(0.0, |factor| {
            (f64::from(tally.count(&subsidy)) * 0.2 + factor * 0.15).min(0.35)
        });

        let cluster = AssetCategory::IndustrialCluster;
        let cluster_proximity = tally.proximity(&cluster, radius).map_or(0.0, |factor| {
            (f64::from(tally.count(&cluster)) * 0.1 + factor * 0.2).min(0.30)
        });

        let breakdown = EconomicBreakdown {
            cost_efficiency: ensure_finite("cost efficiency", cost_efficiency)?,
            regulatory_favourability: ensure_finite(
                "regulatory favourability",
                regulatory_favourability,
            )?,
            cluster_proximity: ensure_finite("cluster proximity", cluster_proximity)?,
            asset_count: nearby.len(),
        };
        log::debug!(
            "economic breakdown: cost={:.3} regulatory={:.3} cluster={:.3}",
            breakdown.cost_efficiency,
            breakdown.regulatory_favourability,
            breakdown.cluster_proximity
        );
        Ok(breakdown)
    }

    /// `0.35 * mean(norm_capex, norm_opex)` over clusters reporting costs.
    ///
    /// Clusters without an estimate are left out of that estimate's average;
    /// the component is zero unless both averages have at least one value.
    #[expect(clippy::float_arithmetic, reason = "cost normalisation")]
    fn cost_efficiency(&self, nearby: &[ScoredAsset]) -> Result<f64, ScoringError> {
        let mut capex = Vec::new();
        let mut opex = Vec::new();
        for scored in nearby
            .iter()
            .filter(|scored| scored.asset.category == AssetCategory::IndustrialCluster)
        {
            let asset = &scored.asset;
            if let Some(value) = asset.capex {
                capex.push(validated_cost(asset, "capex", value)?);
            }
            if let Some(value) = asset.opex {
                opex.push(validated_cost(asset, "opex", value)?);
            }
        }
        let (Some(avg_capex), Some(avg_opex)) = (mean(&capex), mean(&opex)) else {
            return Ok(0.0);
        };
        let norm_capex = (self.capex_baseline / (avg_capex + 1.0)).clamp(0.0, 1.0);
        let norm_opex = (self.opex_baseline / (avg_opex + 1.0)).clamp(0.0, 1.0);
        Ok(0.35 * ((norm_capex + norm_opex) / 2.0))
    }
}

fn validated_cost(asset: &Asset, field: &'static str, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ScoringError::InvalidCost {
            category: asset.category.to_string(),
            field,
            value,
        })
    }
}

#[expect(clippy::float_arithmetic, reason = "arithmetic mean")]
fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / count_as_f64(values.len()))
}

impl FactorScorer for EconomicScorer {
    fn domain(&self) -> ScoringDomain {
        ScoringDomain::Economic
    }

    fn evaluate(
        &self,
        assets: &[Asset],
        area: &SearchArea,
    ) -> Result<FactorEvaluation, ScoringError> {
        self.breakdown(assets, area).map(|breakdown| FactorEvaluation {
            score: breakdown.total(),
            evidence: breakdown.asset_count,
        })
    }
}
