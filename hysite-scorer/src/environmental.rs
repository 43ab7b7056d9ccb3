//! Environmental and land suitability scoring.

use hysite_core::{
    Asset, AssetCategory, CategoryTally, ScoringDomain, ScoringError, SearchArea, nearby_assets,
};

use crate::factor::{FactorEvaluation, FactorScorer, ensure_finite};

/// Component values of an environmental score.
///
/// Penalties are stored as positive magnitudes and subtracted in
/// [`EnvironmentalBreakdown::total`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvironmentalBreakdown {
    /// Industrial land bonus net of residential and forest penalties, `0.0..=0.3`.
    pub land_suitability: f64,
    /// Proximity penalty for restricted or protected zones, `0.0..=0.2`.
    pub zoning_penalty: f64,
    /// Bonus for nearby water sources, `0.0..=0.2`.
    pub water_availability: f64,
    /// Resilient-zone bonus net of disaster-prone proximity, `0.0..=0.15`.
    pub climate_resilience: f64,
    /// Proximity penalty for national parks and biodiversity zones, `0.0..=0.15`.
    pub biodiversity_penalty: f64,
    /// Environmental assets found within the radius.
    pub asset_count: usize,
}

impl EnvironmentalBreakdown {
    /// Net score clamped into `0.0..=1.0`.
    #[expect(clippy::float_arithmetic, reason = "component sum")]
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.land_suitability + self.water_availability + self.climate_resilience
            - self.zoning_penalty
            - self.biodiversity_penalty)
            .clamp(0.0, 1.0)
    }
}

/// Scores land use, water, climate risk and protected areas around a site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentalScorer;

impl EnvironmentalScorer {
    /// Compute each environmental component.
    ///
    /// # Errors
    /// Returns [`ScoringError`] for an invalid radius, an unusable asset
    /// coordinate, or a non-finite component.
    #[expect(clippy::float_arithmetic, reason = "environmental heuristic")]
    pub fn breakdown(
        &self,
        assets: &[Asset],
        area: &SearchArea,
    ) -> Result<EnvironmentalBreakdown, ScoringError> {
        let nearby = nearby_assets(assets, area, ScoringDomain::Environmental, None)?;
        let tally = CategoryTally::from_scored(&nearby);
        let radius = area.radius_km;
        let count = |category: &AssetCategory| f64::from(tally.count(category));
        let proximity = |category: &AssetCategory| tally.proximity(category, radius);

        let land_suitability = ((count(&AssetCategory::IndustrialLand) * 0.15).min(0.3)
            - count(&AssetCategory::ResidentialLand) * 0.02
            - count(&AssetCategory::ForestLand) * 0.08)
            .max(0.0);

        let zoning_penalty =
            proximity(&AssetCategory::RestrictedZone).map_or(0.0, |factor| factor * 0.2);

        let water_availability = proximity(&AssetCategory::WaterSource).map_or(0.0, |factor| {
            (count(&AssetCategory::WaterSource) * 0.1 + factor * 0.1).min(0.2)
        });

        let prone_penalty =
            proximity(&AssetCategory::DisasterProneZone).map_or(0.0, |factor| factor * 0.1);
        let climate_resilience = ((count(&AssetCategory::DisasterResilientZone) * 0.08).min(0.15)
            - prone_penalty)
            .max(0.0);

        let biodiversity_penalty =
            proximity(&AssetCategory::BiodiversityZone).map_or(0.0, |factor| factor * 0.15);

        let breakdown = EnvironmentalBreakdown {
            land_suitability: ensure_finite("land suitability", land_suitability)?,
            zoning_penalty: ensure_finite("zoning penalty", zoning_penalty)?,
            water_availability: ensure_finite("water availability", water_availability)?,
            climate_resilience: ensure_finite("climate resilience", climate_resilience)?,
            biodiversity_penalty: ensure_finite("biodiversity penalty", biodiversity_penalty)?,
            asset_count: nearby.len(),
        };
        log::debug!(
            "environmental breakdown: land={:.3} water={:.3} climate={:.3} zoning=-{:.3} biodiversity=-{:.3}",
            breakdown.land_suitability,
            breakdown.water_availability,
            breakdown.climate_resilience,
            breakdown.zoning_penalty,
            breakdown.biodiversity_penalty
        );
        Ok(breakdown)
    }
}

impl FactorScorer for EnvironmentalScorer {
    fn domain(&self) -> ScoringDomain {
        ScoringDomain::Environmental
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{asset_at_km, near_bangalore};
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-3;

    #[rstest]
    fn industrial_land_with_nearby_restriction() {
        let area = near_bangalore(5.0);
        let assets = [
            asset_at_km(AssetCategory::IndustrialLand, 2.0),
            asset_at_km(AssetCategory::IndustrialLand, 3.0),
            asset_at_km(AssetCategory::RestrictedZone, 0.5),
        ];
        let breakdown = EnvironmentalScorer
            .breakdown(&assets, &area)
            .expect("valid inventory");
        assert!((breakdown.land_suitability - 0.3).abs() < TOLERANCE);
        assert!((breakdown.zoning_penalty - 0.18).abs() < TOLERANCE);
        assert!((breakdown.total() - 0.12).abs() < TOLERANCE);
    }

    #[rstest]
    fn forest_and_residential_land_floor_at_zero() {
        let area = near_bangalore(5.0);
        let assets = [
            asset_at_km(AssetCategory::IndustrialLand, 1.0),
            asset_at_km(AssetCategory::ForestLand, 1.0),
            asset_at_km(AssetCategory::ForestLand, 1.5),
            asset_at_km(AssetCategory::ResidentialLand, 2.0),
        ];
        let breakdown = EnvironmentalScorer
            .breakdown(&assets, &area)
            .expect("valid inventory");
        assert!(breakdown.land_suitability.abs() < f64::EPSILON);
    }

    #[rstest]
    fn water_availability_is_capped() {
        let area = near_bangalore(10.0);
        let assets = [
            asset_at_km(AssetCategory::WaterSource, 1.0),
            asset_at_km(AssetCategory::WaterSource, 6.0),
            asset_at_km(AssetCategory::WaterSource, 9.0),
        ];
        let breakdown = EnvironmentalScorer
            .breakdown(&assets, &area)
            .expect("valid inventory");
        assert!((breakdown.water_availability - 0.2).abs() < TOLERANCE);
    }

    #[rstest]
    fn disaster_prone_zone_offsets_resilience() {
        let area = near_bangalore(10.0);
        let assets = [
            asset_at_km(AssetCategory::DisasterResilientZone, 3.0),
            asset_at_km(AssetCategory::DisasterProneZone, 5.0),
        ];
        let breakdown = EnvironmentalScorer
            .breakdown(&assets, &area)
            .expect("valid inventory");
        // 0.08 bonus less (1 - 5/10) * 0.1.
        assert!((breakdown.climate_resilience - 0.03).abs() < TOLERANCE);
    }

    #[rstest]
    fn biodiversity_zone_is_penalised_by_proximity() {
        let area = near_bangalore(4.0);
        let assets = [asset_at_km(AssetCategory::BiodiversityZone, 1.0)];
        let breakdown = EnvironmentalScorer
            .breakdown(&assets, &area)
            .expect("valid inventory");
        assert!((breakdown.biodiversity_penalty - 0.1125).abs() < TOLERANCE);
        assert!(breakdown.total().abs() < f64::EPSILON);
    }

    #[rstest]
    fn empty_area_scores_zero_without_evidence() {
        let evaluation = EnvironmentalScorer
            .evaluate(&[], &near_bangalore(5.0))
            .expect("empty inventory is valid");
        assert_eq!(evaluation.evidence, 0);
        assert!(evaluation.score.abs() < f64::EPSILON);
    }
}
