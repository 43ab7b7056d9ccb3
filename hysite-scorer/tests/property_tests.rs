//! Property-based tests for the factor scorers and the analysis pipeline.
//!
//! # Invariants tested
//!
//! - **Bounded factors:** every scorer returns a value in `0.0..=1.0` for any
//!   inventory of valid assets, including empty and boundary cases.
//! - **Idempotence:** scoring the same inventory twice yields identical bits.
//! - **Bounded aggregates:** baseline and weighted scores stay in `0.0..=1.0`.

use hysite_core::test_support::{MemoryAssetSource, StubModel};
use hysite_core::{Asset, AssetCategory, CategoryWeights, SearchArea, SiteQuery};
use hysite_scorer::{
    EconomicScorer, EnvironmentalScorer, FactorScorer, InfrastructureScorer, SiteAnalyser,
};
use proptest::prelude::*;

const CENTRE: (f64, f64) = (12.9716, 77.5946);

fn category_strategy() -> impl Strategy<Value = AssetCategory> {
    prop_oneof![
        Just(AssetCategory::HydrogenPlant),
        Just(AssetCategory::HydrogenStorage),
        Just(AssetCategory::DistributionHub),
        Just(AssetCategory::Port),
        Just(AssetCategory::AirportOrRail),
        Just(AssetCategory::RenewableFarm),
        Just(AssetCategory::ResidentialLand),
        Just(AssetCategory::IndustrialLand),
        Just(AssetCategory::ForestLand),
        Just(AssetCategory::WaterSource),
        Just(AssetCategory::DisasterResilientZone),
        Just(AssetCategory::DisasterProneZone),
        Just(AssetCategory::BiodiversityZone),
        Just(AssetCategory::RestrictedZone),
        Just(AssetCategory::SubsidyZone),
        Just(AssetCategory::IndustrialCluster),
        Just(AssetCategory::Other("Unknown".to_owned())),
    ]
}

/// Assets scattered within roughly 20 km of the centre.
fn asset_strategy() -> impl Strategy<Value = Asset> {
    (
        category_strategy(),
        -0.2_f64..0.2,
        -0.2_f64..0.2,
        proptest::option::of(0.0_f64..10_000.0),
        proptest::option::of(0.0_f64..10_000.0),
    )
        .prop_map(|(category, dlat, dlon, capex, opex)| {
            #[expect(clippy::float_arithmetic, reason = "offset from the centre")]
            let mut asset = Asset::new(category, CENTRE.0 + dlat, CENTRE.1 + dlon);
            asset.capex = capex;
            asset.opex = opex;
            asset
        })
}

fn scorers() -> [Box<dyn FactorScorer>; 3] {
    [
        Box::new(InfrastructureScorer::default()),
        Box::new(EnvironmentalScorer),
        Box::new(EconomicScorer::default()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn factor_scores_stay_in_unit_interval(
        assets in proptest::collection::vec(asset_strategy(), 0..40),
        radius in 0.1_f64..30.0,
    ) {
        let area = SearchArea::new(CENTRE.0, CENTRE.1, radius);
        for scorer in scorers() {
            let score = scorer.score(&assets, &area).expect("valid inventory");
            prop_assert!((0.0..=1.0).contains(&score), "{:?} scored {score}", scorer.domain());
        }
    }

    #[test]
    fn scoring_is_idempotent(
        assets in proptest::collection::vec(asset_strategy(), 0..20),
        radius in 0.1_f64..30.0,
    ) {
        let area = SearchArea::new(CENTRE.0, CENTRE.1, radius);
        for scorer in scorers() {
            let first = scorer.score(&assets, &area).expect("valid inventory");
            let second = scorer.score(&assets, &area).expect("valid inventory");
            prop_assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn aggregates_stay_in_unit_interval(
        assets in proptest::collection::vec(asset_strategy(), 0..20),
        radius in 0.1_f64..30.0,
        weights in (0.0_f64..10.0, 0.0_f64..10.0, 0.0_f64..10.0),
        model in 0.0_f64..=1.0,
    ) {
        let analyser = SiteAnalyser::new(
            MemoryAssetSource::with_assets(assets),
            StubModel::Constant(model),
        );
        let query = SiteQuery::new(CENTRE.0, CENTRE.1, radius)
            .with_weights(CategoryWeights::new(weights.0, weights.1, weights.2));
        let assessment = analyser.analyse(&query).expect("analysis succeeds");
        prop_assert!((0.0..=1.0).contains(&assessment.baseline_score));
        prop_assert!((0.0..=1.0 + 1e-12).contains(&assessment.user_weighted_score));
    }
}
