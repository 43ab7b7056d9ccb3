//! Brute-force proximity search over an in-memory asset list.
//!
//! Inventories are small enough that a linear scan with haversine distances
//! is sufficient; no spatial index is maintained.

use std::collections::HashMap;

use crate::{
    Asset, AssetCategory, AssetSource, ScoredAsset, ScoringDomain, ScoringError, SearchArea,
    haversine_km,
};

/// Linear decay term `1 - distance / radius`.
///
/// Evaluates to `1.0` at the centre and `0.0` on the boundary.
#[expect(clippy::float_arithmetic, reason = "linear distance decay")]
#[must_use]
pub fn proximity_factor(distance_km: f64, radius_km: f64) -> f64 {
    1.0 - distance_km / radius_km
}

/// Select assets of `domain` lying within `area`, nearest first.
///
/// The sort is stable, so assets at equal distances keep their input order.
/// When `top_k` is given only the `top_k` closest assets are returned.
///
/// # Errors
/// Returns [`ScoringError::InvalidRadius`] for a non-positive radius and
/// [`ScoringError::NonFiniteCoordinate`] when a domain asset carries a
/// coordinate that cannot be measured.
///
/// # Examples
/// ```
/// use hysite_core::{Asset, AssetCategory, ScoringDomain, SearchArea, nearby_assets};
///
/// let assets = vec![
///     Asset::new(AssetCategory::Port, 0.0, 0.02),
///     Asset::new(AssetCategory::Port, 0.0, 0.01),
///     Asset::new(AssetCategory::WaterSource, 0.0, 0.0),
/// ];
/// let area = SearchArea::new(0.0, 0.0, 5.0);
/// let nearby = nearby_assets(&assets, &area, ScoringDomain::Infrastructure, None)?;
/// assert_eq!(nearby.len(), 2);
/// assert!(nearby[0].distance_km < nearby[1].distance_km);
/// # Ok::<(), hysite_core::ScoringError>(())
/// ```
pub fn nearby_assets(
    assets: &[Asset],
    area: &SearchArea,
    domain: ScoringDomain,
    top_k: Option<usize>,
) -> Result<Vec<ScoredAsset>, ScoringError> {
    if !(area.radius_km.is_finite() && area.radius_km > 0.0) {
        return Err(ScoringError::InvalidRadius {
            radius_km: area.radius_km,
        });
    }

    let mut nearby = Vec::new();
    for asset in assets.iter().filter(|a| domain.contains(&a.category)) {
        if !(asset.location.x.is_finite() && asset.location.y.is_finite()) {
            return Err(ScoringError::NonFiniteCoordinate {
                category: asset.category.to_string(),
                latitude: asset.latitude(),
                longitude: asset.longitude(),
            });
        }
        let distance_km = haversine_km(area.centre, asset.location);
        if distance_km <= area.radius_km {
            nearby.push(ScoredAsset {
                asset: asset.clone(),
                distance_km,
            });
        }
    }

    nearby.sort_by(|lhs, rhs| lhs.distance_km.total_cmp(&rhs.distance_km));
    if let Some(limit) = top_k {
        nearby.truncate(limit);
    }
    Ok(nearby)
}

/// Fetch the inventory and select nearby assets, degrading to an empty list.
///
/// Inventory failures and unusable records are logged and treated as "no
/// assets" rather than propagated.
pub fn fetch_nearby_assets<S: AssetSource + ?Sized>(
    source: &S,
    area: &SearchArea,
    domain: ScoringDomain,
    top_k: Option<usize>,
) -> Vec<ScoredAsset> {
    let assets = match source.fetch_assets() {
        Ok(assets) => assets,
        Err(err) => {
            log::warn!("treating asset inventory as empty for {domain}: {err}");
            return Vec::new();
        }
    };
    nearby_assets(&assets, area, domain, top_k).unwrap_or_else(|err| {
        log::warn!("discarding {domain} proximity search: {err}");
        Vec::new()
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TallyEntry {
    count: u32,
    closest_km: f64,
}

/// Per-category count and closest distance for a set of scored assets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTally {
    entries: HashMap<AssetCategory, TallyEntry>,
}

impl CategoryTally {
    /// Tally `assets` by category.
    #[must_use]
    pub fn from_scored(assets: &[ScoredAsset]) -> Self {
        let mut entries: HashMap<AssetCategory, TallyEntry> = HashMap::new();
        for scored in assets {
            entries
                .entry(scored.asset.category.clone())
                .and_modify(|entry| {
                    entry.count = entry.count.saturating_add(1);
                    entry.closest_km = entry.closest_km.min(scored.distance_km);
                })
                .or_insert(TallyEntry {
                    count: 1,
                    closest_km: scored.distance_km,
                });
        }
        Self { entries }
    }

    /// Number of assets in `category`.
    #[must_use]
    pub fn count(&self, category: &AssetCategory) -> u32 {
        self.entries.get(category).map_or(0, |entry| entry.count)
    }

    /// Distance to the closest asset in `category`, if any.
    #[must_use]
    pub fn closest_km(&self, category: &AssetCategory) -> Option<f64> {
        self.entries.get(category).map(|entry| entry.closest_km)
    }

    /// Proximity factor of the closest asset in `category`, if any.
    #[must_use]
    pub fn proximity(&self, category: &AssetCategory, radius_km: f64) -> Option<f64> {
        self.closest_km(category)
            .map(|distance| proximity_factor(distance, radius_km))
    }
}
