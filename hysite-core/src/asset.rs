//! Asset records used as siting evidence.
//!
//! Assets come from an external inventory and are never mutated by the
//! engine. Coordinates are WGS84 with `x = longitude` and `y = latitude`,
//! matching the convention used by `geo`.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category label attached to an inventory asset.
///
/// The wire names are the exact strings used by the asset inventory, typos
/// included. Unknown labels are preserved in [`AssetCategory::Other`] and are
/// never selected by a scorer.
///
/// # Examples
/// ```
/// use hysite_core::AssetCategory;
///
/// let category = AssetCategory::from_label("Hydrogen Plants");
/// assert_eq!(category, AssetCategory::HydrogenPlant);
/// assert_eq!(category.as_str(), "Hydrogen Plants");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Hydrogen production plants.
    HydrogenPlant,
    /// Tanks, underground storage and similar facilities.
    HydrogenStorage,
    /// Refuelling stations and industrial distribution hubs.
    DistributionHub,
    /// Ports with import/export potential.
    Port,
    /// Airports and railway stations.
    AirportOrRail,
    /// Solar, wind, hydro and biomass generation.
    RenewableFarm,
    /// Land zoned for residential use.
    ResidentialLand,
    /// Land zoned for industrial use.
    IndustrialLand,
    /// Forested land.
    ForestLand,
    /// Rivers, reservoirs and groundwater.
    WaterSource,
    /// Zones assessed as resilient to natural disasters.
    DisasterResilientZone,
    /// Zones prone to natural disasters.
    DisasterProneZone,
    /// National parks and biodiversity zones.
    BiodiversityZone,
    /// Restricted or protected zones.
    RestrictedZone,
    /// Subsidy or incentive zones.
    SubsidyZone,
    /// Industrial or urban clusters, optionally carrying cost estimates.
    IndustrialCluster,
    /// A label not recognised by the engine.
    Other(String),
}

const KNOWN_CATEGORIES: [(AssetCategory, &str); 16] = [
    (AssetCategory::HydrogenPlant, "Hydrogen Plants"),
    (
        AssetCategory::HydrogenStorage,
        "Hydrogen Storage Facilities (tanks, underground storage, others)",
    ),
    (
        AssetCategory::DistributionHub,
        "Hydrogen Distribution Hubs (refuelling stations, industrial hubs, others",
    ),
    (AssetCategory::Port, "Ports (import/export potential)"),
    (AssetCategory::AirportOrRail, "Airports/Railway Stations"),
    (
        AssetCategory::RenewableFarm,
        "Renewable Energy Farms (solar, wind, hydro, biomass, others)",
    ),
    (AssetCategory::ResidentialLand, "Land Suitability - Residencial"),
    (AssetCategory::IndustrialLand, "Land Suitability - Industrial"),
    (AssetCategory::ForestLand, "Land Suitability - Forest"),
    (
        AssetCategory::WaterSource,
        "Water Sources (rivers, reservoirs, groundwater, others)",
    ),
    (
        AssetCategory::DisasterResilientZone,
        "Natural Disaster Resilient Zone",
    ),
    (AssetCategory::DisasterProneZone, "Natural Disaster Prone Zone"),
    (
        AssetCategory::BiodiversityZone,
        "National Park / Biodiversity Zone",
    ),
    (AssetCategory::RestrictedZone, "Restricted/Protected Zone"),
    (AssetCategory::SubsidyZone, "Subsidy / Incentive Zone"),
    (
        AssetCategory::IndustrialCluster,
        "Proximity to Industrial/Urban Cluster",
    ),
];

impl AssetCategory {
    /// Return the inventory wire name for the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        if let Self::Other(label) = self {
            return label.as_str();
        }
        KNOWN_CATEGORIES
            .iter()
            .find(|(category, _)| category == self)
            .map_or("", |(_, name)| name)
    }

    /// Map an inventory label onto a category.
    ///
    /// Surrounding whitespace is ignored; unrecognised labels become
    /// [`AssetCategory::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        KNOWN_CATEGORIES
            .iter()
            .find(|(_, name)| *name == trimmed)
            .map_or_else(|| Self::Other(trimmed.to_owned()), |(category, _)| category.clone())
    }

    /// Report whether the label was recognised.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl Serialize for AssetCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssetCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

const INFRASTRUCTURE_CATEGORIES: &[AssetCategory] = &[
    AssetCategory::HydrogenPlant,
    AssetCategory::HydrogenStorage,
    AssetCategory::DistributionHub,
    AssetCategory::Port,
    AssetCategory::AirportOrRail,
    AssetCategory::RenewableFarm,
];

const ENVIRONMENTAL_CATEGORIES: &[AssetCategory] = &[
    AssetCategory::ResidentialLand,
    AssetCategory::IndustrialLand,
    AssetCategory::ForestLand,
    AssetCategory::WaterSource,
    AssetCategory::DisasterResilientZone,
    AssetCategory::DisasterProneZone,
    AssetCategory::BiodiversityZone,
    AssetCategory::RestrictedZone,
];

const ECONOMIC_CATEGORIES: &[AssetCategory] =
    &[AssetCategory::SubsidyZone, AssetCategory::IndustrialCluster];

/// The three factor families scored for every site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringDomain {
    /// Infrastructure and proximity factors.
    Infrastructure,
    /// Environmental and land factors.
    Environmental,
    /// Economic and policy drivers.
    Economic,
}

impl ScoringDomain {
    /// All domains in the fixed model feature order.
    pub const ALL: [Self; 3] = [Self::Infrastructure, Self::Environmental, Self::Economic];

    /// Categories that count as evidence for this domain.
    #[must_use]
    pub const fn categories(self) -> &'static [AssetCategory] {
        match self {
            Self::Infrastructure => INFRASTRUCTURE_CATEGORIES,
            Self::Environmental => ENVIRONMENTAL_CATEGORIES,
            Self::Economic => ECONOMIC_CATEGORIES,
        }
    }

    /// Report whether `category` is evidence for this domain.
    #[must_use]
    pub fn contains(self, category: &AssetCategory) -> bool {
        self.categories().contains(category)
    }

    /// Return the domain as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Environmental => "environmental",
            Self::Economic => "economic",
        }
    }
}

impl fmt::Display for ScoringDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geolocated inventory record.
///
/// # Examples
/// ```
/// use hysite_core::{Asset, AssetCategory};
///
/// let asset = Asset::new(AssetCategory::IndustrialCluster, 12.97, 77.59).with_costs(120.0, 60.0);
/// assert_eq!(asset.latitude(), 12.97);
/// assert_eq!(asset.capex, Some(120.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Category label.
    pub category: AssetCategory,
    /// Position with `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
    /// Capital expenditure estimate, when the inventory supplies one.
    pub capex: Option<f64>,
    /// Operating expenditure estimate, when the inventory supplies one.
    pub opex: Option<f64>,
}

impl Asset {
    /// Construct an asset without cost estimates.
    #[must_use]
    pub const fn new(category: AssetCategory, latitude: f64, longitude: f64) -> Self {
        Self {
            category,
            location: Coord {
                x: longitude,
                y: latitude,
            },
            capex: None,
            opex: None,
        }
    }

    /// Attach capital and operating cost estimates.
    #[must_use]
    pub const fn with_costs(mut self, capex: f64, opex: f64) -> Self {
        self.capex = Some(capex);
        self.opex = Some(opex);
        self
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}

/// An asset paired with its great-circle distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAsset {
    /// The matched asset.
    pub asset: Asset,
    /// Distance from the query centre in kilometres.
    pub distance_km: f64,
}
