//! Wire format of the asset inventory listing.
//!
//! The inventory answers with a JSON array of records shaped like a GeoJSON
//! point feature:
//!
//! ```json
//! [{
//!   "category": "Hydrogen Plants",
//!   "location": { "coordinates": [77.59, 12.97] },
//!   "capexEstimate": "120.5",
//!   "opexEstimate": 60
//! }]
//! ```
//!
//! Coordinates are `[longitude, latitude]`. Cost estimates may be numbers,
//! numeric strings, `null` or absent.

use hysite_core::{Asset, AssetCategory, AssetSourceError};
use serde::Deserialize;

/// One record of the inventory listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Category label as stored by the inventory.
    pub category: String,
    /// Point geometry.
    #[serde(default)]
    pub location: Option<LocationRecord>,
    /// Capital expenditure estimate.
    #[serde(default)]
    pub capex_estimate: Option<Estimate>,
    /// Operating expenditure estimate.
    #[serde(default)]
    pub opex_estimate: Option<Estimate>,
}

/// Point geometry with `[longitude, latitude]` coordinates.
#[derive(Debug, Deserialize)]
pub struct LocationRecord {
    /// Coordinate pair; extra entries such as altitude are ignored.
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// A cost estimate serialised either as a number or as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    /// Plain JSON number.
    Number(f64),
    /// Number carried in a string.
    Text(String),
}

impl Estimate {
    fn parse(&self, field: &str, index: usize) -> Result<f64, AssetSourceError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|err| AssetSourceError::Malformed {
                        message: format!("record {index}: {field} {text:?} is not a number: {err}"),
                    })
            }
        }
    }
}

impl AssetRecord {
    /// Convert the record into a domain [`Asset`].
    ///
    /// `index` is the record's position in the listing and only appears in
    /// error messages.
    ///
    /// # Errors
    /// Returns [`AssetSourceError::Malformed`] when the location holds fewer
    /// than two coordinates or an estimate string does not parse.
    pub fn into_asset(self, index: usize) -> Result<Asset, AssetSourceError> {
        let coordinates = self
            .location
            .map(|location| location.coordinates)
            .unwrap_or_default();
        let [longitude, latitude, ..] = coordinates.as_slice() else {
            return Err(AssetSourceError::Malformed {
                message: format!(
                    "record {index}: expected [longitude, latitude], found {} coordinate(s)",
                    coordinates.len()
                ),
            });
        };
        let mut asset = Asset::new(
            AssetCategory::from_label(&self.category),
            *latitude,
            *longitude,
        );
        asset.capex = self
            .capex_estimate
            .map(|estimate| estimate.parse("capexEstimate", index))
            .transpose()?;
        asset.opex = self
            .opex_estimate
            .map(|estimate| estimate.parse("opexEstimate", index))
            .transpose()?;
        Ok(asset)
    }
}

/// Decode a full listing, failing on the first malformed record.
///
/// # Errors
/// Returns [`AssetSourceError::Malformed`] for invalid JSON or records.
pub fn decode_listing(body: &str) -> Result<Vec<Asset>, AssetSourceError> {
    let records: Vec<AssetRecord> =
        serde_json::from_str(body).map_err(|err| AssetSourceError::Malformed {
            message: err.to_string(),
        })?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_asset(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn maps_longitude_then_latitude() {
        let assets = decode_listing(
            r#"[{"category":"Hydrogen Plants","location":{"coordinates":[77.59,12.97]}}]"#,
        )
        .expect("listing should decode");
        let asset = assets.first().expect("one asset");
        assert_eq!(asset.category, AssetCategory::HydrogenPlant);
        assert_eq!(asset.latitude(), 12.97);
        assert_eq!(asset.longitude(), 77.59);
        assert_eq!(asset.capex, None);
    }

    #[rstest]
    #[case(r#""120.5""#, Some(120.5))]
    #[case("120.5", Some(120.5))]
    #[case(r#"" 80 ""#, Some(80.0))]
    #[case("null", None)]
    fn accepts_numeric_estimates(#[case] raw: &str, #[case] expected: Option<f64>) {
        let body = format!(
            r#"[{{"category":"Proximity to Industrial/Urban Cluster","location":{{"coordinates":[0.0,0.0]}},"capexEstimate":{raw}}}]"#
        );
        let assets = decode_listing(&body).expect("listing should decode");
        assert_eq!(assets.first().and_then(|asset| asset.capex), expected);
    }

    #[rstest]
    fn rejects_unparsable_estimates() {
        let err = decode_listing(
            r#"[{"category":"Subsidy / Incentive Zone","location":{"coordinates":[0.0,0.0]},"opexEstimate":"cheap"}]"#,
        )
        .expect_err("estimate is not numeric");
        assert!(matches!(err, AssetSourceError::Malformed { ref message } if message.contains("opexEstimate")));
    }

    #[rstest]
    #[case(r#"[{"category":"Port","location":{"coordinates":[1.0]}}]"#)]
    #[case(r#"[{"category":"Port","location":{}}]"#)]
    #[case(r#"[{"category":"Port"}]"#)]
    fn rejects_short_coordinates(#[case] body: &str) {
        let err = decode_listing(body).expect_err("coordinates missing");
        assert!(matches!(err, AssetSourceError::Malformed { .. }));
    }

    #[rstest]
    fn rejects_non_array_bodies() {
        let err = decode_listing(r#"{"detail":"not found"}"#).expect_err("not a listing");
        assert!(matches!(err, AssetSourceError::Malformed { .. }));
    }

    #[rstest]
    fn preserves_unknown_categories() {
        let assets = decode_listing(
            r#"[{"category":"Helipads","location":{"coordinates":[3.0,4.0,100.0]}}]"#,
        )
        .expect("listing should decode");
        let asset = assets.first().expect("one asset");
        assert_eq!(asset.category, AssetCategory::Other("Helipads".to_owned()));
        assert_eq!(asset.latitude(), 4.0);
    }
}
