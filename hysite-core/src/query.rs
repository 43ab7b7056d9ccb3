//! Validated site queries.

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CategoryWeights;

/// Reasons a site query is rejected before any scoring runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// A required field was absent.
    #[error("missing required parameter: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// Latitude was outside `-90..=90` or not finite.
    #[error("latitude must lie within -90..=90 degrees (got {value})")]
    InvalidLatitude {
        /// Offending value.
        value: f64,
    },
    /// Longitude was outside `-180..=180` or not finite.
    #[error("longitude must lie within -180..=180 degrees (got {value})")]
    InvalidLongitude {
        /// Offending value.
        value: f64,
    },
    /// Radius was not a positive finite distance.
    #[error("radius must be a positive, finite number of kilometres (got {value})")]
    InvalidRadius {
        /// Offending value.
        value: f64,
    },
    /// A category weight was negative or not finite.
    #[error("{field} weight must be finite and non-negative (got {value})")]
    InvalidWeight {
        /// Which weight was rejected.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Circular search area around a candidate site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    /// Centre with `x = longitude`, `y = latitude`.
    pub centre: Coord<f64>,
    /// Search radius in kilometres.
    pub radius_km: f64,
}

impl SearchArea {
    /// Construct an area from latitude, longitude and radius.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            centre: Coord {
                x: longitude,
                y: latitude,
            },
            radius_km,
        }
    }
}

/// A request to score one candidate site.
///
/// # Examples
/// ```
/// use hysite_core::{CategoryWeights, SiteQuery};
///
/// let query = SiteQuery::new(12.9716, 77.5946, 5.0)
///     .with_weights(CategoryWeights::new(2.0, 1.0, 1.0))
///     .with_description("Green hydrogen plant near Bengaluru");
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteQuery {
    /// Latitude of the candidate site in degrees.
    pub latitude: f64,
    /// Longitude of the candidate site in degrees.
    pub longitude: f64,
    /// Search radius in kilometres.
    pub radius_km: f64,
    /// Caller's category weights.
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Free-text description of what the caller is looking for.
    #[serde(default)]
    pub description: String,
}

impl SiteQuery {
    /// Construct a query with equal weights and no description.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
            weights: CategoryWeights::default(),
            description: String::new(),
        }
    }

    /// Replace the category weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: CategoryWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the request description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The circular area searched for evidence.
    #[must_use]
    pub const fn area(&self) -> SearchArea {
        SearchArea::new(self.latitude, self.longitude, self.radius_km)
    }

    /// Check coordinates, radius and weights.
    ///
    /// # Errors
    /// Returns the first [`RequestError`] found.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !(self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude)) {
            return Err(RequestError::InvalidLatitude {
                value: self.latitude,
            });
        }
        if !(self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude)) {
            return Err(RequestError::InvalidLongitude {
                value: self.longitude,
            });
        }
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(RequestError::InvalidRadius {
                value: self.radius_km,
            });
        }
        let weights = [
            ("infrastructure", self.weights.infrastructure),
            ("environmental", self.weights.environmental),
            ("economic", self.weights.economic),
        ];
        if let Some((field, value)) = weights
            .into_iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(RequestError::InvalidWeight { field, value });
        }
        Ok(())
    }
}

/// Loosely typed request body in which every field may be absent.
///
/// Converting into a [`SiteQuery`] rejects missing location or radius and
/// fills absent weights with `1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteQueryPayload {
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Search radius in kilometres.
    #[serde(rename = "radius", alias = "radius_km")]
    pub radius_km: Option<f64>,
    /// Infrastructure weight.
    pub weight_infra: Option<f64>,
    /// Environmental weight.
    pub weight_env: Option<f64>,
    /// Economic weight.
    pub weight_econ: Option<f64>,
    /// Free-text request description.
    #[serde(rename = "request_description", alias = "description")]
    pub description: Option<String>,
}

impl TryFrom<SiteQueryPayload> for SiteQuery {
    type Error = RequestError;

    fn try_from(payload: SiteQueryPayload) -> Result<Self, Self::Error> {
        let latitude = payload
            .latitude
            .ok_or(RequestError::MissingField { field: "latitude" })?;
        let longitude = payload
            .longitude
            .ok_or(RequestError::MissingField { field: "longitude" })?;
        let radius_km = payload
            .radius_km
            .ok_or(RequestError::MissingField { field: "radius" })?;
        let weights = CategoryWeights::new(
            payload.weight_infra.unwrap_or(1.0),
            payload.weight_env.unwrap_or(1.0),
            payload.weight_econ.unwrap_or(1.0),
        );
        let query = Self {
            latitude,
            longitude,
            radius_km,
            weights,
            description: payload.description.unwrap_or_default(),
        };
        query.validate()?;
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_a_well_formed_query() {
        assert!(SiteQuery::new(12.9716, 77.5946, 5.0).validate().is_ok());
    }

    #[rstest]
    #[case(SiteQuery::new(91.0, 0.0, 5.0))]
    #[case(SiteQuery::new(f64::NAN, 0.0, 5.0))]
    fn rejects_bad_latitude(#[case] query: SiteQuery) {
        assert!(matches!(
            query.validate(),
            Err(RequestError::InvalidLatitude { .. })
        ));
    }

    #[rstest]
    fn rejects_bad_longitude() {
        let err = SiteQuery::new(0.0, -180.5, 5.0)
            .validate()
            .expect_err("longitude out of range");
        assert!(matches!(err, RequestError::InvalidLongitude { .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn rejects_non_positive_radius(#[case] radius: f64) {
        let err = SiteQuery::new(0.0, 0.0, radius)
            .validate()
            .expect_err("radius must be positive");
        assert!(matches!(err, RequestError::InvalidRadius { .. }));
    }

    #[rstest]
    fn rejects_negative_weight() {
        let err = SiteQuery::new(0.0, 0.0, 1.0)
            .with_weights(CategoryWeights::new(1.0, -0.5, 1.0))
            .validate()
            .expect_err("negative weight");
        assert_eq!(
            err,
            RequestError::InvalidWeight {
                field: "environmental",
                value: -0.5
            }
        );
    }

    #[rstest]
    fn zero_weights_are_allowed() {
        let query =
            SiteQuery::new(0.0, 0.0, 1.0).with_weights(CategoryWeights::new(0.0, 0.0, 0.0));
        assert!(query.validate().is_ok());
    }

    #[rstest]
    fn missing_weights_default_to_equal() {
        let query: SiteQuery =
            serde_json::from_str(r#"{"latitude": 1.0, "longitude": 2.0, "radius_km": 3.0}"#)
                .expect("decode query");
        assert_eq!(query.weights, CategoryWeights::equal());
        assert!(query.description.is_empty());
    }

    #[rstest]
    #[case(SiteQueryPayload { latitude: None, longitude: Some(1.0), radius_km: Some(1.0), ..SiteQueryPayload::default() }, "latitude")]
    #[case(SiteQueryPayload { latitude: Some(1.0), longitude: None, radius_km: Some(1.0), ..SiteQueryPayload::default() }, "longitude")]
    #[case(SiteQueryPayload { latitude: Some(1.0), longitude: Some(1.0), radius_km: None, ..SiteQueryPayload::default() }, "radius")]
    fn payload_requires_location_and_radius(
        #[case] payload: SiteQueryPayload,
        #[case] expected: &'static str,
    ) {
        let err = SiteQuery::try_from(payload).expect_err("missing field");
        assert_eq!(err, RequestError::MissingField { field: expected });
    }

    #[rstest]
    fn payload_defaults_weights_to_one() {
        let payload = SiteQueryPayload {
            latitude: Some(12.9),
            longitude: Some(77.6),
            radius_km: Some(5.0),
            weight_env: Some(3.0),
            ..SiteQueryPayload::default()
        };
        let query = SiteQuery::try_from(payload).expect("valid payload");
        assert_eq!(query.weights, CategoryWeights::new(1.0, 3.0, 1.0));
    }

    #[rstest]
    fn payload_reads_the_request_field_names() {
        let payload: SiteQueryPayload = serde_json::from_str(
            r#"{
                "latitude": 12.9716,
                "longitude": 77.5946,
                "radius": 5.0,
                "weight_infra": 2.0,
                "request_description": "Export terminal"
            }"#,
        )
        .expect("decode payload");
        assert_eq!(payload.radius_km, Some(5.0));
        assert_eq!(payload.description.as_deref(), Some("Export terminal"));

        let query = SiteQuery::try_from(payload).expect("valid payload");
        assert_eq!(query.radius_km, 5.0);
        assert_eq!(query.weights, CategoryWeights::new(2.0, 1.0, 1.0));
    }

    #[rstest]
    fn payload_accepts_the_rust_field_names() {
        let payload: SiteQueryPayload = serde_json::from_str(
            r#"{"latitude": 1.0, "longitude": 2.0, "radius_km": 3.0, "description": "d"}"#,
        )
        .expect("decode payload");
        assert_eq!(payload.radius_km, Some(3.0));
        assert_eq!(payload.description.as_deref(), Some("d"));
    }

    #[rstest]
    fn payload_serialises_the_request_field_names() {
        let payload = SiteQueryPayload {
            radius_km: Some(5.0),
            description: Some("d".to_owned()),
            ..SiteQueryPayload::default()
        };
        let json = serde_json::to_value(&payload).expect("encode payload");
        assert_eq!(json["radius"], 5.0);
        assert_eq!(json["request_description"], "d");
    }
}
