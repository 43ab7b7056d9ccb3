//! Great-circle distance between WGS84 coordinates.

use geo::Coord;

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two `(lon, lat)` coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hysite_core::haversine_km;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 0.0 };
/// let distance = haversine_km(a, b);
/// assert!((distance - 111.19).abs() < 0.1);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point trigonometry"
)]
#[must_use]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let d_lat = (to.y - from.y).to_radians();
    let d_lon = (to.x - from.x).to_radians();
    let half_chord = (d_lat / 2.0).sin().powi(2)
        + from.y.to_radians().cos() * to.y.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_KM * angle
}

/// Haversine distance taking latitude/longitude pairs in degrees.
#[must_use]
pub fn haversine_km_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_km(Coord { x: lon1, y: lat1 }, Coord { x: lon2, y: lat2 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn identical_points_are_zero_apart() {
        let point = Coord {
            x: 77.5946,
            y: 12.9716,
        };
        assert!(haversine_km(point, point).abs() < f64::EPSILON);
    }

    #[rstest]
    fn one_degree_of_longitude_on_the_equator() {
        let distance = haversine_km_between(0.0, 0.0, 0.0, 1.0);
        let expected = 111.2;
        assert!(
            (distance - expected).abs() / expected < 0.01,
            "expected about {expected} km, got {distance}"
        );
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0, 180.0)]
    #[case(90.0, 0.0, -90.0, 0.0)]
    fn antipodes_are_half_a_circumference_apart(
        #[case] lat1: f64,
        #[case] lon1: f64,
        #[case] lat2: f64,
        #[case] lon2: f64,
    ) {
        let distance = haversine_km_between(lat1, lon1, lat2, lon2);
        assert!((distance - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            lat1 in -90.0_f64..=90.0,
            lon1 in -180.0_f64..=180.0,
            lat2 in -90.0_f64..=90.0,
            lon2 in -180.0_f64..=180.0,
        ) {
            let forward = haversine_km_between(lat1, lon1, lat2, lon2);
            let backward = haversine_km_between(lat2, lon2, lat1, lon1);
            prop_assert!((forward - backward).abs() < 1e-9);
            prop_assert!(forward >= 0.0);
        }

        #[test]
        fn distance_to_self_is_zero(lat in -90.0_f64..=90.0, lon in -180.0_f64..=180.0) {
            prop_assert!(haversine_km_between(lat, lon, lat, lon).abs() < 1e-9);
        }
    }
}
