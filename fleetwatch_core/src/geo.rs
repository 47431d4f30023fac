//! Great-circle distance on a spherical earth.

use crate::model::Coordinates;

/// Mean earth radius used for all fleet distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn distance_meters(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h marginally above 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_known_distance() {
        // Jakarta to Surabaya, roughly 660 km
        let jakarta = Coordinates::new(-6.2088, 106.8456);
        let surabaya = Coordinates::new(-7.2575, 112.7521);

        let d = distance_meters(&jakarta, &surabaya);
        assert!(d > 650_000.0 && d < 670_000.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);

        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert_relative_eq!(distance_meters(&a, &b), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_antipodal_is_finite() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);

        let d = distance_meters(&a, &b);
        assert!(d.is_finite());
        assert_relative_eq!(d, EARTH_RADIUS_M * std::f64::consts::PI, epsilon = 1e-3);
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(lat in -90.0f64..90.0, lng in -180.0f64..180.0) {
            let a = Coordinates::new(lat, lng);
            prop_assert_eq!(distance_meters(&a, &a), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(
            lat1 in -90.0f64..90.0, lng1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lng2 in -180.0f64..180.0,
        ) {
            let a = Coordinates::new(lat1, lng1);
            let b = Coordinates::new(lat2, lng2);
            let ab = distance_meters(&a, &b);
            let ba = distance_meters(&b, &a);

            prop_assert!(ab >= 0.0);
            prop_assert!(ab.is_finite());
            prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
        }
    }
}
