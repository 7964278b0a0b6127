use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use uom::si::{angle::degree, f64::*, length::meter};

use super::normalize_heading;

/// A latitude/longitude pair in degrees on the WGS84 ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}
impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90., 90.),
            longitude: wrap_longitude(longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Initial great-circle bearing from this point towards `other`, in `[0, 360)`.
    pub fn bearing_to(&self, other: &Coordinates) -> Angle {
        let (_, azimuth, _, _): (f64, f64, f64, f64) = Geodesic::wgs84().inverse(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        );

        Angle::new::<degree>(normalize_heading(azimuth))
    }

    /// Great-circle distance between this point and `other`.
    pub fn distance_to(&self, other: &Coordinates) -> Length {
        let distance: f64 = Geodesic::wgs84().inverse(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        );

        Length::new::<meter>(distance)
    }

    /// The point reached by travelling `distance` along the great circle
    /// leaving this point at `bearing`.
    pub fn destination(&self, bearing: Angle, distance: Length) -> Coordinates {
        let (latitude, longitude): (f64, f64) = Geodesic::wgs84().direct(
            self.latitude,
            self.longitude,
            bearing.get::<degree>(),
            distance.get::<meter>(),
        );

        Coordinates::new(latitude, longitude)
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.).rem_euclid(360.) - 180.;
    if wrapped < -180. {
        180.
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::length::nautical_mile;

    // London Heathrow
    const EGLL: (f64, f64) = (51.4700, -0.4543);
    // Zurich
    const LSZH: (f64, f64) = (47.4647, 8.5492);

    fn egll() -> Coordinates {
        Coordinates::new(EGLL.0, EGLL.1)
    }

    fn lszh() -> Coordinates {
        Coordinates::new(LSZH.0, LSZH.1)
    }

    #[test]
    fn distance_between_heathrow_and_zurich_is_about_425_nautical_miles() {
        let distance = egll().distance_to(&lszh()).get::<nautical_mile>();

        assert!((distance - 425.).abs() < 5., "distance was {}", distance);
    }

    #[test]
    fn bearing_from_heathrow_to_zurich_is_south_east() {
        let bearing = egll().bearing_to(&lszh()).get::<degree>();

        assert!(bearing > 110. && bearing < 130., "bearing was {}", bearing);
    }

    #[test]
    fn bearing_is_normalized_for_westbound_tracks() {
        let bearing = lszh().bearing_to(&egll()).get::<degree>();

        assert!(bearing > 295. && bearing < 320., "bearing was {}", bearing);
    }

    #[test]
    fn destination_travels_the_requested_distance() {
        let origin = egll();
        let distance = Length::new::<nautical_mile>(10.);
        let destination = origin.destination(Angle::new::<degree>(90.), distance);

        assert_eq!(
            origin.distance_to(&destination).get::<meter>().round(),
            distance.get::<meter>().round()
        );
    }

    #[test]
    fn travelling_north_increases_latitude() {
        let destination =
            egll().destination(Angle::new::<degree>(0.), Length::new::<meter>(10_000.));

        assert!(destination.latitude() > EGLL.0);
        assert!((destination.longitude() - EGLL.1).abs() < 1e-6);
    }

    #[test]
    fn longitudes_are_wrapped() {
        let coordinates = Coordinates::new(0., 190.);

        assert!((coordinates.longitude() - -170.).abs() < 1e-9);
    }
}
