use super::Coordinates;

/// Raggio medio della Terra in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distanza ortodromica in km (formula di Haversine)
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Arrotonda a un decimale
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARSAW: Coordinates = Coordinates { lat: 52.2297, lon: 21.0122 };
    const KRAKOW: Coordinates = Coordinates { lat: 50.0647, lon: 19.9450 };

    #[test]
    fn same_point_is_zero() {
        assert_eq!(distance_km(WARSAW, WARSAW), 0.0);
    }

    #[test]
    fn warsaw_krakow_is_about_252_km() {
        let d = round_to_tenth(distance_km(WARSAW, KRAKOW));
        assert!((d - 252.0).abs() < 1.5, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_km(WARSAW, KRAKOW);
        let back = distance_km(KRAKOW, WARSAW);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Coordinates { lat: 0.0, lon: 0.0 };
        let b = Coordinates { lat: 1.0, lon: 0.0 };
        assert_eq!(round_to_tenth(distance_km(a, b)), 111.2);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_to_tenth(12.345), 12.3);
        assert_eq!(round_to_tenth(12.36), 12.4);
    }
}
