//! WGS-84 geodesy.

/// WGS-84 semi major axis [m]
pub const WGS84_A: f64 = 6378137.0;

/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257223563;

/// Converts ECEF coordinates [m] to geodetic latitude [ddeg],
/// longitude [ddeg] and height above ellipsoid [m].
///
/// Latitude uses Bowring's seed refined by fixed point iteration
/// (1e-12 [rad] tolerance, at most 10 cycles). Close to the poles,
/// where the projected radius vanishes, height degrades to the
/// distance from the polar axis intersection.
pub fn ecef_to_geodetic(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let a = WGS84_A;
    let f = WGS84_F;
    let b = a * (1.0 - f);
    let e2 = 2.0 * f - f * f;
    let ep2 = (a * a - b * b) / (b * b);

    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let theta = (z * a).atan2(p * b);
    let mut lat = (z + ep2 * b * theta.sin().powi(3)).atan2(p - e2 * a * theta.cos().powi(3));

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let refined = (z + e2 * n * sin_lat).atan2(p);
        let delta = (refined - lat).abs();
        lat = refined;
        if delta < 1e-12 {
            break;
        }
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    let height = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() - b
    };

    (lat.to_degrees(), lon.to_degrees(), height)
}

/// Direct geodetic to ECEF conversion, inverse of [ecef_to_geodetic].
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, height_m: f64) -> (f64, f64, f64) {
    let a = WGS84_A;
    let f = WGS84_F;
    let e2 = 2.0 * f - f * f;

    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();

    let n = a / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();

    let x = (n + height_m) * lat.cos() * lon.cos();
    let y = (n + height_m) * lat.cos() * lon.sin();
    let z = (n * (1.0 - e2) + height_m) * lat.sin();

    (x, y, z)
}

#[cfg(test)]
mod test {
    use super::{ecef_to_geodetic, geodetic_to_ecef};

    #[test]
    fn equator_prime_meridian() {
        let (lat, lon, height) = ecef_to_geodetic(6378137.0, 0.0, 0.0);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!(height.abs() < 1e-6);
    }

    #[test]
    fn mid_latitude_site() {
        let (lat, lon, height) = ecef_to_geodetic(-1288398.57, -4721696.931, 4078625.3467);
        assert!((lat - 39.99506637).abs() < 1e-7);
        assert!((lon - -105.26260717).abs() < 1e-7);
        assert!((height - 1648.3517).abs() < 1e-3);
    }

    #[test]
    fn polar_fallback() {
        let (lat, _, height) = ecef_to_geodetic(0.0, 0.0, 6356752.314245);
        assert!((lat - 90.0).abs() < 1e-9);
        assert!(height.abs() < 1e-3);
    }

    #[test]
    fn ecef_roundtrip() {
        for &(x, y, z) in &[
            (6378137.0, 0.0, 0.0),
            (-1288398.57, -4721696.931, 4078625.3467),
            (4075580.0, 931853.0, 4801568.0),
            (1e5, 2e6, 6.2e6),
        ] {
            let (lat, lon, height) = ecef_to_geodetic(x, y, z);
            let (rx, ry, rz) = geodetic_to_ecef(lat, lon, height);
            assert!((rx - x).abs() < 1e-6, "x roundtrip ({}, {}, {})", x, y, z);
            assert!((ry - y).abs() < 1e-6, "y roundtrip ({}, {}, {})", x, y, z);
            assert!((rz - z).abs() < 1e-6, "z roundtrip ({}, {}, {})", x, y, z);
        }
    }

    #[test]
    fn geodetic_roundtrip() {
        for &(lat, lon, height) in &[
            (0.0, 0.0, 0.0),
            (39.995066, -105.262607, 1648.35),
            (-33.856, 151.215, 58.0),
            (69.65, 18.96, 10.0),
        ] {
            let (x, y, z) = geodetic_to_ecef(lat, lon, height);
            let (rlat, rlon, rheight) = ecef_to_geodetic(x, y, z);
            assert!((rlat - lat).abs() < 1e-9);
            assert!((rlon - lon).abs() < 1e-9);
            assert!((rheight - height).abs() < 1e-6);
        }
    }
}
