//! UTM grid references and conversion to geographic coordinates.

use crate::geo::Ellipsoid;

const K0: f64 = 0.9996;
const SOUTHERN_FALSE_NORTHING: f64 = 10_000_000.0;
const FALSE_EASTING: f64 = 500_000.0;

/// A parsed UTM grid zone such as `55H`: longitudinal zone number plus
/// latitude band letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridZone {
    pub zone: u32,
    pub band: char,
}

impl GridZone {
    /// Latitude bands `N` through `X` lie north of the equator.
    pub fn is_northern(self) -> bool {
        self.band >= 'N'
    }

    /// Central meridian of the longitudinal zone, in degrees.
    pub fn central_meridian(self) -> f64 {
        f64::from((self.zone - 1) * 6) - 180.0 + 3.0
    }
}

/// Parses a grid zone string: one or two digits for the zone (1..=60)
/// followed by a latitude band letter (`C`..`X`, excluding `I` and `O`).
pub fn parse_grid_zone(text: &str) -> Result<GridZone, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty grid zone".to_string());
    }

    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest = trimmed[digits.len()..].trim();

    if digits.is_empty() {
        return Err("missing zone number".to_string());
    }
    let zone: u32 = digits.parse().map_err(|_| "bad zone number".to_string())?;
    if !(1..=60).contains(&zone) {
        return Err("zone number must be 1 to 60".to_string());
    }

    let mut band_chars = rest.chars();
    let band = band_chars
        .next()
        .ok_or_else(|| "missing latitude band letter".to_string())?
        .to_ascii_uppercase();
    if band_chars.next().is_some() {
        return Err("trailing characters after latitude band".to_string());
    }
    if !('C'..='X').contains(&band) || band == 'I' || band == 'O' {
        return Err(format!("'{band}' is not a latitude band letter"));
    }

    Ok(GridZone { zone, band })
}

/// Converts a UTM easting/northing in `grid_zone` on `ellipsoid` to
/// geographic coordinates, returned as `(longitude, latitude)` in degrees.
///
/// Uses the footpoint-latitude series expansion of the inverse transverse
/// Mercator projection.
pub fn utm_to_lat_long(
    ellipsoid: &Ellipsoid,
    easting: f64,
    northing: f64,
    grid_zone: GridZone,
) -> (f64, f64) {
    let a = ellipsoid.equatorial_radius;
    let ecc = ellipsoid.eccentricity_squared;
    let e1 = (1.0 - (1.0 - ecc).sqrt()) / (1.0 + (1.0 - ecc).sqrt());

    let x = easting - FALSE_EASTING;
    let y = if grid_zone.is_northern() {
        northing
    } else {
        northing - SOUTHERN_FALSE_NORTHING
    };

    let ecc_prime = ecc / (1.0 - ecc);

    let m = y / K0;
    let mu = m / (a * (1.0 - ecc / 4.0 - 3.0 * ecc * ecc / 64.0 - 5.0 * ecc.powi(3) / 256.0));

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - ecc * sin_phi1 * sin_phi1).sqrt();
    let t1 = tan_phi1 * tan_phi1;
    let c1 = ecc_prime * cos_phi1 * cos_phi1;
    let r1 = a * (1.0 - ecc) / (1.0 - ecc * sin_phi1 * sin_phi1).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ecc_prime) * d.powi(4)
                    / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * ecc_prime
                    - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ecc_prime + 24.0 * t1 * t1)
            * d.powi(5)
            / 120.0)
        / cos_phi1;

    let longitude = grid_zone.central_meridian() + lon.to_degrees();
    let latitude = lat.to_degrees();

    (longitude, latitude)
}
