//! Reference ellipsoids for UTM conversion.

/// A reference ellipsoid: equatorial radius in metres and the square of the
/// first eccentricity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub name: &'static str,
    pub equatorial_radius: f64,
    pub eccentricity_squared: f64,
}

/// The ellipsoids accepted by name in UTM imports.
pub const ELLIPSOIDS: [Ellipsoid; 23] = [
    Ellipsoid { name: "Airy", equatorial_radius: 6_377_563.0, eccentricity_squared: 0.006_670_54 },
    Ellipsoid { name: "Australian National", equatorial_radius: 6_378_160.0, eccentricity_squared: 0.006_694_542 },
    Ellipsoid { name: "Bessel 1841", equatorial_radius: 6_377_397.0, eccentricity_squared: 0.006_674_372 },
    Ellipsoid { name: "Bessel 1841 (Nambia)", equatorial_radius: 6_377_484.0, eccentricity_squared: 0.006_674_372 },
    Ellipsoid { name: "Clarke 1866", equatorial_radius: 6_378_206.0, eccentricity_squared: 0.006_768_658 },
    Ellipsoid { name: "Clarke 1880", equatorial_radius: 6_378_249.0, eccentricity_squared: 0.006_803_511 },
    Ellipsoid { name: "Everest", equatorial_radius: 6_377_276.0, eccentricity_squared: 0.006_637_847 },
    Ellipsoid { name: "Fischer 1960 (Mercury)", equatorial_radius: 6_378_166.0, eccentricity_squared: 0.006_693_422 },
    Ellipsoid { name: "Fischer 1968", equatorial_radius: 6_378_150.0, eccentricity_squared: 0.006_693_422 },
    Ellipsoid { name: "GRS 1967", equatorial_radius: 6_378_160.0, eccentricity_squared: 0.006_694_605 },
    Ellipsoid { name: "GRS 1980", equatorial_radius: 6_378_137.0, eccentricity_squared: 0.006_694_38 },
    Ellipsoid { name: "Helmert 1906", equatorial_radius: 6_378_200.0, eccentricity_squared: 0.006_693_422 },
    Ellipsoid { name: "Hough", equatorial_radius: 6_378_270.0, eccentricity_squared: 0.006_722_67 },
    Ellipsoid { name: "International", equatorial_radius: 6_378_388.0, eccentricity_squared: 0.006_722_67 },
    Ellipsoid { name: "Krassovsky", equatorial_radius: 6_378_245.0, eccentricity_squared: 0.006_693_422 },
    Ellipsoid { name: "Modified Airy", equatorial_radius: 6_377_340.0, eccentricity_squared: 0.006_670_54 },
    Ellipsoid { name: "Modified Everest", equatorial_radius: 6_377_304.0, eccentricity_squared: 0.006_637_847 },
    Ellipsoid { name: "Modified Fischer 1960", equatorial_radius: 6_378_155.0, eccentricity_squared: 0.006_693_422 },
    Ellipsoid { name: "South American 1969", equatorial_radius: 6_378_160.0, eccentricity_squared: 0.006_694_542 },
    Ellipsoid { name: "WGS 60", equatorial_radius: 6_378_165.0, eccentricity_squared: 0.006_693_422 },
    Ellipsoid { name: "WGS 66", equatorial_radius: 6_378_145.0, eccentricity_squared: 0.006_694_542 },
    Ellipsoid { name: "WGS-72", equatorial_radius: 6_378_135.0, eccentricity_squared: 0.006_694_318 },
    Ellipsoid { name: "WGS-84", equatorial_radius: 6_378_137.0, eccentricity_squared: 0.006_694_38 },
];

/// Looks an ellipsoid up by name, case-insensitively.
pub fn find_ellipsoid(name: &str) -> Option<&'static Ellipsoid> {
    let wanted = name.trim();
    ELLIPSOIDS
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert!(find_ellipsoid("WGS-84").is_some());
        assert!(find_ellipsoid("wgs-84").is_some());
        assert!(find_ellipsoid("  clarke 1866  ").is_some());
        assert!(find_ellipsoid("Sphereoid X").is_none());
    }

    #[test]
    fn wgs84_parameters() {
        let e = find_ellipsoid("WGS-84").unwrap();
        assert_eq!(e.equatorial_radius, 6_378_137.0);
        assert!((e.eccentricity_squared - 0.006_694_38).abs() < 1e-9);
    }
}
