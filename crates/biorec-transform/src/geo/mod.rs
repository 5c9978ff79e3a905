//! Geodetic helpers: the reference ellipsoid table and UTM grid conversion.

pub mod ellipsoid;
pub mod utm;

pub use ellipsoid::{ELLIPSOIDS, Ellipsoid, find_ellipsoid};
pub use utm::{GridZone, parse_grid_zone, utm_to_lat_long};
