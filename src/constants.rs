// Semi-major axis a
pub(crate) const WGS84_A: f64 = 6_378_137.;
// Flattening
#[allow(clippy::unreadable_literal)]
pub(crate) const WGS84_F: f64 = 1.0 / 298.257223563;

// UTM central scale factor
pub(crate) const UTM_K0: f64 = 9996.0 / 10_000.;

/// Side length of an MGRS grid square in meters
pub(crate) const TILE: f64 = 100_000.;
pub(crate) const TILE_I32: i32 = 100_000;
pub(crate) const FALSE_EASTING: f64 = 500_000.;
pub(crate) const FALSE_NORTHING: f64 = 10_000_000.;

// UTM is only defined between these latitudes
pub(crate) const MIN_UTM_LAT: f64 = -80.;
pub(crate) const MAX_UTM_LAT: f64 = 84.;
