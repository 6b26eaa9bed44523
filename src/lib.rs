//! Conversions between WGS84 latitude/longitude, UTM and MGRS.
//!
//! ```
//! use lightcrs::{LatLon, Mgrs};
//!
//! let vienna = LatLon::new(48.210033, 16.363449);
//!
//! let utm = vienna.to_utm().unwrap();
//! assert_eq!(utm.zone(), 33);
//! assert_eq!(utm.epsg(), 32633);
//!
//! let mgrs = vienna.to_mgrs(Mgrs::DEFAULT_PRECISION).unwrap();
//! assert_eq!(mgrs.to_string(), "33UXP0129240543");
//! ```
#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

use thiserror::Error;

pub mod latlon;
pub mod mgrs;
pub mod utm;

pub use latlon::LatLon;
pub use mgrs::Mgrs;
pub use projections::transverse_mercator::ProjectionFactors;
pub use utm::{Hemisphere, Utm};

pub(crate) mod projections {
    pub mod transverse_mercator;
}

pub(crate) mod constants;
pub(crate) mod utility;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
    #[error("MGRS String is invalid: {0}")]
    InvalidMgrs(String),
    #[error("UTM coords are invalid: {0}")]
    InvalidUtmCoords(String),
    #[error("MGRS precision {0} not in range [1, 5]")]
    InvalidPrecision(i32),
    #[error("Coordinate type {coord_type} not valid for conversion to {dest_type}: {msg}")]
    InvalidRange {
        coord_type: String,
        dest_type: String,
        msg: String,
    },
    #[error("Cannot compare {0}")]
    Comparison(String),
}

pub trait ParseCoord {
    /// Parses a coordinate from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid representation of `Self`.
    fn parse_coord(value: &str) -> Result<Self, Error>
    where Self: Sized;
}

/// Parses any coordinate type from a string.
///
/// # Errors
///
/// Returns the parse error of the target type.
///
/// # Usage
///
/// ```
/// use lightcrs::{LatLon, Mgrs, Utm};
///
/// let mgrs: Mgrs = lightcrs::from_str("04UGJ2345300456").unwrap();
/// assert_eq!(mgrs.precision(), 5);
///
/// let coord: LatLon = lightcrs::from_str("48.210033 16.363449").unwrap();
/// assert_eq!(coord.latitude(), 48.210033);
///
/// let utm: Utm = lightcrs::from_str("56 S 334368.634 6250948.345").unwrap();
/// assert_eq!(utm.epsg(), 32756);
/// ```
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where 
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }
}

/// Folds `-0.0` into `0.0` so that hashing agrees with `==`.
pub(crate) fn hash_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}
