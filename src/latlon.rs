use std::{fmt::Display, hash::{Hash, Hasher}, str::FromStr};

use crate::{Error, ParseCoord, hash_bits, utm::Utm, mgrs::Mgrs, projections::transverse_mercator::ProjectionFactors};

/// Mean radius of Earth in meters
/// 
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;

/// Representation of a WGS84 Latitude/Longitude point. Can be converted
/// to/from [`Utm`] and [`Mgrs`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
}

impl LatLon {
    /// Creates a point without checking the bounds of lat/lon. Conversions
    /// check what they need.
    pub fn new(lat: f64, lon: f64) -> LatLon {
        Self {
            latitude: lat,
            longitude: lon,
        }
    }

    /// Tries to create a latitude/longitude point from a lat/lon pair. First checks if the
    /// values are valid:
    /// * Latitude must be in range [-90,90]
    /// * Longitude must be in range [-180,180]
    /// 
    /// # Errors
    /// 
    /// Returns [`Error::InvalidCoord`] if either latitude or longitude are invalid.
    /// 
    /// # Usage
    /// 
    /// ```
    /// use lightcrs::LatLon;
    /// 
    /// let coord = LatLon::create(48.210033, 16.363449);
    /// 
    /// assert!(coord.is_ok());
    /// 
    /// let coord = coord.unwrap();
    /// 
    /// assert_eq!(coord.latitude(), 48.210033);
    /// assert_eq!(coord.longitude(), 16.363449);
    /// 
    /// let invalid_coord_lat = LatLon::create(100.0, 0.0);
    /// assert!(invalid_coord_lat.is_err());
    /// 
    /// let invalid_coord_lon = LatLon::create(0.0, -200.0);
    /// assert!(invalid_coord_lon.is_err());
    /// ```
    pub fn create(lat: f64, lon: f64) -> Result<LatLon, Error> {
        if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")))
        } else if !(-180_f64..=180_f64).contains(&lon) {
            Err(Error::InvalidCoord(format!("Longitude {lon} outside of valid range [-180, 180].")))
        } else {
            Ok(LatLon::new(lat, lon))
        }
    }

    /// Returns the latitude value.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }
    
    /// Returns the longitude value.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns whether the current point is in the northern hemisphere.
    /// 
    /// # Example
    /// 
    /// ```
    /// use lightcrs::LatLon;
    /// 
    /// assert!(LatLon::new(48.210033, 16.363449).is_north());
    /// assert!(LatLon::new(0.0, 16.363449).is_north());
    /// assert!(!LatLon::new(-33.8688, 151.2093).is_north());
    /// ```
    pub fn is_north(&self) -> bool {
        self.latitude >= 0.
    }

    /// Returns the distance in meters between two [`LatLon`] points
    /// using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
    /// Uses the [mean radius of the Earth](https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius)
    /// in the calculation: `6371.0088`
    pub fn haversine(&self, other: &LatLon) -> f64 {
        let lat1_r = self.latitude.to_radians();
        let lat2_r = other.latitude.to_radians();
        
        2.0 * EARTH_MEAN_RADIUS_M * (
            ((other.latitude - self.latitude).to_radians() / 2.0).sin().powi(2) + 
            lat1_r.cos() * lat2_r.cos() *
            ((other.longitude - self.longitude).to_radians() / 2.0).sin().powi(2)
        ).sqrt().asin()
    }
    
    /// Converts from [`Utm`] to [`LatLon`]
    pub fn from_utm(value: &Utm) -> LatLon {
        value.to_latlon()
    }
    
    /// Converts from [`LatLon`] to [`Utm`]
    /// 
    /// # Errors
    /// 
    /// Returns [`Error::InvalidRange`] if the latitude is outside `[-80, 84]`.
    /// 
    /// # Usage
    /// 
    /// ```
    /// use lightcrs::{Hemisphere, LatLon};
    /// 
    /// let coord = LatLon::new(48.210033, 16.363449);
    /// let converted = coord.to_utm().unwrap();
    /// 
    /// assert_eq!(converted.zone(), 33);
    /// assert_eq!(converted.hemisphere(), Hemisphere::North);
    /// assert!((converted.easting() - 601292.590).abs() < 1e-3);
    /// assert!((converted.northing() - 5340543.628).abs() < 1e-3);
    /// 
    /// assert!(LatLon::new(-85.0, 0.0).to_utm().is_err());
    /// ```
    pub fn to_utm(&self) -> Result<Utm, Error> {
        Utm::from_latlon(self)
    }

    /// Converts from [`LatLon`] to [`Utm`], also returning the grid
    /// convergence and point scale factor at this point.
    /// 
    /// # Errors
    /// 
    /// Returns [`Error::InvalidRange`] if the latitude is outside `[-80, 84]`.
    /// 
    /// # Usage
    /// 
    /// ```
    /// use lightcrs::LatLon;
    /// 
    /// let (_, factors) = LatLon::new(48.210033, 16.363449).to_utm_with_factors().unwrap();
    /// 
    /// assert!((factors.convergence - 1.016_663_613).abs() < 1e-9);
    /// assert!((factors.scale - 0.999_726_066).abs() < 1e-9);
    /// ```
    pub fn to_utm_with_factors(&self) -> Result<(Utm, ProjectionFactors), Error> {
        Utm::from_latlon_with_factors(self)
    }

    /// Converts from [`Mgrs`] to [`LatLon`]
    /// 
    /// # Usage
    /// 
    /// ```
    /// use lightcrs::{LatLon, Mgrs};
    /// 
    /// let coord = LatLon::new(48.210033, 16.363449);
    /// let coord_mgrs = Mgrs::parse_str("33UXP012405").unwrap();
    /// 
    /// let converted = LatLon::from_mgrs(&coord_mgrs);
    /// 
    /// // 100m precision
    /// assert!(converted.haversine(&coord) < 150.0);
    /// ```
    pub fn from_mgrs(value: &Mgrs) -> LatLon {
        value.to_latlon()
    }

    /// Converts from [`LatLon`] to [`Mgrs`] with `precision` digits per
    /// easting/northing (5 = 1m).
    /// 
    /// # Errors
    /// 
    /// Returns [`Error::InvalidRange`] if the latitude is outside `[-80, 84]`
    /// and [`Error::InvalidPrecision`] if `precision` is outside `[1, 5]`.
    /// 
    /// # Usage
    /// 
    /// ```
    /// use lightcrs::LatLon;
    /// 
    /// let coord = LatLon::new(48.210033, 16.363449);
    /// 
    /// assert_eq!(coord.to_mgrs(5).unwrap().to_string(), "33UXP0129240543");
    /// assert_eq!(coord.to_mgrs(3).unwrap().to_string(), "33UXP012405");
    /// ```
    pub fn to_mgrs(&self, precision: i32) -> Result<Mgrs, Error> {
        Mgrs::from_latlon(self, precision)
    }
}

impl ParseCoord for LatLon {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        Self::from_str(value)
    }
}

impl FromStr for LatLon {
    type Err = Error;

    /// Parses `"<lat> <lon>"` (the [`Display`] form) or `"<lat>, <lon>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pieces = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty());

        let (Some(lat), Some(lon), None) = (pieces.next(), pieces.next(), pieces.next()) else {
            return Err(Error::InvalidCoord(format!("Expected a latitude and a longitude in {s}")));
        };

        let lat = lat
            .parse()
            .map_err(|_| Error::InvalidCoord(format!("Latitude {lat} is not a number")))?;
        let lon = lon
            .parse()
            .map_err(|_| Error::InvalidCoord(format!("Longitude {lon} is not a number")))?;

        LatLon::create(lat, lon)
    }
}

// Coordinates compare by value. A NaN component is never equal to anything,
// which conversions reject anyway.
impl Eq for LatLon {}

impl Hash for LatLon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_bits(self.latitude).hash(state);
        hash_bits(self.longitude).hash(state);
    }
}

impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(
            f,
            "{lat} {lon}",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_form() {
        let coord: LatLon = "48.210033 16.363449".parse().unwrap();
        assert_eq!(coord, LatLon::new(48.210033, 16.363449));
        assert_eq!(coord.to_string(), "48.210033 16.363449");

        let coord: LatLon = "-33.8688, 151.2093".parse().unwrap();
        assert_eq!(coord, LatLon::new(-33.8688, 151.2093));

        assert!("48.2".parse::<LatLon>().is_err());
        assert!("48.2 16.3 1".parse::<LatLon>().is_err());
        assert!("north east".parse::<LatLon>().is_err());
        assert!("95 0".parse::<LatLon>().is_err());
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let a = LatLon::new(0., 0.);
        let b = LatLon::new(1., 0.);
        assert!((a.haversine(&b) - 111_195.08).abs() < 1.);
    }
}
