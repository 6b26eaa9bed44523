use std::{fmt::Display, hash::{Hash, Hasher}, str::FromStr};

use crate::{
    constants::{FALSE_EASTING, FALSE_NORTHING, MAX_UTM_LAT, MIN_UTM_LAT, TILE},
    hash_bits,
    latlon::LatLon,
    mgrs::{self, Mgrs},
    projections::transverse_mercator::{ProjectionFactors, TransverseMercator},
    utility::HD,
    Error, ParseCoord, ThisOrThat,
};

pub(crate) mod zonespec {
    pub(crate) const MINUTMZONE: i32 = 1;
    pub(crate) const MAXUTMZONE: i32 = 60;
}

// Envelope accepted by `Utm::create`
const MIN_EASTING: f64 = TILE;
const MAX_EASTING: f64 = 9. * TILE;
const MIN_NORTHING: f64 = 0.;
const MAX_NORTHING: f64 = FALSE_NORTHING;

/// Hemisphere of a UTM coordinate. Determines whether the false northing
/// applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hemisphere {
    #[cfg_attr(feature = "serde", serde(alias = "N"))]
    North,
    #[cfg_attr(feature = "serde", serde(alias = "S"))]
    South,
}

impl Hemisphere {
    fn from_latitude(lat: f64) -> Hemisphere {
        (lat >= 0.).ternary(Hemisphere::North, Hemisphere::South)
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hemisphere::North => write!(f, "N"),
            Hemisphere::South => write!(f, "S"),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" | "n" => Ok(Hemisphere::North),
            "S" | "s" => Ok(Hemisphere::South),
            other => Err(Error::InvalidUtmCoords(format!("Hemisphere {other} is neither N nor S"))),
        }
    }
}

/// Representation of a WGS84
/// [UTM](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system)
/// point.
///
/// The easting includes the 500km false easting. The northing of a point in
/// the southern hemisphere is stored *with* the 10,000km false northing added,
/// so it is always non-negative; [`Utm::to_latlon`] removes it again for
/// [`Hemisphere::South`].
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utm {
    pub(crate) zone: i32,
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
}

impl Utm {
    /// Creates a UTM point without checking it.
    ///
    /// ```
    /// use lightcrs::{Hemisphere, Utm};
    ///
    /// let coord = Utm::new(33, Hemisphere::North, 601292.59, 5340543.63);
    /// assert_eq!(coord.zone(), 33);
    /// ```
    pub fn new(zone: i32, hemisphere: Hemisphere, easting: f64, northing: f64) -> Utm {
        Self {
            zone,
            hemisphere,
            easting,
            northing,
        }
    }

    /// Tries to create a UTM point from its constituent parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtmCoords`] if the zone is outside `[1, 60]`, the
    /// easting outside `[100km, 900km)` or the northing outside `[0km, 10000km]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::{Hemisphere, Utm};
    ///
    /// let coord = Utm::create(18, Hemisphere::North, 585664.121, 4511315.422);
    /// assert!(coord.is_ok());
    ///
    /// assert!(Utm::create(0, Hemisphere::North, 585664.121, 4511315.422).is_err());
    /// assert!(Utm::create(61, Hemisphere::North, 585664.121, 4511315.422).is_err());
    /// assert!(Utm::create(18, Hemisphere::North, 50_000.0, 4511315.422).is_err());
    /// assert!(Utm::create(18, Hemisphere::South, 585664.121, -1.0).is_err());
    /// ```
    pub fn create(zone: i32, hemisphere: Hemisphere, easting: f64, northing: f64) -> Result<Utm, Error> {
        if !(zonespec::MINUTMZONE..=zonespec::MAXUTMZONE).contains(&zone) {
            return Err(Error::InvalidUtmCoords(format!("Zone {zone} not in [1, 60]")));
        }

        if !(MIN_EASTING..MAX_EASTING).contains(&easting) {
            return Err(Error::InvalidUtmCoords(
                format!(
                    "Easting {:.2}km not in UTM range [{:.2}km, {:.2}km)",
                    easting / 1000.0,
                    MIN_EASTING / 1000.0,
                    MAX_EASTING / 1000.0,
                )
            ));
        }

        if !(MIN_NORTHING..=MAX_NORTHING).contains(&northing) {
            return Err(Error::InvalidUtmCoords(
                format!(
                    "Northing {:.2}km not in UTM range for {} hemisphere [{:.2}km, {:.2}km]",
                    northing / 1000.0,
                    hemisphere,
                    MIN_NORTHING / 1000.0,
                    MAX_NORTHING / 1000.0,
                )
            ));
        }

        Ok(Utm::new(zone, hemisphere, easting, northing))
    }

    /// Returns the UTM zone.
    #[inline]
    pub fn zone(&self) -> i32 {
        self.zone
    }

    #[inline]
    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Returns whether the coordinate is in the northern hemisphere.
    pub fn is_north(&self) -> bool {
        self.hemisphere == Hemisphere::North
    }

    /// Returns the UTM easting, including the false easting.
    #[inline]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    /// Returns the UTM northing. Southern points include the false northing.
    #[inline]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// EPSG code of the WGS84 / UTM zone this point is expressed in.
    ///
    /// ```
    /// use lightcrs::{Hemisphere, Utm};
    ///
    /// assert_eq!(Utm::new(33, Hemisphere::North, 601292.59, 5340543.63).epsg(), 32633);
    /// assert_eq!(Utm::new(56, Hemisphere::South, 334368.63, 6250948.35).epsg(), 32756);
    /// ```
    pub fn epsg(&self) -> i32 {
        match self.hemisphere {
            Hemisphere::North => 32600 + self.zone,
            Hemisphere::South => 32700 + self.zone,
        }
    }

    /// Converts from [`LatLon`] to [`Utm`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the latitude is outside `[-80, 84]`
    /// or the longitude outside `[-180, 180]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::{Hemisphere, LatLon, Utm};
    ///
    /// let coord = LatLon::new(40.748333, -73.985278);
    /// let converted = Utm::from_latlon(&coord).unwrap();
    ///
    /// assert_eq!(converted.zone(), 18);
    /// assert_eq!(converted.hemisphere(), Hemisphere::North);
    /// assert!((converted.easting() - 585664.121).abs() < 1e-3);
    /// assert!((converted.northing() - 4511315.422).abs() < 1e-3);
    /// ```
    pub fn from_latlon(value: &LatLon) -> Result<Utm, Error> {
        Self::from_latlon_with_factors(value).map(|(utm, _)| utm)
    }

    /// Same as [`Utm::from_latlon`], but also returns the grid convergence and
    /// point scale at the coordinate.
    ///
    /// # Errors
    ///
    /// Same as [`Utm::from_latlon`].
    pub fn from_latlon_with_factors(value: &LatLon) -> Result<(Utm, ProjectionFactors), Error> {
        let lat = value.latitude;
        let lon = value.longitude;

        if !(MIN_UTM_LAT..=MAX_UTM_LAT).contains(&lat) {
            return Err(Error::InvalidRange {
                coord_type: "LatLon".to_string(),
                dest_type: "UTM".to_string(),
                msg: format!("Latitude {lat} outside of UTM limits [{MIN_UTM_LAT}, {MAX_UTM_LAT}]"),
            });
        }

        if !(-HD..=HD).contains(&lon) {
            return Err(Error::InvalidRange {
                coord_type: "LatLon".to_string(),
                dest_type: "UTM".to_string(),
                msg: format!("Longitude {lon} outside of valid range [-180, 180]"),
            });
        }

        // 180 belongs to zone 1
        let lon = (lon == HD).ternary(-HD, lon);

        let zone = standard_zone(lat, lon);
        let lon0 = central_meridian(zone);

        let (x, y, factors) = TransverseMercator::utm().from_latlon(lon0, lat, lon);

        let easting = x + FALSE_EASTING;
        let northing = (y < 0.).ternary(y + FALSE_NORTHING, y);

        Ok((
            Utm::new(zone, Hemisphere::from_latitude(lat), easting, northing),
            factors,
        ))
    }

    /// Converts from [`Utm`] to [`LatLon`].
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::{Hemisphere, Utm};
    ///
    /// let coord_utm = Utm::new(18, Hemisphere::North, 585664.121, 4511315.422);
    /// let converted = coord_utm.to_latlon();
    ///
    /// assert!((converted.latitude() - 40.748333).abs() < 1e-7);
    /// assert!((converted.longitude() - -73.985278).abs() < 1e-7);
    /// ```
    pub fn to_latlon(&self) -> LatLon {
        self.to_latlon_with_factors().0
    }

    /// Same as [`Utm::to_latlon`], but also returns the grid convergence and
    /// point scale at the coordinate.
    pub fn to_latlon_with_factors(&self) -> (LatLon, ProjectionFactors) {
        let x = self.easting - FALSE_EASTING;
        let y = match self.hemisphere {
            Hemisphere::North => self.northing,
            Hemisphere::South => self.northing - FALSE_NORTHING,
        };

        let (lat, lon, factors) = TransverseMercator::utm().to_latlon(central_meridian(self.zone), x, y);

        (LatLon::new(lat, lon), factors)
    }

    /// Converts from [`Mgrs`] to [`Utm`].
    pub fn from_mgrs(value: &Mgrs) -> Utm {
        value.to_utm()
    }

    /// Converts from [`Utm`] to [`Mgrs`]. The latitude band is taken from the
    /// latitude of this point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] if `precision` is outside `[1, 5]`
    /// and [`Error::InvalidUtmCoords`] if the point is outside the MGRS grid
    /// of its zone.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::{Hemisphere, Utm};
    ///
    /// let coord = Utm::new(56, Hemisphere::South, 334368.634, 6250948.345);
    /// assert_eq!(coord.to_mgrs(5).unwrap().to_string(), "56HLH3436850948");
    /// assert_eq!(coord.to_mgrs(2).unwrap().to_string(), "56HLH3450");
    /// ```
    pub fn to_mgrs(&self, precision: i32) -> Result<Mgrs, Error> {
        Mgrs::from_utm(self, precision)
    }
}

/// Longitude of the central meridian of a UTM zone
pub(crate) fn central_meridian(zone: i32) -> f64 {
    6.0 * f64::from(zone) - 183.
}

/// Maps lat/lon to a UTM zone, including the Norway and Svalbard exceptions.
/// `lon` must already be normalized to `[-180, 180)`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn standard_zone(lat: f64, lon: f64) -> i32 {
    let zone = ((lon + HD) / 6.).floor() as i32 + 1;
    let band = mgrs::latitude_band_letter(mgrs::to_latitude_band(lat));

    let special = match (zone, band) {
        // Norway
        (31, 'V') if lon >= 3.0 => 32,
        // Svalbard
        (32, 'X') => (lon < 9.0).ternary(31, 33),
        (34, 'X') => (lon < 21.0).ternary(33, 35),
        (36, 'X') => (lon < 33.0).ternary(35, 37),
        _ => zone,
    };

    if special != zone {
        log::debug!("zone exception {zone}{band} -> {special}{band} at lon {lon}");
    }

    special
}

impl ParseCoord for Utm {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        Self::from_str(value)
    }
}

impl FromStr for Utm {
    type Err = Error;

    /// Parses the [`Display`] form, `"<zone> <N|S> <easting> <northing>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pieces = s.split_whitespace();
        let mut next = |label: &str| {
            pieces
                .next()
                .ok_or_else(|| Error::InvalidUtmCoords(format!("Missing {label} in {s}")))
        };

        let zone = next("zone")?;
        let zone = zone
            .parse()
            .map_err(|_| Error::InvalidUtmCoords(format!("Zone {zone} is not a number")))?;
        let hemisphere = next("hemisphere")?.parse()?;
        let easting = next("easting")?;
        let easting = easting
            .parse()
            .map_err(|_| Error::InvalidUtmCoords(format!("Easting {easting} is not a number")))?;
        let northing = next("northing")?;
        let northing = northing
            .parse()
            .map_err(|_| Error::InvalidUtmCoords(format!("Northing {northing} is not a number")))?;

        if let Some(extra) = pieces.next() {
            return Err(Error::InvalidUtmCoords(format!("Unexpected trailing {extra} in {s}")));
        }

        Utm::create(zone, hemisphere, easting, northing)
    }
}

impl Eq for Utm {}

impl Hash for Utm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.zone.hash(state);
        self.hemisphere.hash(state);
        hash_bits(self.easting).hash(state);
        hash_bits(self.northing).hash(state);
    }
}

impl Display for Utm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(
            f,
            "{} {} {easting} {northing}",
            self.zone,
            self.hemisphere,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_from_longitude() {
        assert_eq!(standard_zone(0., -180.), 1);
        assert_eq!(standard_zone(0., -174.0001), 1);
        assert_eq!(standard_zone(0., -174.), 2);
        assert_eq!(standard_zone(0., 0.), 31);
        assert_eq!(standard_zone(0., 179.999), 60);
    }

    #[test]
    fn norway_exception() {
        assert_eq!(standard_zone(61., 2.999), 31);
        assert_eq!(standard_zone(61., 3.), 32);
        // Band W is not affected
        assert_eq!(standard_zone(65., 4.), 31);
    }

    #[test]
    fn svalbard_exception() {
        assert_eq!(standard_zone(78., 8.), 31);
        assert_eq!(standard_zone(78., 10.), 33);
        assert_eq!(standard_zone(78., 20.), 33);
        assert_eq!(standard_zone(78., 22.), 35);
        assert_eq!(standard_zone(78., 32.), 35);
        assert_eq!(standard_zone(78., 34.), 37);
        // Band W below Svalbard keeps the regular zones
        assert_eq!(standard_zone(71., 10.), 32);
    }

    #[test]
    fn central_meridians() {
        assert!((central_meridian(1) - -177.).abs() < f64::EPSILON);
        assert!((central_meridian(31) - 3.).abs() < f64::EPSILON);
        assert!((central_meridian(60) - 177.).abs() < f64::EPSILON);
    }

    #[test]
    fn display_and_parse() {
        let utm = Utm::new(56, Hemisphere::South, 334_368.5, 6_250_948.25);
        assert_eq!(utm.to_string(), "56 S 334368.5 6250948.25");
        assert_eq!(utm.to_string().parse::<Utm>().unwrap(), utm);

        assert!("56 X 334368.5 6250948.25".parse::<Utm>().is_err());
        assert!("56 S 334368.5".parse::<Utm>().is_err());
        assert!("56 S 334368.5 6250948.25 1".parse::<Utm>().is_err());
    }
}
