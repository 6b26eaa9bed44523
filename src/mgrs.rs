use std::{fmt::Display, str::FromStr};

use num::Integer;

use crate::{
    constants::{FALSE_NORTHING, TILE, TILE_I32},
    latlon::LatLon,
    projections::transverse_mercator::TransverseMercator,
    utm::{central_meridian, zonespec::{MAXUTMZONE, MINUTMZONE}, Hemisphere, Utm},
    Error, ParseCoord, ThisOrThat,
};

const UTMCOLS: [&str; 3] = ["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
// Odd zones start the row letters five places later
const UTMROWS: [&str; 2] = ["ABCDEFGHJKLMNPQRSTUV", "FGHJKLMNPQRSTUVABCDE"];
const LATBAND: &str = "CDEFGHJKLMNPQRSTUVWX";

pub const BASE: i32 = 10;
pub const MAX_PRECISION: i32 = 5;
pub const MINUTMCOL: i32 = 1;
pub const MAXUTMCOL: i32 = 8;
pub const UTM_ROW_PERIOD: i32 = 20;
/// Index of band `N`, the first northern band
const NORTH_BAND: i32 = 10;
/// The row letters repeat every `UTM_ROW_PERIOD` tiles, i.e. 2000km
const ROW_BLOCK: f64 = 2_000_000.;
/// Enough blocks to cover the full northing range
const MAX_ROW_BLOCKS: usize = 10;

/// Representation of a WGS84
/// [MGRS](https://en.wikipedia.org/wiki/Military_Grid_Reference_System)
/// grid reference.
///
/// ```text
/// 04U GJ 23453 00456
/// ---                grid zone designator, zone + latitude band
///     --             100km square, column + row letter
///        -----       easting within the square
///              ----- northing within the square
/// ```
///
/// The easting and northing are kept at 1m resolution. `precision` is the
/// number of significant digits (1 = 10km ... 5 = 1m); the digits beyond it
/// are always zero since references are truncated, never rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Mgrs {
    pub(crate) zone: i32,
    // index into LATBAND
    pub(crate) band: i32,
    // 100km column, 1..=8
    pub(crate) col: i32,
    // 100km row modulo UTM_ROW_PERIOD
    pub(crate) row: i32,
    pub(crate) easting: i32,
    pub(crate) northing: i32,
    pub(crate) precision: i32,
}

impl Mgrs {
    /// 1m resolution
    pub const DEFAULT_PRECISION: i32 = MAX_PRECISION;

    /// Tries to create an MGRS reference from its parts. `gzd` shorter than 3
    /// characters is zero padded, so `"4U"` is the same as `"04U"`. Digits of
    /// `easting`/`northing` beyond `precision` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] if the grid zone designator or square
    /// letters are invalid, or easting/northing are outside `[0, 100000)`.
    /// Returns [`Error::InvalidPrecision`] if `precision` is outside `[1, 5]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::Mgrs;
    ///
    /// let coord = Mgrs::create("4U", "GJ", 23453, 456, 3).unwrap();
    /// assert_eq!(coord.gzd(), "04U");
    /// assert_eq!(coord.easting(), 23400);
    /// assert_eq!(coord.northing(), 400);
    /// assert_eq!(coord.to_string(), "04UGJ234004");
    ///
    /// assert!(Mgrs::create("61U", "GJ", 0, 0, 5).is_err());
    /// assert!(Mgrs::create("04I", "GJ", 0, 0, 5).is_err());
    /// assert!(Mgrs::create("04U", "SJ", 0, 0, 5).is_err());
    /// assert!(Mgrs::create("04U", "GJ", 100_000, 0, 5).is_err());
    /// assert!(Mgrs::create("04U", "GJ", 0, 0, 6).is_err());
    /// ```
    pub fn create(gzd: &str, square_id: &str, easting: i32, northing: i32, precision: i32) -> Result<Mgrs, Error> {
        check_precision(precision)?;

        let (zone, band) = parse_gzd(gzd)?;
        let (col, row) = parse_square_id(zone, square_id)?;

        if !(0..TILE_I32).contains(&easting) || !(0..TILE_I32).contains(&northing) {
            return Err(Error::InvalidMgrs(format!(
                "Easting {easting} and northing {northing} must be within the 100km square [0, {TILE_I32})"
            )));
        }

        Ok(Mgrs {
            zone,
            band,
            col,
            row,
            easting: truncate(easting, precision),
            northing: truncate(northing, precision),
            precision,
        })
    }

    /// Parses an MGRS string such as `"33UXP012405"` or `"33U XP 012 405"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] if the string is not a valid reference.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::Mgrs;
    ///
    /// let coord = Mgrs::parse_str("33UXP012405").unwrap();
    /// assert_eq!(coord.gzd(), "33U");
    /// assert_eq!(coord.square_id(), "XP");
    /// assert_eq!(coord.easting(), 1200);
    /// assert_eq!(coord.northing(), 40500);
    /// assert_eq!(coord.precision(), 3);
    ///
    /// assert!(Mgrs::parse_str("not-a-ref").is_err());
    /// ```
    pub fn parse_str(mgrs_str: &str) -> Result<Mgrs, Error> {
        Self::from_str(mgrs_str)
    }

    /// Returns the UTM zone.
    #[inline]
    pub fn zone(&self) -> i32 {
        self.zone
    }

    /// Returns the latitude band letter.
    pub fn band(&self) -> char {
        latitude_band_letter(self.band)
    }

    /// Returns the grid zone designator, e.g. `"04U"`.
    pub fn gzd(&self) -> String {
        format!("{:02}{}", self.zone, self.band())
    }

    /// Returns the two 100km square letters, e.g. `"GJ"`.
    pub fn square_id(&self) -> String {
        let zonem = self.zone - 1;
        let col = letter(UTMCOLS[index(zonem.mod_floor(&3))], self.col - MINUTMCOL);
        let row = letter(UTMROWS[index(zonem.mod_floor(&2))], self.row);

        [col, row].iter().collect()
    }

    /// Returns the easting within the 100km square, in meters.
    #[inline]
    pub fn easting(&self) -> i32 {
        self.easting
    }

    /// Returns the northing within the 100km square, in meters.
    #[inline]
    pub fn northing(&self) -> i32 {
        self.northing
    }

    /// Returns the number of significant digits of easting/northing.
    #[inline]
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Returns whether the reference is in the northern hemisphere, i.e. the
    /// band letter is `N` or later.
    pub fn is_north(&self) -> bool {
        self.band >= NORTH_BAND
    }

    /// Drops digits beyond `precision`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] if `precision` is outside
    /// `[1, 5]` or above the current precision.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::Mgrs;
    ///
    /// let coord = Mgrs::parse_str("04UGJ2345300456").unwrap();
    /// // Truncated, not rounded
    /// assert_eq!(coord.with_precision(3).unwrap().to_string(), "04UGJ234004");
    /// assert!(coord.with_precision(3).unwrap().with_precision(4).is_err());
    /// ```
    pub fn with_precision(&self, precision: i32) -> Result<Mgrs, Error> {
        check_precision(precision)?;
        if precision > self.precision {
            return Err(Error::InvalidPrecision(precision));
        }

        Ok(Mgrs {
            easting: truncate(self.easting, precision),
            northing: truncate(self.northing, precision),
            precision,
            ..*self
        })
    }

    /// Converts from [`LatLon`] to [`Mgrs`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the point is outside the UTM limits
    /// and [`Error::InvalidPrecision`] if `precision` is outside `[1, 5]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::{LatLon, Mgrs};
    ///
    /// let coord = LatLon::new(40.748333, -73.985278);
    /// let converted = Mgrs::from_latlon(&coord, 5).unwrap();
    ///
    /// assert_eq!(converted.to_string(), "18TWL8566411315");
    /// ```
    pub fn from_latlon(value: &LatLon, precision: i32) -> Result<Mgrs, Error> {
        check_precision(precision)?;
        let utm = value.to_utm()?;

        Self::encode(&utm, to_latitude_band(value.latitude), precision)
    }

    /// Converts from [`Mgrs`] to [`LatLon`], at the south-west corner of the
    /// referenced cell.
    pub fn to_latlon(&self) -> LatLon {
        self.to_utm().to_latlon()
    }

    /// Converts from [`Utm`] to [`Mgrs`]. The latitude band is taken from the
    /// latitude of the point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] if `precision` is outside `[1, 5]`
    /// and [`Error::InvalidUtmCoords`] if the point is outside the MGRS grid
    /// of its zone.
    pub fn from_utm(value: &Utm, precision: i32) -> Result<Mgrs, Error> {
        check_precision(precision)?;
        let lat = value.to_latlon().latitude;

        Self::encode(value, to_latitude_band(lat), precision)
    }

    /// Converts from [`Mgrs`] to [`Utm`], at the south-west corner of the
    /// referenced cell.
    ///
    /// The row letters repeat every 2000km, so the full northing is the first
    /// candidate at or above the southern edge of the latitude band.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::{Hemisphere, Mgrs};
    ///
    /// let utm = Mgrs::parse_str("56HLH3436850948").unwrap().to_utm();
    ///
    /// assert_eq!(utm.zone(), 56);
    /// assert_eq!(utm.hemisphere(), Hemisphere::South);
    /// assert_eq!(utm.easting(), 334368.0);
    /// assert_eq!(utm.northing(), 6250948.0);
    /// ```
    pub fn to_utm(&self) -> Utm {
        let hemisphere = self.is_north().ternary(Hemisphere::North, Hemisphere::South);

        let easting = f64::from(self.col) * TILE + f64::from(self.easting);
        let bottom = band_bottom_northing(self.zone, self.band);

        let mut northing = f64::from(self.row) * TILE + f64::from(self.northing);
        for _ in 0..MAX_ROW_BLOCKS {
            if northing >= bottom {
                break;
            }
            northing += ROW_BLOCK;
        }
        log::debug!("{self}: band bottom {bottom}m, northing {northing}m");

        Utm::new(self.zone, hemisphere, easting, northing)
    }

    /// Returns `(east, north)` from `self` to `other`: the delta of the
    /// stored offsets scaled by `10^(precision - 5)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Comparison`] unless both references have the same
    /// precision and lie in the same 100km square.
    ///
    /// # Usage
    ///
    /// ```
    /// use lightcrs::Mgrs;
    ///
    /// let a = Mgrs::parse_str("04UGJ2345300456").unwrap();
    /// let b = Mgrs::parse_str("04UGJ2345500459").unwrap();
    ///
    /// assert_eq!(a.distance(&b).unwrap(), (2.0, 3.0));
    /// ```
    #[allow(clippy::cast_sign_loss)]
    pub fn distance(&self, other: &Mgrs) -> Result<(f64, f64), Error> {
        if self.precision != other.precision {
            return Err(Error::Comparison(format!(
                "{self} and {other}: precision {} differs from {}", self.precision, other.precision
            )));
        }

        if (self.zone, self.band, self.col, self.row) != (other.zone, other.band, other.col, other.row) {
            return Err(Error::Comparison(format!(
                "{self} and {other}: distance across grid squares is not supported"
            )));
        }

        // 10^(precision - 5), as a divisor so whole-cell deltas stay exact
        let cell = f64::from(BASE.pow((MAX_PRECISION - self.precision) as u32));
        Ok((
            f64::from(other.easting - self.easting) / cell,
            f64::from(other.northing - self.northing) / cell,
        ))
    }

    /// Builds the reference of `utm`, which lies in latitude band `band`.
    #[allow(clippy::cast_possible_truncation)]
    fn encode(utm: &Utm, band: i32, precision: i32) -> Result<Mgrs, Error> {
        if !(MINUTMZONE..=MAXUTMZONE).contains(&utm.zone) {
            return Err(Error::InvalidUtmCoords(format!(
                "Zone {} not in range [{MINUTMZONE}, {MAXUTMZONE}]", utm.zone
            )));
        }

        let col = (utm.easting / TILE).floor() as i32;
        if !(MINUTMCOL..=MAXUTMCOL).contains(&col) {
            return Err(Error::InvalidUtmCoords(format!(
                "Easting {:.2}km not in MGRS range [100km, 900km)", utm.easting / 1000.0
            )));
        }

        if !(0. ..=FALSE_NORTHING).contains(&utm.northing) {
            return Err(Error::InvalidUtmCoords(format!(
                "Northing {:.2}km not in MGRS range [0km, 10000km]", utm.northing / 1000.0
            )));
        }
        let row_tiles = (utm.northing / TILE).floor() as i32;

        // Whole meters within the square
        let easting = (utm.easting - f64::from(col) * TILE).floor() as i32;
        let northing = (utm.northing - f64::from(row_tiles) * TILE).floor() as i32;

        Ok(Mgrs {
            zone: utm.zone,
            band,
            col,
            row: row_tiles.mod_floor(&UTM_ROW_PERIOD),
            easting: truncate(easting, precision),
            northing: truncate(northing, precision),
            precision,
        })
    }
}

fn check_precision(precision: i32) -> Result<(), Error> {
    if (1..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(Error::InvalidPrecision(precision))
    }
}

/// Zero the digits of a 5 digit value beyond `precision`.
#[allow(clippy::cast_sign_loss)]
fn truncate(value: i32, precision: i32) -> i32 {
    let d = BASE.pow((MAX_PRECISION - precision) as u32);
    value / d * d
}

#[allow(clippy::cast_sign_loss)]
fn index(i: i32) -> usize {
    i as usize
}

fn letter(set: &str, i: i32) -> char {
    set.as_bytes()[index(i)] as char
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn find(set: &str, c: char) -> Option<i32> {
    set.find(c).map(|i| i as i32)
}

/// Latitude band index in `[0, 20)`. Band `X` is 12 degrees, so 84 stays in it.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_latitude_band(lat: f64) -> i32 {
    ((lat / 8.).floor() as i32 + NORTH_BAND).clamp(0, 19)
}

pub(crate) fn latitude_band_letter(band: i32) -> char {
    letter(LATBAND, band)
}

/// Northing of the southern edge of latitude band `band` on the central
/// meridian of `zone`, floored to a tile and lowered by one tile. Off the
/// central meridian the edge moves by less than a tile.
fn band_bottom_northing(zone: i32, band: i32) -> f64 {
    let lat = f64::from(8 * (band - NORTH_BAND));
    let lon0 = central_meridian(zone);
    let (_, y, _) = TransverseMercator::utm().from_latlon(lon0, lat, lon0);
    let y = (y < 0.).ternary(y + FALSE_NORTHING, y);

    (y / TILE).floor() * TILE - TILE
}

/// Splits a grid zone designator into zone and band index.
fn parse_gzd(gzd: &str) -> Result<(i32, i32), Error> {
    let gzd = gzd.trim();
    if !gzd.is_ascii() || gzd.is_empty() {
        return Err(Error::InvalidMgrs(format!("Grid zone designator {gzd} must be 1-2 digits and a band letter")));
    }

    let (zone_str, band_str) = gzd.split_at(gzd.len() - 1);
    if !(1..=2).contains(&zone_str.len()) || !zone_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidMgrs(format!("Grid zone designator {gzd} must be 1-2 digits and a band letter")));
    }

    let zone: i32 = zone_str
        .parse()
        .map_err(|_| Error::InvalidMgrs(format!("Zone {zone_str} is not a number")))?;
    if !(MINUTMZONE..=MAXUTMZONE).contains(&zone) {
        return Err(Error::InvalidMgrs(format!("Zone {zone} not in [1,60]")));
    }

    let band = band_str
        .chars()
        .next()
        .and_then(|c| find(LATBAND, c))
        .ok_or_else(|| Error::InvalidMgrs(format!("Band letter {band_str} not in UTM set {LATBAND}")))?;

    Ok((zone, band))
}

/// Splits 100km square letters into the column (1-based) and row index for
/// `zone`.
fn parse_square_id(zone: i32, square_id: &str) -> Result<(i32, i32), Error> {
    let mut letters = square_id.chars();
    let (Some(col_letter), Some(row_letter), None) = (letters.next(), letters.next(), letters.next()) else {
        return Err(Error::InvalidMgrs(format!("Square id {square_id} must be 2 letters")));
    };

    let zonem = zone - 1;
    let cols = UTMCOLS[index(zonem.mod_floor(&3))];
    let rows = UTMROWS[index(zonem.mod_floor(&2))];

    let col = find(cols, col_letter)
        .ok_or_else(|| Error::InvalidMgrs(format!("Column letter {col_letter} not in zone {zone} set {cols}")))?;
    let row = find(rows, row_letter)
        .ok_or_else(|| Error::InvalidMgrs(format!("Row letter {row_letter} not in UTM set {rows}")))?;

    Ok((col + MINUTMCOL, row))
}

impl ParseCoord for Mgrs {
    fn parse_coord(value: &str) -> Result<Self, Error> {
        Self::from_str(value)
    }
}

impl FromStr for Mgrs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_uppercase();
        let chars = value.as_bytes();
        let len = chars.len();
        let mut p = 0;

        while p < len && chars[p].is_ascii_digit() {
            p += 1;
        }
        if p == 0 {
            return Err(Error::InvalidMgrs(format!("Missing zone number at start of {value}")));
        }
        if p > 2 {
            return Err(Error::InvalidMgrs(format!("More than 2 digits at start of MGRS {}", &value[..p])));
        }
        if p == len || !chars[p].is_ascii_uppercase() {
            return Err(Error::InvalidMgrs(format!("Missing band letter in {value}")));
        }
        p += 1;
        let gzd = &value[..p];

        // Optional separator between zone and square
        if p < len && chars[p] == b' ' {
            p += 1;
        }
        if len < p + 2 || !chars[p].is_ascii_uppercase() || !chars[p + 1].is_ascii_uppercase() {
            return Err(Error::InvalidMgrs(format!("Missing 100km square letters in {value}")));
        }
        let square_id = &value[p..p + 2];
        p += 2;

        let remainder = value[p..].trim();
        if !remainder.bytes().all(|b| b.is_ascii_digit() || b == b' ') {
            return Err(Error::InvalidMgrs(format!("Encountered a non-digit in {remainder}")));
        }

        let (easting, northing) = remainder
            .split_once(' ')
            .unwrap_or_else(|| remainder.split_at(remainder.len() / 2));

        if easting.len() != northing.len() {
            return Err(Error::InvalidMgrs(format!(
                "Easting {easting} and northing {northing} have different lengths"
            )));
        }
        if easting.is_empty() || easting.len() > index(MAX_PRECISION) || northing.contains(' ') {
            return Err(Error::InvalidMgrs(format!(
                "Easting {easting} and northing {northing} must have 1 to {MAX_PRECISION} digits"
            )));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let precision = easting.len() as i32;
        let scale = BASE.pow((MAX_PRECISION - precision).unsigned_abs());
        let parse_digits = |digits: &str| {
            digits
                .parse::<i32>()
                .map(|v| v * scale)
                .map_err(|_| Error::InvalidMgrs(format!("Encountered a non-digit in {digits}")))
        };

        Mgrs::create(gzd, square_id, parse_digits(easting)?, parse_digits(northing)?, precision)
    }
}

impl TryFrom<String> for Mgrs {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Mgrs> for String {
    fn from(value: Mgrs) -> Self {
        value.to_string()
    }
}

impl Display for Mgrs {
    #[allow(clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = BASE.pow((MAX_PRECISION - self.precision) as u32);
        let width = index(self.precision);

        write!(
            f,
            "{}{}{:0width$}{:0width$}",
            self.gzd(),
            self.square_id(),
            self.easting / d,
            self.northing / d,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_bands() {
        assert_eq!(latitude_band_letter(to_latitude_band(-80.)), 'C');
        assert_eq!(latitude_band_letter(to_latitude_band(-0.1)), 'M');
        assert_eq!(latitude_band_letter(to_latitude_band(0.)), 'N');
        assert_eq!(latitude_band_letter(to_latitude_band(48.2)), 'U');
        assert_eq!(latitude_band_letter(to_latitude_band(72.)), 'X');
        assert_eq!(latitude_band_letter(to_latitude_band(84.)), 'X');
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate(23453, 5), 23453);
        assert_eq!(truncate(23459, 4), 23450);
        assert_eq!(truncate(99999, 1), 90000);
    }

    #[test]
    fn gzd_parsing() {
        assert_eq!(parse_gzd("4U").unwrap(), (4, 16));
        assert_eq!(parse_gzd("04U").unwrap(), (4, 16));
        assert_eq!(parse_gzd("60X").unwrap(), (60, 19));
        assert!(parse_gzd("U").is_err());
        assert!(parse_gzd("104U").is_err());
        assert!(parse_gzd("00U").is_err());
        assert!(parse_gzd("33A").is_err());
        assert!(parse_gzd("").is_err());
    }

    #[test]
    fn square_letters_follow_zone() {
        // Zone 1: ABCDEFGH / ABCD...
        assert_eq!(parse_square_id(1, "AA").unwrap(), (1, 0));
        // Zone 2: JKLMNPQR / FGHJ...
        assert_eq!(parse_square_id(2, "JF").unwrap(), (1, 0));
        // Zone 3: STUVWXYZ
        assert_eq!(parse_square_id(3, "ZV").unwrap(), (8, 19));
        assert!(parse_square_id(1, "JA").is_err());
        assert!(parse_square_id(1, "AI").is_err());
        assert!(parse_square_id(1, "A").is_err());
        assert!(parse_square_id(1, "AAA").is_err());
    }

    #[test]
    fn band_bottoms() {
        // Equator
        assert!((band_bottom_northing(31, 10) - -TILE).abs() < 1e-6);
        // 48N on the central meridian is about 5317km
        assert!((band_bottom_northing(33, 16) - 5_200_000.).abs() < 1e-6);
        // 80S is about 1117km with the false northing
        assert!((band_bottom_northing(1, 0) - 1_000_000.).abs() < 1e-6);
    }
}
