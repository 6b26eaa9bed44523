use std::collections::HashSet;

use lightcrs::{Error, Hemisphere, LatLon, Mgrs, ParseCoord};

#[test]
fn format_parse_is_identity() {
    let refs = [
        "33UXP0129240543",
        "33UXP012405",
        "04UGJ2345300456",
        "04UGJ2345",
        "4UGJ23",
        "60XWU3382928945",
        "01CDM4380317013",
        "31NAA6602100000",
        "56HLH34365094",
    ];

    for s in refs {
        let parsed = Mgrs::parse_str(s).unwrap();
        let expected = if s.len() % 2 == 0 { format!("0{s}") } else { s.to_string() };
        assert_eq!(parsed.to_string(), expected);
        assert_eq!(Mgrs::parse_str(&parsed.to_string()).unwrap(), parsed);
    }
}

#[test]
fn parse_normalizes_to_five_digits() {
    let coord = Mgrs::parse_str("33UXP012405").unwrap();

    assert_eq!(coord.zone(), 33);
    assert_eq!(coord.band(), 'U');
    assert_eq!(coord.gzd(), "33U");
    assert_eq!(coord.square_id(), "XP");
    assert_eq!(coord.easting(), 1200);
    assert_eq!(coord.northing(), 40500);
    assert_eq!(coord.precision(), 3);
    assert!(coord.is_north());
}

#[test]
fn parse_accepts_separators_and_lowercase() {
    let expected = Mgrs::parse_str("04UGJ2345300456").unwrap();

    assert_eq!(Mgrs::parse_str("04UGJ 23453 00456").unwrap(), expected);
    assert_eq!(Mgrs::parse_str("04U GJ 23453 00456").unwrap(), expected);
    assert_eq!(Mgrs::parse_str("  04ugj2345300456 ").unwrap(), expected);
    assert_eq!(Mgrs::parse_str("4UGJ2345300456").unwrap(), expected);
    assert_eq!(Mgrs::parse_coord("04UGJ2345300456").unwrap(), expected);
}

#[test]
fn parse_rejects_malformed_strings() {
    for s in [
        "not-a-ref",
        "",
        "33",
        "33U",
        "33UX",
        "33UXP",
        "333UXP0101",
        "33UXP01234",
        "33UXP012 4",
        "33UXP123456123456",
        "33UXP12345 123456",
        "33UXP12a45",
        "33UXP12  45",
        "33IXP1234",
        "61UXP1234",
        "00UXP1234",
        "33UAP1234",
        "33UXW1234",
        "33UXP1234é",
    ] {
        assert!(matches!(Mgrs::parse_str(s), Err(Error::InvalidMgrs(_))), "{s} parsed");
    }
}

#[test]
fn truncates_instead_of_rounding() {
    let coord = Mgrs::parse_str("04UGJ2345300456").unwrap();
    let coarse = coord.with_precision(3).unwrap();

    assert_eq!(coarse.to_string(), "04UGJ234004");
    assert_eq!(coarse.easting(), 23400);
    assert_eq!(coarse.northing(), 400);

    let rounded_up = Mgrs::parse_str("04UGJ9999999999").unwrap();
    assert_eq!(rounded_up.with_precision(1).unwrap().to_string(), "04UGJ99");

    assert!(matches!(coord.with_precision(0), Err(Error::InvalidPrecision(0))));
    assert!(matches!(coord.with_precision(6), Err(Error::InvalidPrecision(6))));
}

#[test]
fn latlon_precision_is_truncated() {
    let coord = LatLon::new(48.210033, 16.363449);

    assert_eq!(coord.to_mgrs(5).unwrap().to_string(), "33UXP0129240543");
    assert_eq!(coord.to_mgrs(4).unwrap().to_string(), "33UXP01294054");
    assert_eq!(coord.to_mgrs(3).unwrap().to_string(), "33UXP012405");
    assert_eq!(coord.to_mgrs(2).unwrap().to_string(), "33UXP0140");
    assert_eq!(coord.to_mgrs(1).unwrap().to_string(), "33UXP04");
    assert!(matches!(coord.to_mgrs(0), Err(Error::InvalidPrecision(0))));
    assert!(matches!(coord.to_mgrs(6), Err(Error::InvalidPrecision(6))));
}

#[test]
fn coarse_reference_decodes_near_origin() {
    let vienna = LatLon::new(48.210033, 16.363449);
    let decoded = Mgrs::parse_str("33UXP012405").unwrap().to_latlon();

    // South-west corner of a 100m cell
    assert!(vienna.haversine(&decoded) < 150.0);

    let utm = Mgrs::parse_str("33UXP012405").unwrap().to_utm();
    assert_eq!(utm.zone(), 33);
    assert_eq!(utm.hemisphere(), Hemisphere::North);
    assert_eq!(utm.easting(), 601_200.0);
    assert_eq!(utm.northing(), 5_340_500.0);
}

#[test]
fn distance_within_square() {
    let a = Mgrs::parse_str("04UGJ2345300456").unwrap();
    let b = Mgrs::parse_str("04UGJ2345500459").unwrap();

    assert_eq!(a.distance(&b).unwrap(), (2.0, 3.0));
    assert_eq!(b.distance(&a).unwrap(), (-2.0, -3.0));
    assert_eq!(a.distance(&a).unwrap(), (0.0, 0.0));

    let c = Mgrs::parse_str("04UGJ234004").unwrap();
    let d = Mgrs::parse_str("04UGJ236007").unwrap();
    assert_eq!(c.distance(&d).unwrap(), (2.0, 3.0));
    assert_eq!(d.distance(&c).unwrap(), (-2.0, -3.0));
}

#[test]
fn distance_across_squares_fails() {
    let a = Mgrs::parse_str("33UXP01200450").unwrap();
    let b = Mgrs::parse_str("04UGJ2345300456").unwrap();
    assert!(matches!(a.distance(&b), Err(Error::Comparison(_))));

    let c = Mgrs::parse_str("04UGK2345300456").unwrap();
    assert!(matches!(b.distance(&c), Err(Error::Comparison(_))));

    let coarse = b.with_precision(4).unwrap();
    assert!(matches!(b.distance(&coarse), Err(Error::Comparison(_))));
}

#[test]
fn equality_includes_precision() {
    let fine = Mgrs::create("04U", "GJ", 23400, 400, 5).unwrap();
    let coarse = Mgrs::create("04U", "GJ", 23400, 400, 3).unwrap();

    assert_ne!(fine, coarse);
    assert_eq!(coarse, Mgrs::parse_str("04UGJ234004").unwrap());

    let set: HashSet<Mgrs> = [fine, coarse, Mgrs::parse_str("04UGJ234004").unwrap()].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn value_types_hash_by_value() {
    let set: HashSet<LatLon> = [
        LatLon::new(0.0, 0.0),
        LatLon::new(-0.0, 0.0),
        LatLon::new(48.210033, 16.363449),
    ].into_iter().collect();
    assert_eq!(set.len(), 2);

    let utm = LatLon::new(48.210033, 16.363449).to_utm().unwrap();
    let set: HashSet<lightcrs::Utm> = [utm, utm, LatLon::new(-33.8688, 151.2093).to_utm().unwrap()]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn southern_band_letters() {
    let coord = Mgrs::parse_str("56HLH3436850948").unwrap();
    assert!(!coord.is_north());
    assert_eq!(coord.to_utm().hemisphere(), Hemisphere::South);
    assert_eq!(coord.to_utm().epsg(), 32756);

    let equator = Mgrs::parse_str("31NAA6602100000").unwrap();
    assert!(equator.is_north());
    assert_eq!(equator.to_utm().northing(), 0.0);
}
