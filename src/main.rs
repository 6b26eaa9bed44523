use lightcrs::{Hemisphere, LatLon, Mgrs, Utm};

fn main() -> Result<(), lightcrs::Error> {
    let vienna = LatLon::new(48.210033, 16.363449);
    let (utm, factors) = vienna.to_utm_with_factors()?;
    let mgrs = vienna.to_mgrs(Mgrs::DEFAULT_PRECISION)?;

    println!("LatLon: {vienna}");
    println!("UTM:    {utm} (EPSG:{})", utm.epsg());
    println!("        convergence {:.6} deg, scale {:.8}", factors.convergence, factors.scale);
    println!("MGRS:   {mgrs}");

    let coarse = Mgrs::parse_str("33UXP012405")?;
    let decoded = coarse.to_latlon();
    println!("{coarse} -> {decoded} ({:.1}m from {vienna})", decoded.haversine(&vienna));

    let utm = Utm::create(33, Hemisphere::North, 601_292.59, 5_340_543.63)?;
    println!("{utm} -> {} / {}", utm.to_latlon(), utm.to_mgrs(4)?);

    Ok(())
}
