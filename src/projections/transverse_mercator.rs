use lazy_static::lazy_static;

use crate::{utility::{polyval, GeoMath}, constants::{WGS84_A, WGS84_F, UTM_K0}};

// ================================
// Transverse Mercator Constants
// ================================

// Sixth order Krüger series, Karney (2011) "Transverse Mercator with an
// accuracy of a few nanometers", J. Geodesy 85(8).
const B1_COEFF: [f64; 5] = [
    // b1*(n+1), polynomial in n2 of order 3
    1., 4., 64., 256., 256.,
];  // count = 5

// Eqs. 7-14, 35
#[allow(clippy::unreadable_literal)]
const ALP_COEFF: [f64; 27] = [
    // alp[1]/n^1, polynomial in n of order 5
    31564., -66675., 34440., 47250., -100800., 75600., 151200.,
    // alp[2]/n^2, polynomial in n of order 4
    -1983433., 863232., 748608., -1161216., 524160., 1935360.,
    // alp[3]/n^3, polynomial in n of order 3
    670412., 406647., -533952., 184464., 725760.,
    // alp[4]/n^4, polynomial in n of order 2
    6601661., -7732800., 2230245., 7257600.,
    // alp[5]/n^5, polynomial in n of order 1
    -13675556., 3438171., 7983360.,
    // alp[6]/n^6, polynomial in n of order 0
    212378941., 319334400.,
];  // count = 27

// Eqs. 15-22, 36
#[allow(clippy::unreadable_literal)]
const BET_COEFF: [f64; 27] = [
    // bet[1]/n^1, polynomial in n of order 5
    384796., -382725., -6720., 932400., -1612800., 1209600., 2419200.,
    // bet[2]/n^2, polynomial in n of order 4
    -1118711., 1695744., -1174656., 258048., 80640., 3870720.,
    // bet[3]/n^3, polynomial in n of order 3
    22276., -16929., -15984., 12852., 362880.,
    // bet[4]/n^4, polynomial in n of order 2
    -830251., -158400., 197865., 7257600.,
    // bet[5]/n^5, polynomial in n of order 1
    -435388., 453717., 15966720.,
    // bet[6]/n^6, polynomial in n of order 0
    20648693., 638668800.,
];  // count = 27

const MAXPOW: usize = 6;
const M: usize = MAXPOW / 2;

lazy_static! {
    static ref UTM: TransverseMercator = TransverseMercator::new(WGS84_A, WGS84_F, UTM_K0);
}

/// Grid convergence and point scale of the transverse Mercator projection at
/// a point. Both are byproducts of the projection series and are identical
/// (to rounding) whether computed on the forward or the inverse path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionFactors {
    /// Grid convergence in degrees: the angle from grid north to true north,
    /// measured clockwise.
    pub convergence: f64,
    /// Point scale factor, `k0` on the central meridian.
    pub scale: f64,
}

/// Sums of the Krüger series terms at `(xi, eta)`
struct SeriesSums {
    // sum c_j sin(2j xi) cosh(2j eta)
    sin_cosh: f64,
    // sum c_j cos(2j xi) sinh(2j eta)
    cos_sinh: f64,
    // sum 2j c_j cos(2j xi) cosh(2j eta)
    d_cos_cosh: f64,
    // sum 2j c_j sin(2j xi) sinh(2j eta)
    d_sin_sinh: f64,
}

impl SeriesSums {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(coeffs: &[f64; MAXPOW + 1], xi: f64, eta: f64) -> SeriesSums {
        coeffs
            .iter()
            .enumerate()
            .skip(1)
            .fold(
                SeriesSums { sin_cosh: 0., cos_sinh: 0., d_cos_cosh: 0., d_sin_sinh: 0. },
                |acc, (j, c)| {
                    let j2 = 2. * j as f64;
                    let (s, co) = (j2 * xi).sin_cos();
                    let (sh, ch) = ((j2 * eta).sinh(), (j2 * eta).cosh());

                    SeriesSums {
                        sin_cosh: acc.sin_cosh + c * s * ch,
                        cos_sinh: acc.cos_sinh + c * co * sh,
                        d_cos_cosh: acc.d_cos_cosh + j2 * c * co * ch,
                        d_sin_sinh: acc.d_sin_sinh + j2 * c * s * sh,
                    }
                },
            )
    }
}

#[derive(Debug)]
pub(crate) struct TransverseMercator {
    a: f64,
    k0: f64,
    es: f64,
    a1: f64,
    alp: [f64; MAXPOW + 1],
    bet: [f64; MAXPOW + 1],
}

impl TransverseMercator {
    /// Shared WGS84 / UTM instance. The series coefficients are computed once
    /// on first use and are read-only afterwards.
    pub fn utm() -> &'static TransverseMercator {
        &UTM
    }

    fn new(a: f64, f: f64, k0: f64) -> TransverseMercator {
        let n = f / (2. - f);
        let es = (f * (2. - f)).sqrt();

        let b1 = polyval(&B1_COEFF[0..=M], n.powi(2)) / (B1_COEFF[M + 1] * (1. + n));
        // a1 is the rectifying radius, A in Karney's notation
        let a1 = b1 * a;

        let mut alp = [0_f64; MAXPOW + 1];
        let mut bet = [0_f64; MAXPOW + 1];

        let mut o = 0;
        let mut d = n;

        for l in 1..=MAXPOW {
            let m = MAXPOW - l;
            alp[l] = d * polyval(&ALP_COEFF[o..=o+m], n) / ALP_COEFF[o + m + 1];
            bet[l] = d * polyval(&BET_COEFF[o..=o+m], n) / BET_COEFF[o + m + 1];
            o += m + 2;
            d *= n;
        }

        Self {
            a,
            k0,
            es,
            a1,
            alp,
            bet,
        }
    }

    /// Forward projection relative to the central meridian `lon0`. Returns
    /// `(x, y)` in meters from the origin, without false easting/northing.
    #[allow(clippy::similar_names)]
    pub fn from_latlon(&self, lon0: f64, lat: f64, lon: f64) -> (f64, f64, ProjectionFactors) {
        let phi = lat.to_radians();
        let lam = (lon - lon0).to_radians();
        let (sin_lam, cos_lam) = lam.sin_cos();

        let tau = phi.tan();
        let taup = tau.taupf(self.es);

        let xip = taup.atan2(cos_lam);
        let etap = (sin_lam / taup.hypot(cos_lam)).asinh();

        let sums = SeriesSums::evaluate(&self.alp, xip, etap);
        let xi = xip + sums.sin_cosh;
        let eta = etap + sums.cos_sinh;

        let x = self.k0 * self.a1 * eta;
        let y = self.k0 * self.a1 * xi;

        // Eqs. 23-25
        let p = 1. + sums.d_cos_cosh;
        let q = sums.d_sin_sinh;

        let gamma = (taup / 1_f64.hypot(taup) * lam.tan()).atan() + q.atan2(p);

        let kp = (1. - (self.es * phi.sin()).powi(2)).sqrt() * 1_f64.hypot(tau) / taup.hypot(cos_lam);
        let kpp = self.a1 / self.a * p.hypot(q);

        (x, y, ProjectionFactors { convergence: gamma.to_degrees(), scale: self.k0 * kp * kpp })
    }

    /// Inverse projection relative to the central meridian `lon0`. `x` and
    /// `y` are meters from the origin, without false easting/northing.
    /// Returns `(lat, lon)` in degrees.
    #[allow(clippy::similar_names)]
    pub fn to_latlon(&self, lon0: f64, x: f64, y: f64) -> (f64, f64, ProjectionFactors) {
        let eta = x / (self.k0 * self.a1);
        let xi = y / (self.k0 * self.a1);

        let sums = SeriesSums::evaluate(&self.bet, xi, eta);
        let xip = xi - sums.sin_cosh;
        let etap = eta - sums.cos_sinh;

        let sinh_etap = etap.sinh();
        let (sin_xip, cos_xip) = xip.sin_cos();
        let r = sinh_etap.hypot(cos_xip);

        let (phi, tau) = if r.is_zero() {
            // Pole
            (90_f64.copysign(xip).to_radians(), f64::INFINITY)
        } else {
            let tau = (sin_xip / r).tauf(self.es);
            (tau.atan(), tau)
        };
        let lam = sinh_etap.atan2(cos_xip);

        // Eqs. 26-28
        let p = 1. - sums.d_cos_cosh;
        let q = sums.d_sin_sinh;

        let gamma = (xip.tan() * etap.tanh()).atan() + q.atan2(p);

        let kp = (1. - (self.es * phi.sin()).powi(2)).sqrt() * 1_f64.hypot(tau) * r;
        let kpp = self.a1 / self.a / p.hypot(q);

        (
            phi.to_degrees(),
            lam.to_degrees() + lon0,
            ProjectionFactors { convergence: gamma.to_degrees(), scale: self.k0 * kp * kpp },
        )
    }
}
