/// Degrees per half turn
pub(crate) const HD: f64 = 180.;

/// Convergence threshold for the conformal latitude inversion
const TAU_TOL: f64 = 1e-12;
/// Newton converges quadratically, so this is never reached for sane input
const TAU_MAX_ITER: usize = 15;

/// Evaluate a polynomial, coefficients ordered from the highest power down
pub(crate) fn polyval(p: &[f64], x: f64) -> f64 {
    p
        .iter()
        .fold(0_f64, |acc, val| acc*x + val)
}

pub(crate) trait GeoMath {
    fn is_zero(&self) -> bool;
    fn eatanhe(&self, es: Self) -> Self;
    fn taupf(&self, es: Self) -> Self;
    fn tauf(&self, es: Self) -> Self;
}

impl GeoMath for f64 {
    fn is_zero(&self) -> bool {
        self.abs() < f64::EPSILON
    }

    /// `e * atanh(e * x)`
    fn eatanhe(&self, es: f64) -> f64 {
        es * (es * *self).atanh()
    }

    /// Maps `tan(phi)` to `tan(chi)`, where `chi` is the conformal latitude
    fn taupf(&self, es: f64) -> f64 {
        let tau1 = 1.0_f64.hypot(*self);
        let sig = (*self / tau1).eatanhe(es).sinh();

        1.0_f64.hypot(sig) * *self - sig * tau1
    }

    /// Inverse of [`GeoMath::taupf`] by Newton's method, starting from `tau = tau'`.
    #[allow(clippy::similar_names)]
    fn tauf(&self, es: f64) -> f64 {
        let e2m = 1.0 - es.powi(2);
        let mut tau = *self;
        let mut dtau = f64::INFINITY;

        for _ in 0..TAU_MAX_ITER {
            let taupa = tau.taupf(es);
            dtau = (*self - taupa) / 1.0_f64.hypot(taupa)
                * (1.0 + e2m * tau.powi(2))
                / (e2m * 1.0_f64.hypot(tau));
            tau += dtau;
            if dtau.abs() <= TAU_TOL {
                return tau;
            }
        }

        log::warn!("conformal latitude inversion did not converge for tau' = {self}");
        debug_assert!(
            dtau.abs() <= TAU_TOL,
            "conformal latitude inversion did not converge for tau' = {self}, last step {dtau}"
        );
        tau
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ES: f64 = 0.081_819_190_842_621_5;

    #[test]
    fn polyval_evaluates_highest_power_first() {
        // 2x^2 + 3x + 4 at x = 2
        assert!((polyval(&[2., 3., 4.], 2.) - 18.).abs() < 1e-12);
        assert!(polyval(&[], 5.).is_zero());
    }

    #[test]
    fn tauf_inverts_taupf() {
        for deg in [-80.0_f64, -45.0, -1.0, 0.0, 0.5, 30.0, 60.0, 84.0] {
            let tau = deg.to_radians().tan();
            let taup = tau.taupf(ES);
            assert!((taup.tauf(ES) - tau).abs() < 1e-12 * tau.abs().max(1.0), "lat {deg}");
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "did not converge")]
    fn tauf_asserts_on_divergence() {
        let _ = f64::NAN.tauf(ES);
    }

    #[test]
    fn conformal_latitude_is_closer_to_equator() {
        let tau = 45_f64.to_radians().tan();
        assert!(tau.taupf(ES) < tau);
        assert!(0_f64.taupf(ES).is_zero());
    }
}
