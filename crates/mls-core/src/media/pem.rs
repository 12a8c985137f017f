use super::eqf::jca_properties;
use super::params::{ParameterSet, ParameterSpec};
use crate::constants;
use crate::error::{MlsError, Result};
use crate::linalg::{branch_sqrt, J};
use num_complex::Complex64;

/// Frequency-dependent Biot quantities in the (u, U) formulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiotState {
    pub omega: f64,
    /// Equivalent density of the saturating fluid.
    pub rho_eq: Complex64,
    /// Equivalent bulk modulus of the saturating fluid.
    pub k_eq: Complex64,
    /// In vacuo apparent frame density ρ̃.
    pub rho_til: Complex64,
    /// ρ̃ + γ̃²ρ̃_eq.
    pub rho_s: Complex64,
    /// Coupling coefficient γ̃.
    pub gamma_til: Complex64,
    /// Shear modulus of the frame.
    pub n: Complex64,
    pub a_hat: Complex64,
    pub p_hat: Complex64,
    /// Squared wavenumber of the fluid phase, δ_eq².
    pub delta_eq_2: Complex64,
    /// Compressional wavenumbers δ₁, δ₂ and shear wavenumber δ₃.
    pub delta: [Complex64; 3],
    /// Fluid/frame displacement ratios of the three waves.
    pub mu: [Complex64; 3],
}

/// Poro-elastic medium (Biot theory, JCA model for the fluid phase).
#[derive(Debug, Clone, PartialEq)]
pub struct PoroElastic {
    pub name: String,
    pub phi: f64,
    pub sigma: f64,
    pub alpha: f64,
    pub lambda_prime: f64,
    pub lambda: f64,
    /// Frame density (kg/m³).
    pub rho_1: f64,
    pub nu: f64,
    pub young: f64,
    pub eta: f64,
    state: Option<BiotState>,
}

impl PoroElastic {
    pub const REQUIRED: &'static [ParameterSpec] = &[
        ParameterSpec::real("phi"),
        ParameterSpec::real("sigma"),
        ParameterSpec::real("alpha"),
        ParameterSpec::real("Lambda_prime"),
        ParameterSpec::real("Lambda"),
        ParameterSpec::real("rho_1"),
        ParameterSpec::real("nu"),
        ParameterSpec::real("E"),
        ParameterSpec::real("eta"),
    ];
    pub const OPTIONAL: &'static [ParameterSpec] = &[];

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        phi: f64,
        sigma: f64,
        alpha: f64,
        lambda_prime: f64,
        lambda: f64,
        rho_1: f64,
        nu: f64,
        young: f64,
        eta: f64,
    ) -> Self {
        Self {
            name: "Unnamed Medium".to_string(),
            phi,
            sigma,
            alpha,
            lambda_prime,
            lambda,
            rho_1,
            nu,
            young,
            eta,
            state: None,
        }
    }

    pub fn from_parameters(params: &ParameterSet) -> Result<Self> {
        let mut values = [0.0; 9];
        for (value, spec) in values.iter_mut().zip(Self::REQUIRED) {
            *value = params.required(spec)?;
        }
        let [phi, sigma, alpha, lambda_prime, lambda, rho_1, nu, young, eta] = values;
        Ok(Self::new(
            phi,
            sigma,
            alpha,
            lambda_prime,
            lambda,
            rho_1,
            nu,
            young,
            eta,
        ))
    }

    pub fn update(&mut self, omega: f64) {
        if self.state.map(|s| s.omega) == Some(omega) {
            return;
        }

        let rho_0 = constants::RHO;
        let phi = self.phi;
        let (rho_eq, k_eq) = jca_properties(
            phi,
            self.sigma,
            self.alpha,
            self.lambda_prime,
            self.lambda,
            omega,
        );

        let alpha_til = phi * rho_eq / rho_0;
        let rho_12 = -phi * rho_0 * (alpha_til - 1.0);
        let rho_11 = self.rho_1 - rho_12;
        let rho_22 = phi * rho_0 - rho_12;
        let rho_til = rho_11 - rho_12 * rho_12 / rho_22;
        let gamma_til = phi * (rho_12 / rho_22 - (1.0 - phi) / phi);
        let rho_s = rho_til + gamma_til * gamma_til * rho_eq;

        let e = self.young * (1.0 + J * self.eta);
        let n = e / (2.0 * (1.0 + self.nu));
        let a_hat = e * self.nu / ((1.0 + self.nu) * (1.0 - 2.0 * self.nu));
        let p_hat = a_hat + 2.0 * n;

        let w2 = omega * omega;
        let delta_eq_2 = w2 * rho_eq / k_eq;
        let delta_s1_2 = w2 * rho_til / p_hat;
        let delta_s2_2 = w2 * rho_s / p_hat;

        let psi = branch_sqrt(
            (delta_s2_2 + delta_eq_2).powi(2) - 4.0 * delta_eq_2 * delta_s1_2,
        );
        let delta_1 = branch_sqrt(0.5 * (delta_s2_2 + delta_eq_2 + psi));
        let delta_2 = branch_sqrt(0.5 * (delta_s2_2 + delta_eq_2 - psi));
        let delta_3 = omega * branch_sqrt(rho_til / n);

        let mu_1 = gamma_til * delta_eq_2 / (delta_1 * delta_1 - delta_eq_2);
        let mu_2 = gamma_til * delta_eq_2 / (delta_2 * delta_2 - delta_eq_2);
        let mu_3 = -gamma_til;

        self.state = Some(BiotState {
            omega,
            rho_eq,
            k_eq,
            rho_til,
            rho_s,
            gamma_til,
            n,
            a_hat,
            p_hat,
            delta_eq_2,
            delta: [delta_1, delta_2, delta_3],
            mu: [mu_1, mu_2, mu_3],
        });
    }

    /// Derived quantities for the last updated frequency.
    pub fn state(&self) -> Result<&BiotState> {
        self.state
            .as_ref()
            .ok_or_else(|| MlsError::numerical(format!("{} used before update", self.name)))
    }

    pub(crate) fn invalidate(&mut self) {
        self.state = None;
    }

    pub fn parameter(&self, key: &str) -> Option<f64> {
        match key {
            "phi" => Some(self.phi),
            "sigma" => Some(self.sigma),
            "alpha" => Some(self.alpha),
            "Lambda_prime" => Some(self.lambda_prime),
            "Lambda" => Some(self.lambda),
            "rho_1" => Some(self.rho_1),
            "nu" => Some(self.nu),
            "E" => Some(self.young),
            "eta" => Some(self.eta),
            _ => None,
        }
    }

    pub fn parameter_mut(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "phi" => Some(&mut self.phi),
            "sigma" => Some(&mut self.sigma),
            "alpha" => Some(&mut self.alpha),
            "Lambda_prime" => Some(&mut self.lambda_prime),
            "Lambda" => Some(&mut self.lambda),
            "rho_1" => Some(&mut self.rho_1),
            "nu" => Some(&mut self.nu),
            "E" => Some(&mut self.young),
            "eta" => Some(&mut self.eta),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn foam() -> PoroElastic {
        PoroElastic::new(0.98, 3750.0, 1.17, 742e-6, 110e-6, 22.1, 0.39, 70e3, 0.265)
    }

    #[test]
    fn test_biot_wavenumbers_satisfy_dispersion_relation() {
        let mut m = foam();
        let omega = 2.0 * PI * 500.0;
        m.update(omega);
        let s = m.state().unwrap();
        // δ₁² and δ₂² are the roots of x² − (δ_s2² + δ_eq²)x + δ_eq²δ_s1² = 0.
        let ds1 = omega * omega * s.rho_til / s.p_hat;
        let ds2 = omega * omega * s.rho_s / s.p_hat;
        for d in &s.delta[..2] {
            let x = d * d;
            let residual = x * x - (ds2 + s.delta_eq_2) * x + s.delta_eq_2 * ds1;
            let scale = (ds2 + s.delta_eq_2).norm().powi(2);
            assert!(residual.norm() / scale < 1e-10, "residual {residual} for δ = {d}");
        }
        assert!((s.delta[2] * s.delta[2] * s.n - omega * omega * s.rho_til).norm()
            / (omega * omega * s.rho_til).norm()
            < 1e-12);
    }

    #[test]
    fn test_shear_ratio_is_minus_gamma() {
        let mut m = foam();
        m.update(2.0 * PI * 100.0);
        let s = m.state().unwrap();
        assert_eq!(s.mu[2], -s.gamma_til);
    }

    #[test]
    fn test_from_parameters_reports_first_missing_field() {
        let params = ParameterSet::new()
            .with("phi", 0.98)
            .with("sigma", 3750.0)
            .with("alpha", 1.17);
        match PoroElastic::from_parameters(&params) {
            Err(MlsError::MissingParameter { parameter }) => assert_eq!(parameter, "Lambda_prime"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
