use super::params::{ParameterSet, ParameterSpec};
use crate::constants;
use crate::error::{MlsError, Result};
use crate::linalg::{branch_sqrt, J};
use num_complex::Complex64;

/// Johnson–Champoux–Allard equivalent density and bulk modulus of the
/// saturating air at angular frequency `omega`.
pub(crate) fn jca_properties(
    phi: f64,
    sigma: f64,
    alpha: f64,
    lambda_prime: f64,
    lambda: f64,
    omega: f64,
) -> (Complex64, Complex64) {
    let rho_0 = constants::RHO;
    let gamma = constants::GAMMA;

    let omega_0 = sigma * phi / (rho_0 * alpha);
    let omega_inf = (sigma * phi * lambda).powi(2) / (4.0 * constants::MU * rho_0 * alpha.powi(2));
    let f_omega = branch_sqrt(1.0 + J * omega / omega_inf);
    let rho_eq = (rho_0 * alpha / phi) * (1.0 + omega_0 / (J * omega) * f_omega);

    let omega_prime_inf = 16.0 * constants::thermal_viscosity() / lambda_prime.powi(2);
    let f_prime = branch_sqrt(1.0 + J * omega / omega_prime_inf);
    let alpha_prime = 1.0 + omega_prime_inf * f_prime / (2.0 * J * omega);
    let k_eq = (gamma * constants::P0 / phi) / (gamma - (gamma - 1.0) / alpha_prime);

    (rho_eq, k_eq)
}

/// Frequency-dependent state of an equivalent fluid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquivalentState {
    pub omega: f64,
    pub rho_eq: Complex64,
    pub k_eq: Complex64,
    pub c_eq: Complex64,
}

/// Rigid-frame porous material described by the JCA model.
#[derive(Debug, Clone, PartialEq)]
pub struct EqFluidJca {
    pub name: String,
    /// Porosity.
    pub phi: f64,
    /// Static air flow resistivity (N·s/m⁴).
    pub sigma: f64,
    /// Tortuosity.
    pub alpha: f64,
    /// Thermal characteristic length (m).
    pub lambda_prime: f64,
    /// Viscous characteristic length (m).
    pub lambda: f64,
    pub rho_1: Option<f64>,
    pub nu: Option<f64>,
    pub young: Option<f64>,
    pub eta: Option<f64>,
    state: Option<EquivalentState>,
}

impl EqFluidJca {
    pub const REQUIRED: &'static [ParameterSpec] = &[
        ParameterSpec::real("phi"),
        ParameterSpec::real("sigma"),
        ParameterSpec::real("alpha"),
        ParameterSpec::real("Lambda_prime"),
        ParameterSpec::real("Lambda"),
    ];
    pub const OPTIONAL: &'static [ParameterSpec] = &[
        ParameterSpec::real("rho_1"),
        ParameterSpec::real("nu"),
        ParameterSpec::real("E"),
        ParameterSpec::real("eta"),
    ];

    pub fn new(phi: f64, sigma: f64, alpha: f64, lambda_prime: f64, lambda: f64) -> Self {
        Self {
            name: "Unnamed Medium".to_string(),
            phi,
            sigma,
            alpha,
            lambda_prime,
            lambda,
            rho_1: None,
            nu: None,
            young: None,
            eta: None,
            state: None,
        }
    }

    pub fn from_parameters(params: &ParameterSet) -> Result<Self> {
        let req = Self::REQUIRED;
        let opt = Self::OPTIONAL;
        let mut medium = Self::new(
            params.required(&req[0])?,
            params.required(&req[1])?,
            params.required(&req[2])?,
            params.required(&req[3])?,
            params.required(&req[4])?,
        );
        medium.rho_1 = params.real(&opt[0])?;
        medium.nu = params.real(&opt[1])?;
        medium.young = params.real(&opt[2])?;
        medium.eta = params.real(&opt[3])?;
        Ok(medium)
    }

    pub fn update(&mut self, omega: f64) {
        if self.state.map(|s| s.omega) == Some(omega) {
            return;
        }
        let (rho_eq, k_eq) = jca_properties(
            self.phi,
            self.sigma,
            self.alpha,
            self.lambda_prime,
            self.lambda,
            omega,
        );
        self.state = Some(EquivalentState {
            omega,
            rho_eq,
            k_eq,
            c_eq: branch_sqrt(k_eq / rho_eq),
        });
    }

    /// Derived quantities for the last updated frequency.
    pub fn state(&self) -> Result<&EquivalentState> {
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
            "rho_1" => self.rho_1,
            "nu" => self.nu,
            "E" => self.young,
            "eta" => self.eta,
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
            "rho_1" => self.rho_1.as_mut(),
            "nu" => self.nu.as_mut(),
            "E" => self.young.as_mut(),
            "eta" => self.eta.as_mut(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn foam() -> EqFluidJca {
        EqFluidJca::new(0.98, 3750.0, 1.17, 742e-6, 110e-6)
    }

    #[test]
    fn test_lossy_quantities_have_negative_imaginary_parts() {
        let mut m = foam();
        m.update(2.0 * PI * 1000.0);
        let s = m.state().unwrap();
        assert!(s.rho_eq.im < 0.0, "rho_eq = {}", s.rho_eq);
        assert!(s.k_eq.im > 0.0, "K_eq = {}", s.k_eq);
        assert!(s.rho_eq.re > constants::RHO * 1.17 / 0.98 * 0.99);
    }

    #[test]
    fn test_high_frequency_limits() {
        // Inertial limit ρ₀α/φ and adiabatic limit γP₀/φ.
        let mut m = foam();
        m.update(2.0 * PI * 1e8);
        let s = m.state().unwrap();
        let rho_inf = constants::RHO * 1.17 / 0.98;
        let k_ad = constants::GAMMA * constants::P0 / 0.98;
        assert!((s.rho_eq.re - rho_inf).abs() / rho_inf < 1e-2);
        assert!((s.k_eq.re - k_ad).abs() / k_ad < 1e-2);
    }

    #[test]
    fn test_update_requires_state_and_is_idempotent() {
        let mut m = foam();
        assert!(m.state().is_err());
        m.update(100.0);
        let first = *m.state().unwrap();
        m.update(100.0);
        assert_eq!(first, *m.state().unwrap());
    }
}
