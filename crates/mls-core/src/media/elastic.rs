use super::params::{ParameterSet, ParameterSpec};
use crate::error::Result;
use crate::linalg::J;
use num_complex::Complex64;

/// Isotropic elastic solid with structural damping.
#[derive(Debug, Clone, PartialEq)]
pub struct Elastic {
    pub name: String,
    /// Young's modulus (Pa).
    pub young: f64,
    /// Poisson's ratio.
    pub nu: f64,
    /// Density (kg/m³).
    pub rho: f64,
    /// Loss factor.
    pub eta: f64,
}

impl Elastic {
    pub const REQUIRED: &'static [ParameterSpec] = &[
        ParameterSpec::real("E"),
        ParameterSpec::real("nu"),
        ParameterSpec::real("rho"),
    ];
    pub const OPTIONAL: &'static [ParameterSpec] = &[ParameterSpec::real("eta")];

    pub fn new(young: f64, nu: f64, rho: f64, eta: f64) -> Self {
        Self {
            name: "Unnamed Medium".to_string(),
            young,
            nu,
            rho,
            eta,
        }
    }

    pub fn from_parameters(params: &ParameterSet) -> Result<Self> {
        let req = Self::REQUIRED;
        Ok(Self::new(
            params.required(&req[0])?,
            params.required(&req[1])?,
            params.required(&req[2])?,
            params.real(&Self::OPTIONAL[0])?.unwrap_or(0.0),
        ))
    }

    /// Complex Lamé coefficients (λ, μ) built from E(1 + jη).
    pub fn lame(&self) -> (Complex64, Complex64) {
        let e = self.young * (1.0 + J * self.eta);
        let lambda = e * self.nu / ((1.0 + self.nu) * (1.0 - 2.0 * self.nu));
        let mu = e / (2.0 * (1.0 + self.nu));
        (lambda, mu)
    }

    pub fn parameter(&self, key: &str) -> Option<f64> {
        match key {
            "E" => Some(self.young),
            "nu" => Some(self.nu),
            "rho" => Some(self.rho),
            "eta" => Some(self.eta),
            _ => None,
        }
    }

    pub fn parameter_mut(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "E" => Some(&mut self.young),
            "nu" => Some(&mut self.nu),
            "rho" => Some(&mut self.rho),
            "eta" => Some(&mut self.eta),
            _ => None,
        }
    }
}
