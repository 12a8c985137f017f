use super::params::{ParameterSet, ParameterSpec};
use crate::constants;
use crate::error::Result;

/// A lossless homogeneous fluid.
#[derive(Debug, Clone, PartialEq)]
pub struct Fluid {
    pub name: String,
    /// Density (kg/m³).
    pub rho: f64,
    /// Speed of sound (m/s).
    pub c: f64,
}

impl Fluid {
    pub const REQUIRED: &'static [ParameterSpec] =
        &[ParameterSpec::real("rho"), ParameterSpec::real("c")];
    pub const OPTIONAL: &'static [ParameterSpec] = &[];

    pub fn new(rho: f64, c: f64) -> Self {
        Self {
            name: "Unnamed Medium".to_string(),
            rho,
            c,
        }
    }

    /// Reference air, also used as the incident half-space.
    pub fn air() -> Self {
        Self {
            name: "Air".to_string(),
            rho: constants::RHO,
            c: constants::speed_of_sound(),
        }
    }

    /// Air at `temperature_c` (°C). Matches [`Fluid::air`] at
    /// [`constants::TEMPERATURE`].
    pub fn air_at(temperature_c: f64) -> Self {
        let (c, rho) = constants::speed_of_sound_and_density(temperature_c);
        Self {
            name: format!("Air ({temperature_c} °C)"),
            rho,
            c,
        }
    }

    pub fn from_parameters(params: &ParameterSet) -> Result<Self> {
        Ok(Self::new(
            params.required(&Self::REQUIRED[0])?,
            params.required(&Self::REQUIRED[1])?,
        ))
    }

    /// Bulk modulus K = ρc².
    pub fn bulk_modulus(&self) -> f64 {
        self.rho * self.c * self.c
    }

    pub fn impedance(&self) -> f64 {
        self.rho * self.c
    }

    pub fn parameter(&self, key: &str) -> Option<f64> {
        match key {
            "rho" => Some(self.rho),
            "c" => Some(self.c),
            _ => None,
        }
    }

    pub fn parameter_mut(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "rho" => Some(&mut self.rho),
            "c" => Some(&mut self.c),
            _ => None,
        }
    }
}
