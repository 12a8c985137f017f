//! Homogeneous media and their frequency-dependent derived quantities.

pub mod elastic;
pub mod eqf;
pub mod fluid;
pub mod params;
pub mod pem;

pub use elastic::Elastic;
pub use eqf::{EqFluidJca, EquivalentState};
pub use fluid::Fluid;
pub use params::{ParameterKind, ParameterSet, ParameterSpec, ParameterValue};
pub use pem::{BiotState, PoroElastic};

use crate::error::{MlsError, Result};
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

/// Physical domain a medium belongs to. Interfaces are looked up on the
/// class of the two adjacent media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediumClass {
    Fluid,
    Elastic,
    PoroElastic,
}

impl MediumClass {
    /// Number of rows of a state vector expressed in this domain.
    pub fn state_size(self) -> usize {
        match self {
            MediumClass::Fluid => 2,
            MediumClass::Elastic => 4,
            MediumClass::PoroElastic => 6,
        }
    }
}

/// Discriminator used in material files (`medium_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediumType {
    Fluid,
    Eqf,
    Elastic,
    Pem,
    Screen,
}

impl MediumType {
    pub const ALL: [MediumType; 5] = [
        MediumType::Fluid,
        MediumType::Eqf,
        MediumType::Elastic,
        MediumType::Pem,
        MediumType::Screen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediumType::Fluid => "fluid",
            MediumType::Eqf => "eqf",
            MediumType::Elastic => "elastic",
            MediumType::Pem => "pem",
            MediumType::Screen => "screen",
        }
    }

    pub fn required_parameters(self) -> &'static [ParameterSpec] {
        match self {
            MediumType::Fluid => Fluid::REQUIRED,
            MediumType::Eqf => EqFluidJca::REQUIRED,
            MediumType::Elastic => Elastic::REQUIRED,
            MediumType::Pem | MediumType::Screen => PoroElastic::REQUIRED,
        }
    }

    pub fn optional_parameters(self) -> &'static [ParameterSpec] {
        match self {
            MediumType::Fluid => Fluid::OPTIONAL,
            MediumType::Eqf => EqFluidJca::OPTIONAL,
            MediumType::Elastic => Elastic::OPTIONAL,
            MediumType::Pem | MediumType::Screen => PoroElastic::OPTIONAL,
        }
    }

    /// Whether `name` is one of the declared parameters of this type.
    pub fn declares(self, name: &str) -> bool {
        self.required_parameters()
            .iter()
            .chain(self.optional_parameters())
            .any(|spec| spec.name == name)
    }
}

impl FromStr for MediumType {
    type Err = MlsError;

    fn from_str(s: &str) -> Result<Self> {
        MediumType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MlsError::UnknownMediumType(s.to_string()))
    }
}

impl fmt::Display for MediumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A homogeneous medium.
#[derive(Debug, Clone, PartialEq)]
pub enum Medium {
    Fluid(Fluid),
    EquivalentFluid(EqFluidJca),
    Elastic(Elastic),
    PoroElastic(PoroElastic),
    /// Thin resistive screen, modelled with the Biot parameter set.
    Screen(PoroElastic),
}

impl Medium {
    pub fn air() -> Self {
        Medium::Fluid(Fluid::air())
    }

    pub fn air_at(temperature_c: f64) -> Self {
        Medium::Fluid(Fluid::air_at(temperature_c))
    }

    /// Build a medium from a flat parameter set. Missing required
    /// parameters fail with [`MlsError::MissingParameter`].
    pub fn from_parameters(medium_type: MediumType, params: &ParameterSet) -> Result<Self> {
        let mut medium = match medium_type {
            MediumType::Fluid => Medium::Fluid(Fluid::from_parameters(params)?),
            MediumType::Eqf => Medium::EquivalentFluid(EqFluidJca::from_parameters(params)?),
            MediumType::Elastic => Medium::Elastic(Elastic::from_parameters(params)?),
            MediumType::Pem => Medium::PoroElastic(PoroElastic::from_parameters(params)?),
            MediumType::Screen => Medium::Screen(PoroElastic::from_parameters(params)?),
        };
        medium.set_name(params.text("name").unwrap_or("Unnamed Medium"));
        Ok(medium)
    }

    pub fn medium_type(&self) -> MediumType {
        match self {
            Medium::Fluid(_) => MediumType::Fluid,
            Medium::EquivalentFluid(_) => MediumType::Eqf,
            Medium::Elastic(_) => MediumType::Elastic,
            Medium::PoroElastic(_) => MediumType::Pem,
            Medium::Screen(_) => MediumType::Screen,
        }
    }

    pub fn class(&self) -> MediumClass {
        match self {
            Medium::Fluid(_) | Medium::EquivalentFluid(_) => MediumClass::Fluid,
            Medium::Elastic(_) => MediumClass::Elastic,
            Medium::PoroElastic(_) | Medium::Screen(_) => MediumClass::PoroElastic,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Medium::Fluid(m) => &m.name,
            Medium::EquivalentFluid(m) => &m.name,
            Medium::Elastic(m) => &m.name,
            Medium::PoroElastic(m) | Medium::Screen(m) => &m.name,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        let slot = match self {
            Medium::Fluid(m) => &mut m.name,
            Medium::EquivalentFluid(m) => &mut m.name,
            Medium::Elastic(m) => &mut m.name,
            Medium::PoroElastic(m) | Medium::Screen(m) => &mut m.name,
        };
        *slot = name.to_string();
    }

    /// Recompute the frequency-dependent quantities for `omega`.
    ///
    /// Calling it twice with the same `omega` is a no-op.
    pub fn update(&mut self, omega: f64) {
        match self {
            Medium::Fluid(_) | Medium::Elastic(_) => {}
            Medium::EquivalentFluid(m) => m.update(omega),
            Medium::PoroElastic(m) | Medium::Screen(m) => m.update(omega),
        }
    }

    /// Effective (density, speed of sound) of a fluid-class medium.
    pub fn fluid_properties(&self) -> Result<Option<(Complex64, Complex64)>> {
        match self {
            Medium::Fluid(m) => Ok(Some((Complex64::from(m.rho), Complex64::from(m.c)))),
            Medium::EquivalentFluid(m) => {
                let s = m.state()?;
                Ok(Some((s.rho_eq, s.c_eq)))
            }
            _ => Ok(None),
        }
    }

    pub fn required_parameters(&self) -> &'static [ParameterSpec] {
        self.medium_type().required_parameters()
    }

    pub fn optional_parameters(&self) -> &'static [ParameterSpec] {
        self.medium_type().optional_parameters()
    }

    /// Current value of a declared parameter, `None` when undeclared or unset.
    pub fn parameter(&self, key: &str) -> Option<f64> {
        match self {
            Medium::Fluid(m) => m.parameter(key),
            Medium::EquivalentFluid(m) => m.parameter(key),
            Medium::Elastic(m) => m.parameter(key),
            Medium::PoroElastic(m) | Medium::Screen(m) => m.parameter(key),
        }
    }

    /// Overwrite a declared parameter and drop the cached derived state so
    /// the next [`Medium::update`] recomputes it.
    pub fn set_parameter(&mut self, key: &str, value: f64) -> Result<()> {
        let medium_type = self.medium_type().as_str();
        let slot = match self {
            Medium::Fluid(m) => m.parameter_mut(key),
            Medium::EquivalentFluid(m) => m.parameter_mut(key),
            Medium::Elastic(m) => m.parameter_mut(key),
            Medium::PoroElastic(m) | Medium::Screen(m) => m.parameter_mut(key),
        };
        match slot {
            Some(slot) => *slot = value,
            None => {
                return Err(MlsError::UnknownParameter {
                    parameter: key.to_string(),
                    medium_type,
                })
            }
        }
        match self {
            Medium::EquivalentFluid(m) => m.invalidate(),
            Medium::PoroElastic(m) | Medium::Screen(m) => m.invalidate(),
            Medium::Fluid(_) | Medium::Elastic(_) => {}
        }
        Ok(())
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (type: {})", self.name(), self.medium_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foam_parameters() -> ParameterSet {
        ParameterSet::new()
            .with("phi", 0.98)
            .with("sigma", 3750.0)
            .with("alpha", 1.17)
            .with("Lambda_prime", 742e-6)
            .with("Lambda", 110e-6)
            .with("rho_1", 22.1)
            .with("nu", 0.39)
            .with("E", 70e3)
            .with("eta", 0.265)
    }

    #[test]
    fn test_medium_type_round_trip() {
        for t in MediumType::ALL {
            assert_eq!(t.as_str().parse::<MediumType>().unwrap(), t);
        }
        assert!(matches!(
            "granite".parse::<MediumType>(),
            Err(MlsError::UnknownMediumType(_))
        ));
    }

    #[test]
    fn test_classes() {
        let params = foam_parameters();
        let screen = Medium::from_parameters(MediumType::Screen, &params).unwrap();
        let eqf = Medium::from_parameters(MediumType::Eqf, &params).unwrap();
        assert_eq!(screen.class(), MediumClass::PoroElastic);
        assert_eq!(eqf.class(), MediumClass::Fluid);
        assert_eq!(Medium::air().class(), MediumClass::Fluid);
        assert_eq!(MediumClass::Elastic.state_size(), 4);
    }

    #[test]
    fn test_set_parameter_invalidates_state() {
        let mut pem = Medium::from_parameters(MediumType::Pem, &foam_parameters()).unwrap();
        pem.update(1000.0);
        let before = match &pem {
            Medium::PoroElastic(m) => *m.state().unwrap(),
            _ => unreachable!(),
        };
        pem.set_parameter("sigma", 10_000.0).unwrap();
        match &pem {
            Medium::PoroElastic(m) => assert!(m.state().is_err()),
            _ => unreachable!(),
        }
        pem.update(1000.0);
        let after = match &pem {
            Medium::PoroElastic(m) => *m.state().unwrap(),
            _ => unreachable!(),
        };
        assert_ne!(before.rho_eq, after.rho_eq);
        assert_eq!(pem.parameter("sigma"), Some(10_000.0));
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let mut air = Medium::air();
        assert!(matches!(
            air.set_parameter("sigma", 1.0),
            Err(MlsError::UnknownParameter { .. })
        ));
        assert!(MediumType::Eqf.declares("rho_1"));
        assert!(!MediumType::Fluid.declares("thickness"));
    }

    #[test]
    fn test_name_from_parameters() {
        let mut params = foam_parameters();
        params.insert("name", ParameterValue::Text("melamine".into()));
        let m = Medium::from_parameters(MediumType::Pem, &params).unwrap();
        assert_eq!(m.name(), "melamine");
        assert_eq!(m.to_string(), "melamine (type: pem)");
    }
}
