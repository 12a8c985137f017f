//! Boundary conditions terminating the stack opposite the excitation.

use crate::error::{MlsError, Result};
use crate::linalg::{branch_sqrt, CMatrix, J};
use crate::media::Fluid;
use ndarray::array;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the last layer is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backing {
    /// Rigid wall behind a thin film of the incident fluid.
    Rigid,
    /// Semi-infinite half-space of the incident fluid.
    Transmission,
    /// Last layer bonded directly onto a rigid wall.
    BondedRigid,
}

impl Backing {
    /// State vector starting the recursion.
    pub fn initial_state(self, omega: f64, k_x: f64, fluid: &Fluid) -> CMatrix {
        match self {
            Backing::Rigid | Backing::BondedRigid => rigid(),
            Backing::Transmission => transmission(omega, k_x, fluid),
        }
    }

    /// Whether the backing yields a transmission coefficient.
    pub fn transmits(self) -> bool {
        matches!(self, Backing::Transmission)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backing::Rigid => "rigid",
            Backing::Transmission => "transmission",
            Backing::BondedRigid => "bonded_rigid",
        }
    }
}

impl FromStr for Backing {
    type Err = MlsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rigid" => Ok(Backing::Rigid),
            "transmission" => Ok(Backing::Transmission),
            "bonded_rigid" => Ok(Backing::BondedRigid),
            other => Err(MlsError::IncompleteDefinition(format!(
                "unknown backing type {other}"
            ))),
        }
    }
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero normal velocity.
pub fn rigid() -> CMatrix {
    array![[Complex64::new(0.0, 0.0)], [Complex64::new(1.0, 0.0)]]
}

/// Outgoing plane wave in the half-space `fluid`.
pub fn transmission(omega: f64, k_x: f64, fluid: &Fluid) -> CMatrix {
    let k = omega / fluid.c;
    let k_z = branch_sqrt(Complex64::from(k * k - k_x * k_x));
    array![
        [-J * k_z / (fluid.rho * omega * omega)],
        [Complex64::new(1.0, 0.0)]
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_transmission_is_radiation_admittance() {
        // u_z/p = -j k_z/(ρω²): a forward wave with impedance ρc/cos θ.
        let air = Fluid::air();
        let omega = 2.0 * PI * 1000.0;
        let theta = 30f64.to_radians();
        let k_x = omega / air.c * theta.sin();
        let state = transmission(omega, k_x, &air);
        let v_over_p = J * omega * state[[0, 0]] / state[[1, 0]];
        let expected = theta.cos() / air.impedance();
        assert!((v_over_p - expected).norm() / expected < 1e-12, "{v_over_p}");
    }

    #[test]
    fn test_parse_backing() {
        assert_eq!("bonded_rigid".parse::<Backing>().unwrap(), Backing::BondedRigid);
        assert!("anechoic".parse::<Backing>().unwrap_err().is_definition_error());
        assert!(!Backing::Rigid.transmits());
    }
}
