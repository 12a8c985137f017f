//! Reference air properties shared by every porous model and by the
//! incident half-space.

/// Static pressure (Pa).
pub const P0: f64 = 1.01325e5;
/// Ratio of specific heats.
pub const GAMMA: f64 = 1.4;
/// Dynamic viscosity (Pa·s).
pub const MU: f64 = 0.1839e-4;
/// Prandtl number.
pub const PRANDTL: f64 = 0.710;
/// Temperature (°C) at which the reference properties hold.
pub const TEMPERATURE: f64 = 20.0;
/// Density (kg/m³).
pub const RHO: f64 = 1.213;

/// Adiabatic bulk modulus K = γ·P₀.
pub fn bulk_modulus() -> f64 {
    GAMMA * P0
}

/// Speed of sound c = √(K/ρ).
pub fn speed_of_sound() -> f64 {
    (bulk_modulus() / RHO).sqrt()
}

/// Kinematic viscosity ν = μ/ρ.
pub fn kinematic_viscosity() -> f64 {
    MU / RHO
}

/// Thermal counterpart of the kinematic viscosity, ν' = ν/Pr.
pub fn thermal_viscosity() -> f64 {
    kinematic_viscosity() / PRANDTL
}

/// Speed of sound (m/s) and density (kg/m³) of air at `temperature_c`.
///
/// Ideal gas at constant pressure, scaled from the reference state so the
/// bulk modulus stays γ·P₀ and `TEMPERATURE` gives back `RHO` exactly.
pub fn speed_of_sound_and_density(temperature_c: f64) -> (f64, f64) {
    let ratio = (temperature_c + 273.15) / (TEMPERATURE + 273.15);
    (speed_of_sound() * ratio.sqrt(), RHO / ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_air() {
        let c = speed_of_sound();
        assert!((c - 342.0).abs() < 0.5, "c = {c}");
        assert!((thermal_viscosity() - MU / RHO / 0.71).abs() < 1e-18);
    }

    #[test]
    fn test_reference_temperature_is_reference_air() {
        let (c, rho) = speed_of_sound_and_density(TEMPERATURE);
        assert_eq!(c, speed_of_sound());
        assert_eq!(rho, RHO);
    }

    #[test]
    fn test_warm_air_keeps_bulk_modulus() {
        let (c, rho) = speed_of_sound_and_density(40.0);
        assert!(c > speed_of_sound() && rho < RHO);
        assert!((rho * c * c - bulk_modulus()).abs() / bulk_modulus() < 1e-12);
    }
}
