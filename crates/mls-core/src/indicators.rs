//! Scalar indicators derived from the complex coefficients.

use num_complex::Complex64;

/// Absorption coefficient `1 - |R|²`.
pub fn absorption(reflection: Complex64) -> f64 {
    1.0 - reflection.norm_sqr()
}

/// Transmission loss in dB, `-20·log₁₀|T|`.
pub fn transmission_loss(transmission: Complex64) -> f64 {
    -20.0 * transmission.norm().log10()
}

/// Energy not accounted for by reflection and transmission.
pub fn dissipation(reflection: Complex64, transmission: Complex64) -> f64 {
    1.0 - reflection.norm_sqr() - transmission.norm_sqr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_indicators() {
        assert_relative_eq!(absorption(Complex64::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(absorption(Complex64::new(0.0, 0.5)), 0.75);
        assert_relative_eq!(transmission_loss(Complex64::new(0.1, 0.0)), 20.0, epsilon = 1e-12);
        assert_relative_eq!(transmission_loss(Complex64::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(
            dissipation(Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)),
            0.0,
            epsilon = 1e-12
        );
    }
}
