use crate::indicators;
use ndarray::{s, Array3, ArrayView1};
use num_complex::Complex64;
use serde::Serialize;

/// Draws applied to one stochastic layer during a campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StochasticRecord {
    /// Index of the layer in the stack.
    pub layer: usize,
    pub parameter: String,
    /// One value per draw, in draw order.
    pub values: Vec<f64>,
    /// Seed of the generator the campaign started from.
    pub seed: u64,
}

/// Coefficients of a single (frequency, angle) solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    pub reflection: Complex64,
    /// Only present for a transmission backing.
    pub transmission: Option<Complex64>,
}

/// Output of one analysis, or of one stochastic layer campaign.
///
/// Coefficient arrays are indexed `[frequency, angle, draw]`; a
/// deterministic analysis has a single draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub name: String,
    pub frequencies: Vec<f64>,
    pub angles: Vec<f64>,
    pub reflection: Array3<Complex64>,
    pub transmission: Option<Array3<Complex64>>,
    pub stochastics: Option<StochasticRecord>,
}

impl AnalysisResult {
    pub(crate) fn empty(
        name: &str,
        frequencies: &[f64],
        angles: &[f64],
        n_draws: usize,
        transmits: bool,
    ) -> Self {
        let shape = (frequencies.len(), angles.len(), n_draws);
        Self {
            name: name.to_string(),
            frequencies: frequencies.to_vec(),
            angles: angles.to_vec(),
            reflection: Array3::zeros(shape),
            transmission: transmits.then(|| Array3::zeros(shape)),
            stochastics: None,
        }
    }

    pub(crate) fn store(&mut self, i_f: usize, i_a: usize, draw: usize, c: Coefficients) {
        self.reflection[[i_f, i_a, draw]] = c.reflection;
        if let (Some(t), Some(value)) = (self.transmission.as_mut(), c.transmission) {
            t[[i_f, i_a, draw]] = value;
        }
    }

    pub fn n_draws(&self) -> usize {
        self.reflection.dim().2
    }

    pub fn is_stochastic(&self) -> bool {
        self.stochastics.is_some()
    }

    /// Coefficients of one point and draw.
    pub fn at(&self, i_f: usize, i_a: usize, draw: usize) -> Coefficients {
        Coefficients {
            reflection: self.reflection[[i_f, i_a, draw]],
            transmission: self.transmission.as_ref().map(|t| t[[i_f, i_a, draw]]),
        }
    }

    /// Reflection coefficients of all draws at one point.
    pub fn reflection_draws(&self, i_f: usize, i_a: usize) -> ArrayView1<'_, Complex64> {
        self.reflection.slice(s![i_f, i_a, ..])
    }

    pub fn absorption(&self) -> Array3<f64> {
        self.reflection.mapv(indicators::absorption)
    }

    pub fn transmission_loss(&self) -> Option<Array3<f64>> {
        self.transmission
            .as_ref()
            .map(|t| t.mapv(indicators::transmission_loss))
    }

    /// Absorption averaged over the draws at one point.
    pub fn mean_absorption(&self, i_f: usize, i_a: usize) -> f64 {
        let draws = self.reflection_draws(i_f, i_a);
        draws.iter().map(|&r| indicators::absorption(r)).sum::<f64>() / draws.len() as f64
    }

    /// Transmission loss averaged over the draws at one point.
    pub fn mean_transmission_loss(&self, i_f: usize, i_a: usize) -> Option<f64> {
        let t = self.transmission.as_ref()?;
        let draws = t.slice(s![i_f, i_a, ..]);
        let total: f64 = draws.iter().map(|&t| indicators::transmission_loss(t)).sum();
        Some(total / draws.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_read_back() {
        let mut r = AnalysisResult::empty("grid", &[100.0, 200.0], &[0.0], 3, true);
        let c = Coefficients {
            reflection: Complex64::new(0.5, 0.0),
            transmission: Some(Complex64::new(0.0, 0.5)),
        };
        r.store(1, 0, 2, c);
        assert_eq!(r.at(1, 0, 2), c);
        assert_eq!(r.n_draws(), 3);
        assert_eq!(r.reflection_draws(1, 0).len(), 3);
        assert!((r.absorption()[[1, 0, 2]] - 0.75).abs() < 1e-12);
        assert!(r.transmission_loss().is_some());
        assert!((r.mean_absorption(1, 0) - 0.75 / 3.0 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rigid_result_has_no_transmission() {
        let r = AnalysisResult::empty("grid", &[100.0], &[0.0, 45.0], 1, false);
        assert!(r.transmission.is_none());
        assert_eq!(r.at(0, 1, 0).transmission, None);
        assert!(!r.is_stochastic());
    }
}
