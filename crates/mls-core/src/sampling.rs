//! Samplers feeding stochastic layers.
//!
//! Every sampler draws from an explicit generator handed in by the solver,
//! so a campaign is reproducible from its seed alone.

use crate::error::{MlsError, Result};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand_distr::Normal;
use std::fmt;

/// Produces one value per call for a stochastic layer parameter.
pub trait Sampler: fmt::Debug + Send {
    fn sample(&mut self, rng: &mut StdRng) -> Result<f64>;

    /// Rewind any internal position. Called at the start of each campaign.
    fn reset(&mut self) {}
}

impl Sampler for Box<dyn Sampler> {
    fn sample(&mut self, rng: &mut StdRng) -> Result<f64> {
        (**self).sample(rng)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Gaussian distribution.
#[derive(Debug, Clone, Copy)]
pub struct NormalSampler {
    dist: Normal<f64>,
}

impl NormalSampler {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) {
            return Err(MlsError::InvalidDistribution(format!(
                "normal({mean}, {std_dev}) needs a finite mean and std >= 0"
            )));
        }
        let dist = Normal::new(mean, std_dev).map_err(|e| {
            MlsError::InvalidDistribution(format!("normal({mean}, {std_dev}): {e}"))
        })?;
        Ok(Self { dist })
    }
}

impl Sampler for NormalSampler {
    fn sample(&mut self, rng: &mut StdRng) -> Result<f64> {
        Ok(self.dist.sample(rng))
    }
}

/// Uniform distribution on `[low, high)`.
#[derive(Debug, Clone, Copy)]
pub struct UniformSampler {
    dist: Uniform<f64>,
}

impl UniformSampler {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(MlsError::InvalidDistribution(format!(
                "uniform({low}, {high}) needs finite bounds with low < high"
            )));
        }
        Ok(Self {
            dist: Uniform::new(low, high),
        })
    }
}

impl Sampler for UniformSampler {
    fn sample(&mut self, rng: &mut StdRng) -> Result<f64> {
        Ok(self.dist.sample(rng))
    }
}

/// Pre-computed normalised draws served as `mean + draw·std` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDraws {
    draws: Vec<f64>,
    mean: f64,
    std_dev: f64,
    next: usize,
}

impl PresetDraws {
    pub fn new(draws: Vec<f64>, mean: f64, std_dev: f64) -> Self {
        Self {
            draws,
            mean,
            std_dev,
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl Sampler for PresetDraws {
    fn sample(&mut self, _rng: &mut StdRng) -> Result<f64> {
        let draw = self
            .draws
            .get(self.next)
            .ok_or(MlsError::DrawsExhausted(self.draws.len()))?;
        self.next += 1;
        Ok(self.mean + draw * self.std_dev)
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Adapter for a closure drawing from the solver's generator.
pub struct FnSampler<F>(pub F);

impl<F> fmt::Debug for FnSampler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSampler")
    }
}

impl<F> Sampler for FnSampler<F>
where
    F: FnMut(&mut StdRng) -> f64 + Send,
{
    fn sample(&mut self, rng: &mut StdRng) -> Result<f64> {
        Ok((self.0)(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = NormalSampler::new(1e-2, 1e-3).unwrap();
        let mut b = a;
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(
                a.sample(&mut rng_a).unwrap().to_bits(),
                b.sample(&mut rng_b).unwrap().to_bits()
            );
        }
    }

    #[test]
    fn test_uniform_bounds() {
        let mut s = UniformSampler::new(2.0, 3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let v = s.sample(&mut rng).unwrap();
            assert!((2.0..3.0).contains(&v), "{v}");
        }
        assert!(UniformSampler::new(3.0, 2.0).is_err());
    }

    #[test]
    fn test_normal_rejects_bad_deviation() {
        assert!(NormalSampler::new(0.0, -1.0).is_err());
        assert!(NormalSampler::new(0.0, f64::NAN).is_err());
        assert!(NormalSampler::new(f64::INFINITY, 1.0).is_err());
        assert!(NormalSampler::new(1.0, 0.0).is_ok());
    }

    #[test]
    fn test_preset_draws_exhaust_and_reset() {
        let mut s = PresetDraws::new(vec![0.0, 1.0, -1.0], 10.0, 2.0);
        let mut rng = StdRng::seed_from_u64(0);
        let drawn: Vec<f64> = (0..3).map(|_| s.sample(&mut rng).unwrap()).collect();
        assert_eq!(drawn, vec![10.0, 12.0, 8.0]);
        assert!(matches!(s.sample(&mut rng), Err(MlsError::DrawsExhausted(3))));
        s.reset();
        assert_eq!(s.sample(&mut rng).unwrap(), 10.0);
    }

    #[test]
    fn test_closure_sampler() {
        let mut s = FnSampler(|rng: &mut StdRng| rng.gen_range(0.0..1.0));
        let mut rng = StdRng::seed_from_u64(3);
        let v = s.sample(&mut rng).unwrap();
        assert!((0.0..1.0).contains(&v));
    }
}
