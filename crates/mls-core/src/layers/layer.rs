use crate::error::{MlsError, Result};
use crate::media::Medium;
use crate::sampling::Sampler;
use rand::rngs::StdRng;
use std::fmt;

/// What a stochastic layer redraws before each repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StochasticTarget {
    Thickness,
    /// A declared parameter of the layer's medium.
    Medium(String),
}

impl StochasticTarget {
    pub fn name(&self) -> &str {
        match self {
            StochasticTarget::Thickness => "thickness",
            StochasticTarget::Medium(name) => name,
        }
    }
}

#[derive(Debug)]
struct Stochastic {
    target: StochasticTarget,
    initial: f64,
    sampler: Box<dyn Sampler>,
}

/// One homogeneous slab of the multilayer.
///
/// The layer owns a private copy of its medium so stochastic draws never
/// alter a shared material definition.
#[derive(Debug)]
pub struct Layer {
    pub medium: Medium,
    /// Thickness in metres.
    pub thickness: f64,
    pub name: String,
    stochastic: Option<Stochastic>,
}

impl Layer {
    pub fn new(medium: Medium, thickness: f64) -> Self {
        Self {
            medium,
            thickness,
            name: "Unnamed Layer".to_string(),
            stochastic: None,
        }
    }

    /// A layer whose `parameter` is redrawn from `sampler` before each
    /// repetition of a stochastic analysis.
    ///
    /// `parameter` is either `"thickness"` or a declared parameter of the
    /// medium holding a value.
    pub fn stochastic(
        medium: Medium,
        thickness: f64,
        parameter: &str,
        sampler: impl Sampler + 'static,
    ) -> Result<Self> {
        let (target, initial) = if parameter == "thickness" {
            (StochasticTarget::Thickness, thickness)
        } else {
            let value = medium
                .parameter(parameter)
                .ok_or_else(|| MlsError::UnknownStochasticParameter(parameter.to_string()))?;
            (StochasticTarget::Medium(parameter.to_string()), value)
        };
        Ok(Self {
            stochastic: Some(Stochastic {
                target,
                initial,
                sampler: Box::new(sampler),
            }),
            ..Self::new(medium, thickness)
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn is_stochastic(&self) -> bool {
        self.stochastic.is_some()
    }

    pub fn stochastic_target(&self) -> Option<&StochasticTarget> {
        self.stochastic.as_ref().map(|s| &s.target)
    }

    /// Refresh the medium for angular frequency `omega`.
    pub fn update_frequency(&mut self, omega: f64) {
        self.medium.update(omega);
    }

    /// Draw and apply a new value of the stochastic parameter.
    ///
    /// Non-finite draws, and thickness draws that are not positive, fail
    /// with [`MlsError::InvalidDraw`] and leave the layer untouched.
    pub fn new_draw(&mut self, rng: &mut StdRng) -> Result<f64> {
        let Some(stochastic) = self.stochastic.as_mut() else {
            return Err(MlsError::UnknownStochasticParameter(format!(
                "{} is not stochastic",
                self.name
            )));
        };
        let draw = stochastic.sampler.sample(rng)?;
        let thickness = stochastic.target == StochasticTarget::Thickness;
        if !draw.is_finite() || (thickness && draw <= 0.0) {
            return Err(MlsError::InvalidDraw {
                parameter: stochastic.target.name().to_string(),
                value: draw,
            });
        }
        match &stochastic.target {
            StochasticTarget::Thickness => self.thickness = draw,
            StochasticTarget::Medium(name) => self.medium.set_parameter(name, draw)?,
        }
        Ok(draw)
    }

    /// Restore the original parameter value and rewind the sampler.
    pub fn reinit(&mut self) -> Result<()> {
        if let Some(stochastic) = self.stochastic.as_mut() {
            stochastic.sampler.reset();
            match &stochastic.target {
                StochasticTarget::Thickness => self.thickness = stochastic.initial,
                StochasticTarget::Medium(name) => {
                    self.medium.set_parameter(name, stochastic.initial)?
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}m of {} ({})",
            self.name,
            self.thickness,
            self.medium.name(),
            self.medium.medium_type()
        )
    }
}
