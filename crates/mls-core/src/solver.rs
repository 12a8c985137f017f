//! Recursive transfer-matrix solver.
//!
//! The state `Ω` is carried from the backing towards the incidence side,
//! one interface and one layer at a time. The reflection coefficient comes
//! out of the final projection onto the incident plane wave. For a
//! transmission backing the amplitude operators `τ` and `Ξ` are chained
//! along the way to recover the transmitted amplitude.

use crate::analysis::{Analysis, AnalysisSpec};
use crate::backing::Backing;
use crate::error::{MlsError, Result};
use crate::interface::{self, generic_interface, rigid_interface};
use crate::layers::{self, Layer};
use crate::linalg::{branch_sqrt, eye, real_sqrt, solve, CMatrix, J};
use crate::media::{Fluid, MediumClass};
use crate::result::{AnalysisResult, Coefficients, StochasticRecord};
use log::{debug, info, trace, warn};
use ndarray::array;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

pub const DEFAULT_DRAWS: usize = 1000;

/// A multilayer with its backing and the analyses to run on it.
#[derive(Debug)]
pub struct Solver {
    /// Layers from the incidence side to the backing.
    pub layers: Vec<Layer>,
    pub backing: Option<Backing>,
    pub analyses: Vec<Analysis>,
    /// Fluid carrying the incident wave, and the transmitted one.
    pub incident: Fluid,
    /// Repetitions per stochastic layer.
    pub n_draws: usize,
    /// Generator seed. Drawn at random, and kept, on the first stochastic
    /// run when unset.
    pub seed: Option<u64>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            backing: None,
            analyses: Vec::new(),
            incident: Fluid::air(),
            n_draws: DEFAULT_DRAWS,
            seed: None,
        }
    }
}

impl Solver {
    pub fn new(layers: Vec<Layer>, backing: Backing) -> Self {
        Self {
            layers,
            backing: Some(backing),
            ..Self::default()
        }
    }

    pub fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    pub fn with_backing(mut self, backing: Backing) -> Self {
        self.backing = Some(backing);
        self
    }

    pub fn with_draws(mut self, n_draws: usize) -> Self {
        self.n_draws = n_draws;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_incident(mut self, fluid: Fluid) -> Self {
        self.incident = fluid;
        self
    }

    pub fn add_analysis(&mut self, analysis: Analysis) -> &mut Self {
        self.analyses.push(analysis);
        self
    }

    pub fn is_stochastic(&self) -> bool {
        self.layers.iter().any(Layer::is_stochastic)
    }

    /// Check that the stack can be solved.
    pub fn check_is_complete(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(MlsError::IncompleteDefinition("no layer defined".into()));
        }
        if self.backing.is_none() {
            return Err(MlsError::IncompleteDefinition("no backing defined".into()));
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if !(layer.thickness.is_finite() && layer.thickness >= 0.0) {
                return Err(MlsError::InvalidLayer {
                    index,
                    reason: format!("thickness {} m", layer.thickness),
                });
            }
        }
        Ok(())
    }

    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or_else(|| {
            MlsError::IncompleteDefinition(format!(
                "layer {index} requested from a stack of {}",
                self.layers.len()
            ))
        })
    }

    /// Reflection (and transmission) coefficients at one frequency (Hz)
    /// and incidence angle (degrees).
    pub fn solve_point(&mut self, frequency: f64, angle: f64) -> Result<Coefficients> {
        self.check_is_complete()?;
        self.recurse(frequency, angle)
    }

    /// Run `analysis`. A stochastic analysis yields one result per
    /// stochastic layer.
    pub fn run(&mut self, analysis: &Analysis) -> Result<Vec<AnalysisResult>> {
        self.check_is_complete()?;
        if analysis.stochastic {
            self.run_stochastic(analysis)
        } else {
            self.run_deterministic(analysis).map(|r| vec![r])
        }
    }

    /// Solve an ad-hoc grid, named `auto`. It is stochastic when any layer
    /// is.
    pub fn solve(
        &mut self,
        frequencies: impl Into<AnalysisSpec>,
        angles: impl Into<AnalysisSpec>,
    ) -> Result<Vec<AnalysisResult>> {
        let analysis = Analysis::new("auto", frequencies, angles, self.is_stochastic())?;
        self.run(&analysis)
    }

    /// Run every registered analysis, in order.
    pub fn solve_all(&mut self) -> Result<Vec<AnalysisResult>> {
        let analyses = self.analyses.clone();
        let mut results = Vec::new();
        for analysis in &analyses {
            results.extend(self.run(analysis)?);
        }
        Ok(results)
    }

    fn run_deterministic(&mut self, analysis: &Analysis) -> Result<AnalysisResult> {
        debug!(
            "analysis {}: {} frequencies x {} angles",
            analysis.name,
            analysis.frequencies.len(),
            analysis.angles.len()
        );
        let mut result = self.empty_result(analysis, 1);
        self.sweep(analysis, &mut result, 0)?;
        Ok(result)
    }

    fn run_stochastic(&mut self, analysis: &Analysis) -> Result<Vec<AnalysisResult>> {
        let stochastic: Vec<usize> = self
            .layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_stochastic())
            .map(|(i, _)| i)
            .collect();
        if stochastic.is_empty() {
            return Err(MlsError::IncompleteDefinition(format!(
                "stochastic analysis {} on a stack without stochastic layer",
                analysis.name
            )));
        }
        let seed = match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                warn!("no seed given for stochastic analysis, using {seed}");
                self.seed = Some(seed);
                seed
            }
        };
        let initial = StdRng::seed_from_u64(seed);

        let mut results = Vec::with_capacity(stochastic.len());
        for &index in &stochastic {
            self.reinit_layers()?;
            let campaign = self.campaign(analysis, index, initial.clone(), seed);
            match campaign {
                Ok(result) => results.push(result),
                Err(err) => {
                    self.reinit_layers()?;
                    return Err(err);
                }
            }
        }
        self.reinit_layers()?;
        Ok(results)
    }

    /// Redraw layer `index` `n_draws` times, sweeping the grid after each
    /// draw.
    fn campaign(
        &mut self,
        analysis: &Analysis,
        index: usize,
        mut rng: StdRng,
        seed: u64,
    ) -> Result<AnalysisResult> {
        info!(
            "analysis {}: {} draws on layer {index} ({})",
            analysis.name, self.n_draws, self.layers[index].name
        );
        let mut result = self.empty_result(analysis, self.n_draws);
        let mut values = Vec::with_capacity(self.n_draws);
        for draw in 0..self.n_draws {
            values.push(self.layers[index].new_draw(&mut rng)?);
            self.sweep(analysis, &mut result, draw)?;
        }
        let parameter = self.layers[index]
            .stochastic_target()
            .map(|t| t.name().to_string())
            .unwrap_or_default();
        result.stochastics = Some(StochasticRecord {
            layer: index,
            parameter,
            values,
            seed,
        });
        Ok(result)
    }

    fn reinit_layers(&mut self) -> Result<()> {
        self.layers.iter_mut().try_for_each(Layer::reinit)
    }

    fn empty_result(&self, analysis: &Analysis, n_draws: usize) -> AnalysisResult {
        let transmits = self.backing.is_some_and(Backing::transmits);
        AnalysisResult::empty(
            &analysis.name,
            &analysis.frequencies,
            &analysis.angles,
            n_draws,
            transmits,
        )
    }

    fn sweep(&mut self, analysis: &Analysis, result: &mut AnalysisResult, draw: usize) -> Result<()> {
        for (i_f, &f) in analysis.frequencies.iter().enumerate() {
            for (i_a, &angle) in analysis.angles.iter().enumerate() {
                let c = self.recurse(f, angle)?;
                result.store(i_f, i_a, draw, c);
            }
        }
        Ok(())
    }

    fn recurse(&mut self, frequency: f64, angle: f64) -> Result<Coefficients> {
        let backing = self
            .backing
            .ok_or_else(|| MlsError::IncompleteDefinition("no backing defined".into()))?;
        let omega = 2.0 * PI * frequency;
        for layer in &mut self.layers {
            layer.update_frequency(omega);
        }
        let k_x = omega / self.incident.c * (angle * PI / 180.0).sin();
        trace!("f = {frequency} Hz, θ = {angle}°, k_x = {k_x}");

        let transmits = backing.transmits();
        let mut state = backing.initial_state(omega, k_x, &self.incident);
        let mut back_prop = eye(1);

        let n = self.layers.len();
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let class = layer.medium.class();
            let iface = if i == n - 1 {
                match backing {
                    Backing::BondedRigid => rigid_interface(class),
                    _ => generic_interface(class, MediumClass::Fluid),
                }
            } else {
                generic_interface(class, self.layers[i + 1].medium.class())
            };
            let crossed = interface::apply(iface, &state).map_err(|e| locate(e, i, layer))?;
            let prop = layers::transfer(&crossed.state, omega, k_x, &layer.medium, layer.thickness)
                .map_err(|e| locate(e, i, layer))?;
            if transmits {
                back_prop = back_prop.dot(&crossed.tau).dot(&prop.xi);
            }
            state = prop.state;
        }

        let first = interface::apply(
            generic_interface(MediumClass::Fluid, self.layers[0].medium.class()),
            &state,
        )?;
        if transmits {
            back_prop = back_prop.dot(&first.tau);
        }
        self.project(&first.state, &back_prop, omega, k_x, transmits)
    }

    /// Match the fluid state at the front face against incident and
    /// reflected plane waves.
    fn project(
        &self,
        state: &CMatrix,
        back_prop: &CMatrix,
        omega: f64,
        k_x: f64,
        transmits: bool,
    ) -> Result<Coefficients> {
        if state.dim() != (2, 1) {
            return Err(MlsError::numerical(format!(
                "incident interface: expected a 2x1 fluid state, got {:?}",
                state.dim()
            )));
        }
        let fluid = &self.incident;
        let k_0 = omega * real_sqrt(fluid.rho / fluid.bulk_modulus());
        let k_z = branch_sqrt(k_0 * k_0 - k_x * k_x);
        let u_z = J * k_z / (fluid.rho * omega * omega);
        let one = Complex64::new(1.0, 0.0);

        let system = array![[state[[0, 0]], -u_z], [state[[1, 0]], -one]];
        let rhs = array![[-u_z], [one]];
        let x = solve(&system, &rhs, "incident interface")?;

        let reflection = x[[1, 0]];
        let transmission = transmits.then(|| back_prop[[0, 0]] * x[[0, 0]]);
        let finite = reflection.is_finite() && transmission.map_or(true, |t| t.is_finite());
        if !finite {
            return Err(MlsError::numerical("incident interface: non-finite coefficients"));
        }
        Ok(Coefficients {
            reflection,
            transmission,
        })
    }
}

fn locate(err: MlsError, index: usize, layer: &Layer) -> MlsError {
    match err {
        MlsError::Numerical { context } => MlsError::Numerical {
            context: format!("layer {index} ({}): {context}", layer.name),
        },
        other => other,
    }
}
