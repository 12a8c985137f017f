//! Stack definitions: materials, layers, backing and analyses in one TOML
//! document.
//!
//! ```toml
//! backing = "rigid"
//!
//! [materials.foam]
//! source = "materials/foam.toml"
//!
//! [[layers]]
//! medium = "foam"
//! thickness = 0.02
//!
//! [layers.stochastic]
//! parameter = "thickness"
//! distribution = "normal"
//! std = 0.002
//!
//! [[analyses]]
//! name = "sweep"
//! frequencies = "100:10:5000"
//! angles = [0, 45]
//! ```

use crate::analysis::{Analysis, AnalysisSpec};
use crate::backing::Backing;
use crate::constants;
use crate::error::{MlsError, Result};
use crate::layers::Layer;
use crate::loader::{load_medium, medium_from_table};
use crate::media::{Fluid, Medium, MediumType};
use crate::sampling::{NormalSampler, PresetDraws, Sampler, UniformSampler};
use crate::solver::Solver;
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use toml::Table;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackDefinition {
    pub backing: Backing,
    /// Air temperature in °C, for the incident fluid and the built-in
    /// `air` medium. Reference air when absent.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Materials by name, either inline parameters or a `source` file.
    #[serde(default)]
    pub materials: BTreeMap<String, Table>,
    pub layers: Vec<LayerDefinition>,
    #[serde(default)]
    pub analyses: Vec<AnalysisDefinition>,
    #[serde(default)]
    pub stochastic: StochasticSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDefinition {
    pub medium: String,
    pub thickness: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stochastic: Option<DrawDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Normal,
    Uniform,
    Preset,
}

/// How a stochastic layer draws its parameter. `mean` defaults to the
/// nominal value of the parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawDefinition {
    pub parameter: String,
    pub distribution: DistributionKind,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    /// Normalised draws of a preset distribution.
    #[serde(default)]
    pub draws: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisDefinition {
    pub name: String,
    pub frequencies: AnalysisSpec,
    #[serde(default = "normal_incidence")]
    pub angles: AnalysisSpec,
    /// Defaults to whether the stack has a stochastic layer.
    #[serde(default)]
    pub stochastic: Option<bool>,
}

fn normal_incidence() -> AnalysisSpec {
    AnalysisSpec::Scalar(0.0)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StochasticSettings {
    #[serde(default)]
    pub draws: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Read a stack definition. Material sources resolve relative to the
/// directory of `path`.
pub fn load_stack(path: impl AsRef<Path>) -> Result<Solver> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MlsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    info!("loading stack from {}", path.display());
    stack_from_toml_str(&text, base)
}

pub fn stack_from_toml_str(text: &str, base_dir: &Path) -> Result<Solver> {
    let definition: StackDefinition = toml::from_str(text)?;
    definition.build(base_dir)
}

impl StackDefinition {
    pub fn build(&self, base_dir: &Path) -> Result<Solver> {
        let mut materials = BTreeMap::new();
        for (name, table) in &self.materials {
            let mut medium = material(table, base_dir)?;
            if medium.name() == "Unnamed Medium" {
                medium.set_name(name);
            }
            debug!("material {name}: {medium}");
            materials.insert(name.as_str(), medium);
        }

        let temperature = self.temperature.unwrap_or(constants::TEMPERATURE);
        if !(temperature.is_finite() && temperature > -273.15) {
            return Err(MlsError::IncompleteDefinition(format!(
                "air temperature {temperature} °C is not above absolute zero"
            )));
        }
        let mut solver = Solver::default()
            .with_backing(self.backing)
            .with_incident(Fluid::air_at(temperature));
        for (index, def) in self.layers.iter().enumerate() {
            let medium = match materials.get(def.medium.as_str()) {
                Some(m) => m.clone(),
                None if def.medium == "air" => Medium::air_at(temperature),
                None => {
                    return Err(MlsError::InvalidLayer {
                        index,
                        reason: format!("undeclared medium {}", def.medium),
                    })
                }
            };
            if !(def.thickness.is_finite() && def.thickness >= 0.0) {
                return Err(MlsError::InvalidLayer {
                    index,
                    reason: format!("thickness {} m", def.thickness),
                });
            }
            let layer = match &def.stochastic {
                None => Layer::new(medium, def.thickness),
                Some(draw) => {
                    let nominal = if draw.parameter == "thickness" {
                        Some(def.thickness)
                    } else {
                        medium.parameter(&draw.parameter)
                    };
                    let nominal = nominal.ok_or_else(|| {
                        MlsError::UnknownStochasticParameter(draw.parameter.clone())
                    })?;
                    let sampler = draw.sampler(nominal)?;
                    Layer::stochastic(medium, def.thickness, &draw.parameter, sampler)?
                }
            };
            let name = def.name.as_deref().unwrap_or(&def.medium);
            solver.add_layer(layer.with_name(name));
        }

        let stochastic_stack = solver.is_stochastic();
        for def in &self.analyses {
            let stochastic = def.stochastic.unwrap_or(stochastic_stack);
            solver.add_analysis(Analysis::new(
                &def.name,
                def.frequencies.clone(),
                def.angles.clone(),
                stochastic,
            )?);
        }
        if let Some(draws) = self.stochastic.draws {
            solver = solver.with_draws(draws);
        }
        if let Some(seed) = self.stochastic.seed {
            solver = solver.with_seed(seed);
        }
        Ok(solver)
    }
}

fn material(table: &Table, base_dir: &Path) -> Result<Medium> {
    let force = match table.get("medium_type").and_then(|v| v.as_str()) {
        Some(t) => Some(t.parse::<MediumType>()?),
        None => None,
    };
    match table.get("source") {
        None => medium_from_table(table, force),
        Some(toml::Value::String(source)) => {
            let mut medium = load_medium(base_dir.join(source), force)?;
            if let Some(name) = table.get("name").and_then(|v| v.as_str()) {
                medium.set_name(name);
            }
            Ok(medium)
        }
        Some(other) => Err(MlsError::TypeMismatch {
            parameter: "source".into(),
            expected: "a path",
            found: other.type_str().to_string(),
        }),
    }
}

impl DrawDefinition {
    fn sampler(&self, nominal: f64) -> Result<Box<dyn Sampler>> {
        let mean = self.mean.unwrap_or(nominal);
        let missing = |field: &str| {
            MlsError::InvalidDistribution(format!(
                "{:?} distribution of {} needs {field}",
                self.distribution, self.parameter
            ))
        };
        Ok(match self.distribution {
            DistributionKind::Normal => {
                let std = self.std.ok_or_else(|| missing("std"))?;
                Box::new(NormalSampler::new(mean, std)?)
            }
            DistributionKind::Uniform => {
                let low = self.low.ok_or_else(|| missing("low"))?;
                let high = self.high.ok_or_else(|| missing("high"))?;
                Box::new(UniformSampler::new(low, high)?)
            }
            DistributionKind::Preset => {
                let draws = self.draws.clone().ok_or_else(|| missing("draws"))?;
                let std = self.std.ok_or_else(|| missing("std"))?;
                if !(std.is_finite() && std >= 0.0) {
                    return Err(MlsError::InvalidDistribution(format!(
                        "preset draws of {} need std >= 0, got {std}",
                        self.parameter
                    )));
                }
                Box::new(PresetDraws::new(draws, mean, std))
            }
        })
    }
}
