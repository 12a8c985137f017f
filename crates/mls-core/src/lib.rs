//! Plane-wave reflection and transmission by acoustic multilayers.
//!
//! A stack of fluid, equivalent-fluid, elastic, poro-elastic and screen
//! layers is solved with the recursive transfer-matrix method: a state
//! matrix is carried from the backing to the incidence side and projected
//! onto the incident wave at each (frequency, angle) point.

pub mod analysis;
pub mod backing;
pub mod config;
pub mod constants;
pub mod error;
pub mod indicators;
pub mod interface;
pub mod layers;
pub mod linalg;
pub mod loader;
pub mod media;
pub mod result;
pub mod sampling;
pub mod solver;

pub use analysis::{Analysis, AnalysisSpec};
pub use backing::Backing;
pub use config::{load_stack, StackDefinition};
pub use error::{MlsError, Result};
pub use layers::Layer;
pub use loader::load_medium;
pub use media::{Medium, MediumClass, MediumType};
pub use result::{AnalysisResult, Coefficients, StochasticRecord};
pub use solver::Solver;
