use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while defining, loading or solving a multilayer.
#[derive(Error, Debug)]
pub enum MlsError {
    /// The solver was asked to run on an incomplete stack definition.
    #[error("incomplete definition: {0}")]
    IncompleteDefinition(String),

    #[error("unable to find definition of parameter \"{parameter}\"")]
    MissingParameter { parameter: String },

    #[error("parameter \"{parameter}\" is not declared by medium type {medium_type}")]
    UnknownParameter {
        parameter: String,
        medium_type: &'static str,
    },

    #[error("unspecified medium type")]
    UnspecifiedMediumType,

    #[error("medium type \"{0}\" is not known")]
    UnknownMediumType(String),

    /// A parameter value (or a stochastic draw) has the wrong type.
    #[error("parameter \"{parameter}\": expected {expected}, got {found}")]
    TypeMismatch {
        parameter: String,
        expected: &'static str,
        found: String,
    },

    #[error("invalid literal definition ({attempted}): {literal}")]
    InvalidLiteral {
        literal: String,
        attempted: &'static str,
    },

    #[error("bad layer definition in layer {index}: {reason}")]
    InvalidLayer { index: usize, reason: String },

    #[error("unable to draw parameter \"{0}\" undefined in the layer")]
    UnknownStochasticParameter(String),

    #[error("invalid draw for \"{parameter}\": {value}")]
    InvalidDraw { parameter: String, value: f64 },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("the distribution has only {0} samples")]
    DrawsExhausted(usize),

    /// Singular inversion or non-finite value inside the recursion.
    #[error("numerical failure in {context}")]
    Numerical { context: String },

    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl MlsError {
    pub(crate) fn numerical(context: impl Into<String>) -> Self {
        MlsError::Numerical {
            context: context.into(),
        }
    }

    /// True for errors raised by an incomplete or inconsistent setup.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            MlsError::IncompleteDefinition(_)
                | MlsError::InvalidLayer { .. }
                | MlsError::UnknownStochasticParameter(_)
        )
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self, MlsError::Numerical { .. })
    }
}

pub type Result<T> = std::result::Result<T, MlsError>;
