//! Frequency × angle grids to sweep.

use crate::error::{MlsError, Result};
use serde::Deserialize;

/// One axis of an analysis as written by the user.
///
/// A literal is either a `start:step:end` range, whose end is included
/// within half a step, a comma-separated list or a single number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisSpec {
    Values(Vec<f64>),
    Scalar(f64),
    Literal(String),
}

impl AnalysisSpec {
    pub fn expand(&self) -> Result<Vec<f64>> {
        match self {
            AnalysisSpec::Values(v) => Ok(v.clone()),
            AnalysisSpec::Scalar(x) => Ok(vec![*x]),
            AnalysisSpec::Literal(s) => parse_literal(s),
        }
    }
}

impl From<Vec<f64>> for AnalysisSpec {
    fn from(v: Vec<f64>) -> Self {
        AnalysisSpec::Values(v)
    }
}

impl From<&[f64]> for AnalysisSpec {
    fn from(v: &[f64]) -> Self {
        AnalysisSpec::Values(v.to_vec())
    }
}

impl From<f64> for AnalysisSpec {
    fn from(x: f64) -> Self {
        AnalysisSpec::Scalar(x)
    }
}

impl From<&str> for AnalysisSpec {
    fn from(s: &str) -> Self {
        AnalysisSpec::Literal(s.to_string())
    }
}

impl From<String> for AnalysisSpec {
    fn from(s: String) -> Self {
        AnalysisSpec::Literal(s)
    }
}

/// `\d+\.?\d*`
fn is_unsigned_decimal(s: &str) -> bool {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (s, ""),
    };
    !int.is_empty() && int.bytes().all(|b| b.is_ascii_digit()) && frac.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(literal: &str, attempted: &'static str) -> MlsError {
    MlsError::InvalidLiteral {
        literal: literal.to_string(),
        attempted,
    }
}

/// Largest number of values a range literal may expand to.
pub const MAX_RANGE_POINTS: usize = 1_000_000;

/// `arange(start, end + step/2, step)`.
fn expand_range(literal: &str, start: &str, step: &str, end: &str) -> Result<Vec<f64>> {
    let parse = |s: &str| s.parse::<f64>().map_err(|_| invalid(literal, "range"));
    let (start, step, end) = (parse(start)?, parse(step)?, parse(end)?);
    if step <= 0.0 {
        return Err(invalid(literal, "range"));
    }
    let stop = end + step / 2.0;
    let count = ((stop - start) / step).ceil().max(0.0);
    if !count.is_finite() || count > MAX_RANGE_POINTS as f64 {
        return Err(invalid(literal, "range"));
    }
    Ok((0..count as usize).map(|i| start + i as f64 * step).collect())
}

/// Parse a textual axis definition.
pub fn parse_literal(literal: &str) -> Result<Vec<f64>> {
    let parts: Vec<&str> = literal.split(':').collect();
    if let [start, step, end] = parts[..] {
        let step_ok = step.is_empty() || is_unsigned_decimal(step);
        if is_unsigned_decimal(start) && step_ok && is_unsigned_decimal(end) {
            return expand_range(literal, start, step, end);
        }
    }

    if let Ok(x) = literal.trim().parse::<f64>() {
        return Ok(vec![x]);
    }
    literal
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| invalid(literal, "list")))
        .collect()
}

/// A named sweep over the cartesian product of frequencies and angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub name: String,
    /// Frequencies in Hz.
    pub frequencies: Vec<f64>,
    /// Incidence angles in degrees.
    pub angles: Vec<f64>,
    /// Repeat the sweep for every draw of the stochastic layers.
    pub stochastic: bool,
}

impl Analysis {
    pub fn new(
        name: &str,
        frequencies: impl Into<AnalysisSpec>,
        angles: impl Into<AnalysisSpec>,
        stochastic: bool,
    ) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            frequencies: frequencies.into().expand()?,
            angles: angles.into().expand()?,
            stochastic,
        })
    }

    /// Number of (frequency, angle) points.
    pub fn len(&self) -> usize {
        self.frequencies.len() * self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(frequency, angle)` pairs, frequency-major. The point index is
    /// `i_f * angles.len() + i_a`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .flat_map(move |&f| self.angles.iter().map(move |&a| (f, a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_literal() {
        let f = parse_literal("20:10:2500").unwrap();
        assert_eq!(f.len(), 249);
        assert_eq!(f[0], 20.0);
        assert_eq!(*f.last().unwrap(), 2500.0);
        for w in f.windows(2) {
            assert!((w[1] - w[0] - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_range_with_fractional_step() {
        let a = parse_literal("0:0.5:2").unwrap();
        assert_eq!(a, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_list_and_scalar_literals() {
        assert_eq!(parse_literal("100, 200,300").unwrap(), vec![100.0, 200.0, 300.0]);
        assert_eq!(parse_literal("45").unwrap(), vec![45.0]);
        assert_eq!(parse_literal(" 1e3 ").unwrap(), vec![1000.0]);
    }

    #[test]
    fn test_invalid_literals() {
        assert!(matches!(
            parse_literal("abc"),
            Err(MlsError::InvalidLiteral { attempted: "list", .. })
        ));
        assert!(matches!(
            parse_literal("20::2500"),
            Err(MlsError::InvalidLiteral { attempted: "range", .. })
        ));
        assert!(parse_literal("20:0:2500").is_err());
    }

    #[test]
    fn test_oversized_range_is_rejected() {
        assert!(matches!(
            parse_literal("0:0.000001:100000"),
            Err(MlsError::InvalidLiteral { attempted: "range", .. })
        ));
        assert_eq!(parse_literal("1:1:1000000").unwrap().len(), MAX_RANGE_POINTS);
    }

    #[test]
    fn test_points_are_frequency_major() {
        let a = Analysis::new("grid", vec![100.0, 200.0], "0,30,60", false).unwrap();
        let points: Vec<(f64, f64)> = a.points().collect();
        assert_eq!(a.len(), 6);
        assert_eq!(points[0], (100.0, 0.0));
        assert_eq!(points[2], (100.0, 60.0));
        assert_eq!(points[3], (200.0, 0.0));
    }

    #[test]
    fn test_spec_from_toml() {
        #[derive(Deserialize)]
        struct Axes {
            f: AnalysisSpec,
            a: AnalysisSpec,
            s: AnalysisSpec,
        }
        let axes: Axes = toml::from_str("f = \"20:10:100\"\na = [0, 45]\ns = 1000.0").unwrap();
        assert_eq!(axes.f.expand().unwrap().len(), 9);
        assert_eq!(axes.a, AnalysisSpec::Values(vec![0.0, 45.0]));
        assert_eq!(axes.s, AnalysisSpec::Scalar(1000.0));
    }
}
