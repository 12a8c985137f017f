use crate::error::{MlsError, Result};
use std::collections::BTreeMap;

/// Scalar type expected for a declared medium parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Real,
}

impl ParameterKind {
    pub fn describe(self) -> &'static str {
        match self {
            ParameterKind::Real => "a real number",
        }
    }
}

/// A parameter declared by a medium variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterKind,
}

impl ParameterSpec {
    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Real,
        }
    }
}

/// Raw value read from a material definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

/// Flat name → value mapping a medium is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a numeric value.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, ParameterValue::Number(value));
        self
    }

    pub fn insert(&mut self, name: &str, value: ParameterValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParameterValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of `spec`, `None` when absent.
    pub fn real(&self, spec: &ParameterSpec) -> Result<Option<f64>> {
        match self.values.get(spec.name) {
            None => Ok(None),
            Some(ParameterValue::Number(v)) => Ok(Some(*v)),
            Some(ParameterValue::Text(s)) => Err(MlsError::TypeMismatch {
                parameter: spec.name.to_string(),
                expected: spec.kind.describe(),
                found: format!("text \"{s}\""),
            }),
        }
    }

    /// Numeric value of a required parameter.
    pub fn required(&self, spec: &ParameterSpec) -> Result<f64> {
        self.real(spec)?.ok_or_else(|| MlsError::MissingParameter {
            parameter: spec.name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_optional_lookup() {
        let params = ParameterSet::new().with("rho", 1.2);
        assert_eq!(params.required(&ParameterSpec::real("rho")).unwrap(), 1.2);
        assert_eq!(params.real(&ParameterSpec::real("c")).unwrap(), None);
        match params.required(&ParameterSpec::real("c")) {
            Err(MlsError::MissingParameter { parameter }) => assert_eq!(parameter, "c"),
            other => panic!("expected a missing parameter error, got {other:?}"),
        }
    }

    #[test]
    fn test_text_value_is_a_type_mismatch() {
        let mut params = ParameterSet::new();
        params.insert("phi", ParameterValue::Text("high".into()));
        assert!(matches!(
            params.required(&ParameterSpec::real("phi")),
            Err(MlsError::TypeMismatch { .. })
        ));
    }
}
