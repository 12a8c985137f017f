//! Material definitions stored as flat TOML tables.
//!
//! ```toml
//! medium_type = "elastic"
//! name = "plywood"
//! E = 4.1e9
//! nu = 0.3
//! rho = 540
//! ```

use crate::error::{MlsError, Result};
use crate::media::params::{ParameterSet, ParameterValue};
use crate::media::{Medium, MediumType};
use log::{debug, warn};
use std::fs;
use std::path::Path;
use toml::{Table, Value};

const TYPE_KEY: &str = "medium_type";

/// Load a medium from a TOML file. `force` overrides the type written in
/// the file, and is required when the file has none.
pub fn load_medium(path: impl AsRef<Path>, force: Option<MediumType>) -> Result<Medium> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MlsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loading medium from {}", path.display());
    medium_from_toml_str(&text, force)
}

pub fn medium_from_toml_str(text: &str, force: Option<MediumType>) -> Result<Medium> {
    let table: Table = text.parse()?;
    medium_from_table(&table, force)
}

/// Build a medium from an already parsed table.
pub fn medium_from_table(table: &Table, force: Option<MediumType>) -> Result<Medium> {
    let written = match table.get(TYPE_KEY) {
        None => None,
        Some(Value::String(s)) => Some(s.parse::<MediumType>()?),
        Some(other) => return Err(mismatch(TYPE_KEY, "a medium type name", other)),
    };
    let medium_type = match (force, written) {
        (Some(forced), Some(written)) if forced != written => {
            warn!("medium declared as {written}, loaded as {forced}");
            forced
        }
        (Some(forced), _) => forced,
        (None, Some(written)) => written,
        (None, None) => return Err(MlsError::UnspecifiedMediumType),
    };

    let mut params = ParameterSet::new();
    for (key, value) in table {
        if key == TYPE_KEY {
            continue;
        }
        let value = match value {
            Value::Float(x) => ParameterValue::Number(*x),
            Value::Integer(i) => ParameterValue::Number(*i as f64),
            Value::String(s) => ParameterValue::Text(s.clone()),
            other => return Err(mismatch(key, "a number or a string", other)),
        };
        if key != "name" && !medium_type.declares(key) {
            debug!("ignoring parameter {key} undeclared by {medium_type}");
        }
        params.insert(key, value);
    }
    Medium::from_parameters(medium_type, &params)
}

fn mismatch(parameter: &str, expected: &'static str, found: &Value) -> MlsError {
    MlsError::TypeMismatch {
        parameter: parameter.to_string(),
        expected,
        found: found.type_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FOAM: &str = r#"
medium_type = "pem"
name = "melamine"
phi = 0.98
sigma = 3750
alpha = 1.17
Lambda_prime = 742e-6
Lambda = 110e-6
rho_1 = 22.1
nu = 0.39
E = 70e3
eta = 0.265
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FOAM.as_bytes()).unwrap();
        let medium = load_medium(file.path(), None).unwrap();
        assert_eq!(medium.medium_type(), MediumType::Pem);
        assert_eq!(medium.name(), "melamine");
        assert_eq!(medium.parameter("sigma"), Some(3750.0));
        assert_eq!(medium.parameter("rho_1"), Some(22.1));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_medium(dir.path().join("nope.toml"), None).unwrap_err();
        assert!(matches!(err, MlsError::Io { .. }));
    }

    #[test]
    fn test_forced_type() {
        let screen = medium_from_toml_str(FOAM, Some(MediumType::Screen)).unwrap();
        assert_eq!(screen.medium_type(), MediumType::Screen);

        let untyped = "rho = 1.2\nc = 340";
        assert!(matches!(
            medium_from_toml_str(untyped, None),
            Err(MlsError::UnspecifiedMediumType)
        ));
        let fluid = medium_from_toml_str(untyped, Some(MediumType::Fluid)).unwrap();
        assert_eq!(fluid.parameter("c"), Some(340.0));
    }

    #[test]
    fn test_definition_errors() {
        assert!(matches!(
            medium_from_toml_str("medium_type = \"gas\"", None),
            Err(MlsError::UnknownMediumType(_))
        ));
        assert!(matches!(
            medium_from_toml_str("medium_type = \"fluid\"\nrho = 1.2", None),
            Err(MlsError::MissingParameter { parameter }) if parameter == "c"
        ));
        assert!(matches!(
            medium_from_toml_str("medium_type = \"fluid\"\nrho = \"dense\"\nc = 340", None),
            Err(MlsError::TypeMismatch { .. })
        ));
        assert!(matches!(
            medium_from_toml_str("medium_type = \"fluid\"\nrho = true\nc = 340", None),
            Err(MlsError::TypeMismatch { .. })
        ));
        assert!(matches!(
            medium_from_toml_str("medium_type = [1]", None),
            Err(MlsError::TypeMismatch { .. })
        ));
        assert!(matches!(
            medium_from_toml_str("rho = ", None),
            Err(MlsError::Toml(_))
        ));
    }
}
