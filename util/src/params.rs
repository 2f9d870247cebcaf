//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (DBW_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file {0:?}: {1}")]
    FileLoadError(PathBuf, std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),

    #[error("Invalid parameter `{0}`: {1}")]
    InvalidParam(&'static str, String),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Parameters which can check their own values after loading.
///
/// Out of range values are a fatal configuration error, so every parameter struct loaded at start
/// up should reject them here rather than at runtime.
pub trait Validate {
    fn validate(&self) -> Result<(), LoadError>;
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$DBW_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    // Get the params dir
    let mut path = crate::host::get_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    // Load the file into a string
    let params_str = match read_to_string(&path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(path, e)),
    };

    from_str(&params_str)
}

/// Load a parameter file and validate it.
pub fn load_validated<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned + Validate,
{
    let params: P = load(param_file_path)?;
    params.validate()?;
    Ok(params)
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

/// Check that a parameter is strictly positive and finite.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<(), LoadError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LoadError::InvalidParam(
            name,
            format!("expected a positive value, found {}", value),
        ))
    }
}

/// Check that a parameter is zero or positive, and finite.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), LoadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LoadError::InvalidParam(
            name,
            format!("expected a non-negative value, found {}", value),
        ))
    }
}
