//! Module interfaces
//!
//! Each cyclic processing module in `dbw_exec` is built from one parameter file and then run
//! once per cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use serde::de::DeserializeOwned;

// Internal imports
use crate::params::{self, LoadError, Validate};

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A cyclic processing module.
pub trait State: Sized {
    /// Parameters the module is built from
    type Params: DeserializeOwned + Validate;
    /// An error which can occur while building the module.
    type InitError: From<LoadError>;

    /// Data required for cyclic processing.
    type InputData;
    /// Data produced by cyclic processing.
    type OutputData;
    /// A report on the status of the cyclic processing.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Build the module from a set of parameters, validating them first.
    fn from_params(params: Self::Params) -> Result<Self, Self::InitError>;

    /// Build the module from its parameter file, relative to the params directory.
    fn init(param_file_path: &str) -> Result<Self, Self::InitError> {
        let params: Self::Params = params::load(param_file_path)?;
        Self::from_params(params)
    }

    /// Process one cycle, producing the output data and a status report.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
