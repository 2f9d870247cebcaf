//! # Drive-by-wire Executable Parameters
//!
//! This module provide parameters for the drive-by-wire executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::{
    logger::LogParams,
    params::{ensure_non_negative, ensure_positive, LoadError, Validate},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DbwExecParams {
    /// Number of control cycles per second
    pub cycle_frequency_hz: f64,

    /// Path to the base lane route file, relative to the software root unless absolute
    pub waypoints_path: String,

    /// Target velocity given to every waypoint of the base lane.
    ///
    /// Units: meters/second
    pub waypoint_speed_ms: f64,

    /// Logging levels for the session
    pub log: LogParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Validate for DbwExecParams {
    fn validate(&self) -> Result<(), LoadError> {
        ensure_positive("cycle_frequency_hz", self.cycle_frequency_hz)?;
        ensure_non_negative("waypoint_speed_ms", self.waypoint_speed_ms)?;

        if self.waypoints_path.trim().is_empty() {
            return Err(LoadError::InvalidParam(
                "waypoints_path",
                "expected a path, found an empty string".into(),
            ));
        }

        self.log
            .levels()
            .map_err(|e| LoadError::InvalidParam("log", e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_and_validate() {
        let params: DbwExecParams = util::params::from_str(
            "cycle_frequency_hz = 50.0\n\
             waypoints_path = \"data/wp_yaw_const.csv\"\n\
             waypoint_speed_ms = 11.11\n\
             [log]\n\
             file_level = \"trace\"\n\
             stdout_level = \"info\"\n\
             [log.targets]\n\
             \"dbw_lib::twist_ctrl\" = \"debug\"\n",
        )
        .unwrap();

        assert!(params.validate().is_ok());
        assert_eq!(params.cycle_frequency_hz, 50.0);

        assert_eq!(params.log.targets.len(), 1);

        let mut quiet = params.clone();
        quiet.log.file_level = "warn".into();
        assert!(matches!(
            quiet.validate(),
            Err(LoadError::InvalidParam("log", _))
        ));

        let params = DbwExecParams {
            cycle_frequency_hz: 0.0,
            ..params
        };
        assert!(matches!(
            params.validate(),
            Err(LoadError::InvalidParam("cycle_frequency_hz", _))
        ));
    }
}
