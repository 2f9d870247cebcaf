//! # Drive-by-wire Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Actuation demands sent to the drive-by-wire system.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DbwCmd {
    /// Throttle demand as a fraction of full throttle, in [0, 1].
    pub throttle: f64,

    /// Brake torque demand at the wheel, never negative.
    ///
    /// Units: newton meters
    pub brake_nm: f64,

    /// Steering angle demand, within the configured max steer angle.
    ///
    /// Units: radians
    pub steer_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The stop signal produced by perception, giving the index of the base lane waypoint the vehicle
/// must stop at.
///
/// On the wire this is an integer where any negative value (usually `-1`) means no stop is
/// requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum StopSignal {
    None,
    At(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DbwCmd {
    /// The command issued whenever actuation is suppressed.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        StopSignal::None
    }
}

impl StopSignal {
    /// Return the stop index, or `None` if no stop is requested.
    pub fn index(&self) -> Option<usize> {
        match self {
            StopSignal::None => None,
            StopSignal::At(i) => Some(*i),
        }
    }
}

impl From<i64> for StopSignal {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            StopSignal::None
        } else {
            StopSignal::At(raw as usize)
        }
    }
}

impl From<StopSignal> for i64 {
    fn from(sig: StopSignal) -> Self {
        match sig {
            StopSignal::None => -1,
            StopSignal::At(i) => i as i64,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stop_signal_wire_format() {
        assert_eq!(StopSignal::from(-1), StopSignal::None);
        assert_eq!(StopSignal::from(-7), StopSignal::None);
        assert_eq!(StopSignal::from(42), StopSignal::At(42));
        assert_eq!(i64::from(StopSignal::None), -1);

        let sig: StopSignal = serde_json::from_str("293").unwrap();
        assert_eq!(sig.index(), Some(293));
        assert_eq!(serde_json::to_string(&StopSignal::None).unwrap(), "-1");
    }
}
