//! # Communications interface crate.
//!
//! Provides all common interface types for the drive-by-wire software. These are the messages
//! which cross the boundary of the control exec, whatever transport carries them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Input messages delivered by external producers (localisation, planning, the DBW system)
pub mod input;

/// Command and state definitions for vehicle equipment (drive-by-wire, lane, vehicle state)
pub mod eqpt;
