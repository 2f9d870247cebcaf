//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with the vehicle's equipment
//! and with the producers of the reference lane.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod dbw;
pub mod lane;
pub mod veh;
