//! Utility library for the drive-by-wire control software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod module;
pub mod params;
pub mod quadtree;
pub mod script_interpreter;
pub mod session;
pub mod snapshot;
pub mod time;

