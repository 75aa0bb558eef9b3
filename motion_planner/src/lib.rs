//! # Motion planning library.
//!
//! Turns a chain of cartesian waypoints with per-waypoint speed limits into
//! a sequence of physically realisable, time-parameterised moves, each split
//! into accelerate/cruise/decelerate blocks. Velocity is continuous across
//! junctions within the per-axis discontinuity limits, and no axis's
//! acceleration limit is ever exceeded.
//!
//! The consumer lowers each block's `(distance, initial_speed,
//! acceleration, time)` into per-axis step/velocity setpoints for the motor
//! controller nodes; that conversion and the bus transport live elsewhere.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Constraint model - validated per-axis kinematic limits
pub mod constraints;

/// Geometry - the axis set, coordinate vectors and move targets
pub mod geom;

/// Move manager module - builds and iteratively blends move lists
pub mod move_mgr;

/// Velocity profile value types - blocks and moves
pub mod profile;
