//! Per-axis kinematic constraint model
//!
//! Constraint values are sourced from the robot configuration (see
//! [`crate::move_mgr::Params`]) or assembled programmatically by the caller.
//! A [`SystemConstraints`] instance is always complete and validated: every
//! axis has an entry and all limits are physically meaningful.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// Internal
use crate::geom::{Axis, NUM_AXES};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic limits for a single axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisConstraints {
    /// Maximum acceleration of the axis. Must be positive.
    ///
    /// Units: millimeters/second²
    pub max_acceleration: f64,

    /// The maximum instantaneous speed jump permitted at a junction where
    /// the axis keeps moving in the same direction.
    ///
    /// Units: millimeters/second
    pub max_speed_discontinuity: f64,

    /// The tighter speed bound applied at a junction where the axis reverses
    /// direction.
    ///
    /// Units: millimeters/second
    pub max_direction_change_speed_discontinuity: f64,
}

/// The complete set of constraints for every axis of the gantry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SystemConstraints {
    per_axis: [AxisConstraints; NUM_AXES],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised when validating constraint values.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("No constraints given for axis {0:?}")]
    MissingAxis(Axis),

    #[error("Axis {0:?} has a non-positive maximum acceleration")]
    NonPositiveAcceleration(Axis),

    #[error("Axis {0:?} has a negative speed discontinuity limit")]
    NegativeDiscontinuity(Axis),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SystemConstraints {
    /// Build a constraint set from a per-axis array in [`Axis::ALL`] order.
    ///
    /// Fails if any axis's limits are not physically meaningful.
    pub fn new(per_axis: [AxisConstraints; NUM_AXES]) -> Result<Self, ConstraintError> {
        for axis in Axis::ALL.iter() {
            let c = &per_axis[axis.index()];

            if c.max_acceleration <= 0.0 {
                return Err(ConstraintError::NonPositiveAcceleration(*axis));
            }
            if c.max_speed_discontinuity < 0.0
                || c.max_direction_change_speed_discontinuity < 0.0
            {
                return Err(ConstraintError::NegativeDiscontinuity(*axis));
            }
        }

        Ok(SystemConstraints { per_axis })
    }

    /// Build a constraint set from a map of axis to constraints.
    ///
    /// Fails if the map is missing any axis, or if any axis's limits are not
    /// physically meaningful. The completeness check is eager so that a
    /// missing axis is caught here rather than mid-plan.
    pub fn from_map(map: &HashMap<Axis, AxisConstraints>) -> Result<Self, ConstraintError> {
        let mut per_axis = [AxisConstraints {
            max_acceleration: 0.0,
            max_speed_discontinuity: 0.0,
            max_direction_change_speed_discontinuity: 0.0,
        }; NUM_AXES];

        for axis in Axis::ALL.iter() {
            per_axis[axis.index()] = *map
                .get(axis)
                .ok_or(ConstraintError::MissingAxis(*axis))?;
        }

        Self::new(per_axis)
    }

    /// Get the constraints for a single axis.
    pub fn axis(&self, axis: Axis) -> &AxisConstraints {
        &self.per_axis[axis.index()]
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
