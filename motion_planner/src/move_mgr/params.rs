//! Parameters structure for the move manager

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::constraints::{AxisConstraints, ConstraintError, SystemConstraints};
use crate::geom::{Axis, NUM_AXES};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the move manager.
///
/// All per-axis arrays are in [`Axis::ALL`] order (X, Y, Z, A).
#[derive(Debug, Default, Deserialize)]
pub struct Params {
    /// Maximum acceleration of each axis.
    ///
    /// Units: millimeters/second²
    pub max_acceleration_mms2: [f64; NUM_AXES],

    /// Maximum instantaneous speed jump permitted on each axis at a junction
    /// where the axis keeps its direction of travel.
    ///
    /// Units: millimeters/second
    pub max_speed_discontinuity_mms: [f64; NUM_AXES],

    /// Maximum speed at which each axis may reverse its direction of travel
    /// at a junction.
    ///
    /// Units: millimeters/second
    pub max_direction_change_speed_discontinuity_mms: [f64; NUM_AXES],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Build the validated constraint set described by these parameters.
    pub fn to_constraints(&self) -> Result<SystemConstraints, ConstraintError> {
        let mut per_axis = [AxisConstraints {
            max_acceleration: 0.0,
            max_speed_discontinuity: 0.0,
            max_direction_change_speed_discontinuity: 0.0,
        }; NUM_AXES];

        for axis in Axis::ALL.iter() {
            let i = axis.index();
            per_axis[i] = AxisConstraints {
                max_acceleration: self.max_acceleration_mms2[i],
                max_speed_discontinuity: self.max_speed_discontinuity_mms[i],
                max_direction_change_speed_discontinuity: self
                    .max_direction_change_speed_discontinuity_mms[i],
            };
        }

        SystemConstraints::new(per_axis)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
