//! Geometry types for the planning core
//!
//! The gantry is modelled as a set of independently actuated axes: the three
//! cartesian axes plus the plunger actuator. Positions and directions are
//! carried as one scalar per axis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use util::maths::norm;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of independently actuated axes.
pub const NUM_AXES: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An independently actuated degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Gantry left-right
    X,
    /// Gantry front-back
    Y,
    /// Gantry up-down
    Z,
    /// Plunger actuator
    A,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An immutable position or direction vector over the axis set.
///
/// Has exactly one scalar per axis, indexable by [`Axis`].
///
/// Units: millimeters (for positions) or unitless (for directions).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub [f64; NUM_AXES]);

/// A single waypoint in a chain, with the speed limit requested for the leg
/// ending at it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveTarget {
    /// The position to move to.
    ///
    /// Units: millimeters
    pub position: Coordinates,

    /// The maximum speed for the leg ending at this waypoint.
    ///
    /// Units: millimeters/second
    pub max_speed: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; NUM_AXES] = [Axis::X, Axis::Y, Axis::Z, Axis::A];

    /// The index of this axis into a per-axis array.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::A => 3,
        }
    }
}

impl std::ops::Index<Axis> for Coordinates {
    type Output = f64;

    fn index(&self, axis: Axis) -> &Self::Output {
        &self.0[axis.index()]
    }
}

impl Coordinates {
    /// Build a coordinate vector from individual axis values.
    pub fn new(x: f64, y: f64, z: f64, a: f64) -> Self {
        Coordinates([x, y, z, a])
    }

    /// The all-zero vector.
    pub fn zero() -> Self {
        Coordinates([0.0; NUM_AXES])
    }

    /// True if every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }

    /// The euclidian distance between two positions.
    ///
    /// Units: millimeters
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        // The unwrap is safe as both slices always have NUM_AXES elements
        norm(&self.0, &other.0).unwrap()
    }

    /// The unit direction vector from `self` towards `other`, along with the
    /// distance between the two positions.
    ///
    /// Returns `None` if the positions are coincident, in which case no
    /// direction is defined.
    pub fn direction_to(&self, other: &Coordinates) -> Option<(Coordinates, f64)> {
        let distance = self.distance_to(other);

        if distance == 0.0 {
            return None;
        }

        let mut unit = [0.0; NUM_AXES];
        for i in 0..NUM_AXES {
            unit[i] = (other.0[i] - self.0[i]) / distance;
        }

        Some((Coordinates(unit), distance))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
