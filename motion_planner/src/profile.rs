//! Velocity profile value types
//!
//! A [`Move`] is one waypoint-to-waypoint leg of the planned trajectory,
//! made of three constant-acceleration [`Block`]s: accelerate, cruise,
//! decelerate. The blocks are velocity-continuous and their distances sum to
//! the move's total distance. Blocks are constructed only by the move
//! builder (see [`crate::move_mgr`]), which guarantees those invariants.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::geom::Coordinates;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when comparing speeds for blending convergence.
///
/// Units: millimeters/second
pub const SPEED_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single constant-acceleration kinematic segment of a move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Block {
    /// Distance covered by the block. Never negative.
    ///
    /// Units: millimeters
    pub distance: f64,

    /// Speed at the start of the block. Never negative.
    ///
    /// Units: millimeters/second
    pub initial_speed: f64,

    /// Signed acceleration over the block.
    ///
    /// Units: millimeters/second²
    pub acceleration: f64,
}

/// One waypoint-to-waypoint leg of a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Move {
    /// Unit direction vector of the leg. Zero for a dummy move.
    pub unit_vector: Coordinates,

    /// Total distance of the leg.
    ///
    /// Units: millimeters
    pub distance: f64,

    /// The ceiling for the cruise block's speed.
    ///
    /// Units: millimeters/second
    pub max_speed: f64,

    /// The (accelerate, cruise, decelerate) blocks of the leg.
    pub blocks: [Block; 3],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Block {
    /// A zero-length, zero-speed block.
    pub fn zero() -> Self {
        Block {
            distance: 0.0,
            initial_speed: 0.0,
            acceleration: 0.0,
        }
    }

    /// Speed at the end of the block.
    ///
    /// The builder guarantees `initial_speed² + 2·a·d` is non-negative; the
    /// clamp here only absorbs floating point round-off in the decelerate
    /// case.
    ///
    /// Units: millimeters/second
    pub fn final_speed(&self) -> f64 {
        (self.initial_speed.powi(2) + 2.0 * self.acceleration * self.distance)
            .max(0.0)
            .sqrt()
    }

    /// Duration of the block.
    ///
    /// A zero-acceleration, zero-speed block is only ever a zero-distance
    /// placeholder, for which the duration is zero.
    ///
    /// Units: seconds
    pub fn time(&self) -> f64 {
        if self.acceleration != 0.0 {
            (self.final_speed() - self.initial_speed) / self.acceleration
        } else if self.initial_speed > 0.0 {
            self.distance / self.initial_speed
        } else {
            0.0
        }
    }
}

impl Move {
    /// A zero-distance, zero-speed move used to pad the ends of a chain so
    /// every real move has a neighbour to blend against. Dummy moves are
    /// never emitted to the caller.
    pub fn dummy() -> Self {
        Move {
            unit_vector: Coordinates::zero(),
            distance: 0.0,
            max_speed: 0.0,
            blocks: [Block::zero(); 3],
        }
    }

    /// An unblended move: a single cruise block covering the whole leg at
    /// the requested speed, assuming the speed can be reached and left
    /// instantaneously. Physically unrealistic until repaired by blending.
    pub fn unblended(unit_vector: Coordinates, distance: f64, max_speed: f64) -> Self {
        let boundary = Block {
            distance: 0.0,
            initial_speed: max_speed,
            acceleration: 0.0,
        };
        let cruise = Block {
            distance,
            initial_speed: max_speed,
            acceleration: 0.0,
        };

        Move {
            unit_vector,
            distance,
            max_speed,
            blocks: [boundary, cruise, boundary],
        }
    }

    /// True if this is a zero-distance padding move.
    pub fn is_dummy(&self) -> bool {
        self.distance == 0.0
    }

    /// Speed at the start of the move: the initial speed of the first block
    /// which covers any distance, or zero if the move is all padding.
    ///
    /// Units: millimeters/second
    pub fn initial_speed(&self) -> f64 {
        for block in self.blocks.iter() {
            if block.distance > 0.0 {
                return block.initial_speed;
            }
        }

        0.0
    }

    /// Speed at the end of the move: the final speed of the last block which
    /// covers any distance, or zero if the move is all padding.
    ///
    /// Units: millimeters/second
    pub fn final_speed(&self) -> f64 {
        for block in self.blocks.iter().rev() {
            if block.distance > 0.0 {
                return block.final_speed();
            }
        }

        0.0
    }

    /// The number of blocks with a nonzero duration.
    pub fn nonzero_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.time() > 0.0).count()
    }

    /// Total duration of the move.
    ///
    /// Units: seconds
    pub fn total_time(&self) -> f64 {
        self.blocks.iter().map(|b| b.time()).sum()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
