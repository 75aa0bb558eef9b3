//! Move construction and blending calculations
//!
//! These are pure functions: each blending pass reads only the previous
//! pass's move list and produces a fresh one, so identical inputs always
//! yield identical plans.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::PlanError;
use crate::constraints::SystemConstraints;
use crate::geom::{Axis, Coordinates, MoveTarget};
use crate::profile::{Block, Move, SPEED_TOLERANCE};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a waypoint chain into the initial, unblended move list.
///
/// Each leg becomes a single cruise block at the target's requested speed,
/// assuming speeds can change instantaneously at junctions. Blending repairs
/// that assumption.
///
/// Fails if any target is coincident with the previous waypoint or carries a
/// non-positive speed limit.
pub fn targets_to_moves(
    origin: &Coordinates,
    targets: &[MoveTarget],
) -> Result<Vec<Move>, PlanError> {
    if targets.is_empty() {
        return Err(PlanError::NoTargets);
    }

    let mut moves = Vec::with_capacity(targets.len());
    let mut previous = *origin;

    for (index, target) in targets.iter().enumerate() {
        if target.max_speed <= 0.0 {
            return Err(PlanError::NonPositiveSpeed {
                index,
                speed_mms: target.max_speed,
            });
        }

        let (unit_vector, distance) = previous
            .direction_to(&target.position)
            .ok_or(PlanError::ZeroLengthLeg { index })?;

        moves.push(Move::unblended(unit_vector, distance, target.max_speed));
        previous = target.position;
    }

    Ok(moves)
}

/// Pad a move list with a dummy move at each end, so that the first and last
/// real move have a neighbour to blend against. The robot is at rest before
/// the first move and after the last one.
pub fn dummy_padded(moves: Vec<Move>) -> Vec<Move> {
    let mut padded = Vec::with_capacity(moves.len() + 2);
    padded.push(Move::dummy());
    padded.extend(moves);
    padded.push(Move::dummy());

    padded
}

/// Rebuild the middle move's blocks so its boundary speeds are consistent
/// with its neighbours and the system constraints.
///
/// The calculation is:
///  1. Cap the initial speed by what the left neighbour's final speed
///     allows, per axis (see `boundary_speed_cap`), and the final speed
///     analogously by the right neighbour.
///  2. Clamp whichever boundary speed the binding-axis acceleration cannot
///     reach from the other within the move's distance.
///  3. Find the peak speed reachable between the two boundary speeds, and
///     split the distance into accelerate/cruise/decelerate blocks. When
///     the ramps alone consume the whole distance the profile degenerates
///     to a triangle with a zero-length cruise.
///
/// Inputs are not mutated; a new move is returned.
pub fn build_move(
    middle: &Move,
    left: &Move,
    right: &Move,
    constraints: &SystemConstraints,
) -> Move {
    let acceleration = binding_axis_acceleration(constraints, &middle.unit_vector);

    let mut initial_speed = middle
        .max_speed
        .min(boundary_speed_cap(middle, left.final_speed(), &left.unit_vector, constraints));
    let mut final_speed = middle
        .max_speed
        .min(boundary_speed_cap(middle, right.initial_speed(), &right.unit_vector, constraints));

    // Clamp whichever boundary speed cannot be reached from the other within
    // the available distance. Both clamps keep the sqrt arguments
    // non-negative by construction.
    let two_ad = 2.0 * acceleration * middle.distance;
    if final_speed.powi(2) > initial_speed.powi(2) + two_ad {
        final_speed = (initial_speed.powi(2) + two_ad).sqrt();
    } else if initial_speed.powi(2) > final_speed.powi(2) + two_ad {
        initial_speed = (final_speed.powi(2) + two_ad).sqrt();
    }

    // The largest speed reachable between the two boundary speeds within the
    // distance, limited by the move's own speed ceiling. After the clamps
    // above this is never below either boundary speed.
    let peak_speed = ((two_ad + initial_speed.powi(2) + final_speed.powi(2)) / 2.0)
        .sqrt()
        .min(middle.max_speed);

    let accel_distance =
        ((peak_speed.powi(2) - initial_speed.powi(2)) / (2.0 * acceleration)).max(0.0);
    let decel_distance =
        ((peak_speed.powi(2) - final_speed.powi(2)) / (2.0 * acceleration)).max(0.0);
    let cruise_distance = (middle.distance - accel_distance - decel_distance).max(0.0);

    trace!(
        "build_move: d = {:.3} mm, vi = {:.3}, vp = {:.3}, vf = {:.3} mm/s",
        middle.distance,
        initial_speed,
        peak_speed,
        final_speed
    );

    Move {
        blocks: [
            Block {
                distance: accel_distance,
                initial_speed,
                acceleration,
            },
            Block {
                distance: cruise_distance,
                initial_speed: peak_speed,
                acceleration: 0.0,
            },
            Block {
                distance: decel_distance,
                initial_speed: peak_speed,
                acceleration: -acceleration,
            },
        ],
        ..*middle
    }
}

/// Test whether the padded move list has reached the blending fixed point.
///
/// True iff re-running `build_move` over every middle position would leave
/// every move's boundary speeds unchanged within tolerance.
pub fn all_blended(constraints: &SystemConstraints, moves: &[Move]) -> bool {
    for i in 1..moves.len().saturating_sub(1) {
        let rebuilt = build_move(&moves[i], &moves[i - 1], &moves[i + 1], constraints);

        if (rebuilt.initial_speed() - moves[i].initial_speed()).abs() > SPEED_TOLERANCE
            || (rebuilt.final_speed() - moves[i].final_speed()).abs() > SPEED_TOLERANCE
        {
            return false;
        }
    }

    true
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The cap a neighbour places on one of the move's boundary speeds.
///
/// Evaluated per axis and combined with `min`. For each axis the move
/// actually travels on, the neighbour's boundary speed is resolved onto the
/// axis and compared with the move's own direction of travel:
///  - axis at rest in the neighbour: the axis may jump to its
///    `max_speed_discontinuity` from standstill,
///  - axis keeping its direction: the axis speed may jump by at most
///    `max_speed_discontinuity`,
///  - axis reversing: the axis speed is capped at
///    `max_direction_change_speed_discontinuity`.
fn boundary_speed_cap(
    mv: &Move,
    neighbour_speed: f64,
    neighbour_unit: &Coordinates,
    constraints: &SystemConstraints,
) -> f64 {
    let mut cap = f64::INFINITY;

    for axis in Axis::ALL.iter() {
        let component = mv.unit_vector[*axis];
        if component == 0.0 {
            continue;
        }

        let limits = constraints.axis(*axis);
        let axis_speed = neighbour_speed * neighbour_unit[*axis];

        let axis_cap = if axis_speed == 0.0 {
            limits.max_speed_discontinuity / component.abs()
        } else if axis_speed * component > 0.0 {
            (axis_speed.abs() + limits.max_speed_discontinuity) / component.abs()
        } else {
            limits.max_direction_change_speed_discontinuity / component.abs()
        };

        cap = cap.min(axis_cap);
    }

    cap
}

/// The scalar acceleration along the move's direction such that no axis
/// exceeds its own acceleration limit. The binding axis is the one whose
/// per-axis limit, projected through the unit vector, is most restrictive.
fn binding_axis_acceleration(constraints: &SystemConstraints, unit_vector: &Coordinates) -> f64 {
    let mut acceleration = f64::INFINITY;

    for axis in Axis::ALL.iter() {
        let component = unit_vector[*axis];
        if component == 0.0 {
            continue;
        }

        acceleration =
            acceleration.min(constraints.axis(*axis).max_acceleration / component.abs());
    }

    acceleration
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
