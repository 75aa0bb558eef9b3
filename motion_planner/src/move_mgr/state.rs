//! Implementations for the MoveManager state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::{all_blended, build_move, dummy_padded, targets_to_moves};
use super::{InitError, Params, PlanError};
use crate::constraints::SystemConstraints;
use crate::geom::{Coordinates, MoveTarget};
use crate::profile::Move;
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Move manager state.
///
/// Owns the origin and pending target chain between planning calls. The
/// origin and targets accumulate through [`MoveManager::set_origin`] and
/// [`MoveManager::add_targets`] until [`MoveManager::reset`] is called;
/// everything else is rebuilt fresh on each [`MoveManager::plan_motion`].
#[derive(Default)]
pub struct MoveManager {
    constraints: Option<SystemConstraints>,

    origin: Option<Coordinates>,

    targets: Vec<MoveTarget>,
}

/// A planning request, as produced by the protocol dispatcher.
#[derive(Clone, Debug)]
pub struct PlanRequest {
    /// The current position of the gantry.
    pub origin: Coordinates,

    /// The waypoint chain to plan through.
    pub targets: Vec<MoveTarget>,

    /// The maximum number of blending passes to run.
    pub iteration_limit: usize,
}

/// The outcome of one planning call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Plan {
    /// True if the blend log's last entry reached the blending fixed point.
    /// If false the last entry is the best available trajectory and the
    /// caller decides whether to use, retry or reject it.
    pub converged: bool,

    /// The move list produced by each blending pass, dummy moves stripped.
    /// The last entry is the final trajectory.
    pub blend_log: Vec<Vec<Move>>,
}

/// The status report containing monitoring quantities for one planning call.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatusReport {
    /// Whether the plan converged within the iteration limit.
    pub converged: bool,

    /// The number of blending passes run.
    pub passes_run: usize,

    /// The number of moves in the final trajectory.
    pub num_moves: usize,

    /// Total duration of the final trajectory.
    ///
    /// Units: seconds
    pub total_duration_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveManager {
    /// Create a manager with an already-validated constraint set.
    pub fn new(constraints: SystemConstraints) -> Self {
        MoveManager {
            constraints: Some(constraints),
            origin: None,
            targets: vec![],
        }
    }

    /// Clear the origin and pending targets. Constraints are kept.
    pub fn reset(&mut self) {
        self.origin = None;
        self.targets.clear();
    }

    /// Set the starting position for the next plan.
    pub fn set_origin(&mut self, point: Coordinates) {
        self.origin = Some(point);
    }

    /// Append targets to the pending chain. Does not plan.
    pub fn add_targets(&mut self, targets: &[MoveTarget]) {
        self.targets.extend_from_slice(targets);
    }

    /// Plan the motion through the pending target chain.
    ///
    /// Builds the initial unblended move list, then runs up to
    /// `iteration_limit` blending passes, each rebuilding every move from
    /// the previous pass's list, until the chain reaches its fixed point.
    ///
    /// Returns the blend log with one entry per pass; the last entry is the
    /// final trajectory. A plan that failed to converge is returned with
    /// [`Plan::converged`] false, not as an error.
    pub fn plan_motion(&mut self, iteration_limit: usize) -> Result<Plan, PlanError> {
        let origin = self.origin.ok_or(PlanError::OriginNotSet)?;
        let constraints = self.constraints.ok_or(PlanError::ConstraintsNotSet)?;

        if self.targets.is_empty() {
            return Err(PlanError::NoTargets);
        }

        let moves = targets_to_moves(&origin, &self.targets)?;
        let mut padded = dummy_padded(moves);

        let mut blend_log: Vec<Vec<Move>> = Vec::with_capacity(iteration_limit);
        let mut converged = false;

        for pass in 0..iteration_limit {
            // Each pass reads only the previous pass's list, so the
            // per-window rebuilds are order-independent
            let mut next = padded.clone();
            for i in 1..padded.len() - 1 {
                next[i] = build_move(&padded[i], &padded[i - 1], &padded[i + 1], &constraints);
            }

            converged = all_blended(&constraints, &next);

            debug!(
                "Blend pass {}: {} moves, blended: {}",
                pass + 1,
                next.len() - 2,
                converged
            );

            blend_log.push(next[1..next.len() - 1].to_vec());
            padded = next;

            if converged {
                break;
            }
        }

        Ok(Plan {
            converged,
            blend_log,
        })
    }
}

impl Plan {
    /// The final trajectory: the last blending pass's move list.
    pub fn moves(&self) -> &[Move] {
        self.blend_log.last().map(|p| p.as_slice()).unwrap_or(&[])
    }
}

impl State for MoveManager {
    type InitData = &'static str;
    type InitError = InitError;

    type InputData = PlanRequest;
    type OutputData = Plan;
    type StatusReport = StatusReport;
    type ProcError = PlanError;

    /// Initialise the MoveManager module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = util::params::load(init_data)?;

        self.constraints = Some(params.to_constraints()?);

        Ok(())
    }

    /// Plan one motion request.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.reset();
        self.set_origin(input_data.origin);
        self.add_targets(&input_data.targets);

        let plan = self.plan_motion(input_data.iteration_limit)?;

        let report = StatusReport {
            converged: plan.converged,
            passes_run: plan.blend_log.len(),
            num_moves: plan.moves().len(),
            total_duration_s: plan.moves().iter().map(Move::total_time).sum(),
        };

        Ok((plan, report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::constraints::AxisConstraints;
    use crate::geom::NUM_AXES;
    use crate::profile::SPEED_TOLERANCE;

    fn constraints(accel: f64, msd: f64, dcd: f64) -> SystemConstraints {
        SystemConstraints::new(
            [AxisConstraints {
                max_acceleration: accel,
                max_speed_discontinuity: msd,
                max_direction_change_speed_discontinuity: dcd,
            }; NUM_AXES],
        )
        .unwrap()
    }

    fn target(x: f64, y: f64, max_speed: f64) -> MoveTarget {
        MoveTarget {
            position: Coordinates::new(x, y, 0.0, 0.0),
            max_speed,
        }
    }

    #[test]
    fn test_single_move_converges_first_pass() {
        let mut mgr = MoveManager::new(constraints(500.0, 15.0, 5.0));
        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[target(200.0, 0.0, 50.0)]);

        let plan = mgr.plan_motion(super::super::DEFAULT_ITERATION_LIMIT).unwrap();

        assert!(plan.converged);
        assert_eq!(plan.blend_log.len(), 1);
        assert_eq!(plan.moves().len(), 1);

        let mv = &plan.moves()[0];

        // Ample distance: the peak reaches the requested speed
        assert!((mv.blocks[1].initial_speed - 50.0).abs() < SPEED_TOLERANCE);
        assert!((mv.initial_speed() - 15.0).abs() < SPEED_TOLERANCE);
        assert!((mv.final_speed() - 15.0).abs() < SPEED_TOLERANCE);

        let total: f64 = mv.blocks.iter().map(|b| b.distance).sum();
        assert!((total - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_corner_junction_bound_respected() {
        let msd = 15.0;
        let mut mgr = MoveManager::new(constraints(500.0, msd, 5.0));
        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[target(100.0, 0.0, 50.0), target(100.0, 80.0, 40.0)]);

        let plan = mgr.plan_motion(10).unwrap();
        assert!(plan.converged);

        let moves = plan.moves();
        assert_eq!(moves.len(), 2);

        // At an orthogonal corner each axis starts from rest, so both
        // junction speeds are bounded by the plain discontinuity limit
        assert!(moves[0].final_speed() <= msd + SPEED_TOLERANCE);
        assert!(moves[1].initial_speed() <= msd + SPEED_TOLERANCE);

        // Per-axis jump across the junction never exceeds the limit
        for axis in crate::geom::Axis::ALL.iter() {
            let left = moves[0].final_speed() * moves[0].unit_vector[*axis];
            let right = moves[1].initial_speed() * moves[1].unit_vector[*axis];
            assert!((left - right).abs() <= msd + SPEED_TOLERANCE);
        }
    }

    #[test]
    fn test_full_reversal_bounded() {
        let dcd = 5.0;
        let mut mgr = MoveManager::new(constraints(500.0, 15.0, dcd));
        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[target(100.0, 0.0, 50.0), target(0.0, 0.0, 50.0)]);

        let plan = mgr.plan_motion(10).unwrap();
        assert!(plan.converged);

        let moves = plan.moves();

        // The shared junction speed is driven down to the direction change
        // bound, never negative
        assert!(moves[0].final_speed() <= dcd + SPEED_TOLERANCE);
        assert!(moves[1].initial_speed() <= dcd + SPEED_TOLERANCE);
        assert!(moves[0].final_speed() >= 0.0);
        assert!(moves[1].initial_speed() >= 0.0);
    }

    #[test]
    fn test_determinism() {
        let targets = [target(50.0, 0.0, 40.0), target(50.0, 50.0, 30.0), target(0.0, 50.0, 40.0)];

        let mut mgr_a = MoveManager::new(constraints(300.0, 10.0, 2.0));
        mgr_a.set_origin(Coordinates::zero());
        mgr_a.add_targets(&targets);

        let mut mgr_b = MoveManager::new(constraints(300.0, 10.0, 2.0));
        mgr_b.set_origin(Coordinates::zero());
        mgr_b.add_targets(&targets);

        let plan_a = mgr_a.plan_motion(10).unwrap();
        let plan_b = mgr_b.plan_motion(10).unwrap();

        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn test_non_convergence_reported() {
        // A very low acceleration makes boundary speeds cascade from the
        // ends of the chain inwards, one junction per pass, so a single pass
        // cannot reach the fixed point
        let mut mgr = MoveManager::new(constraints(10.0, 5.0, 1.0));
        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[
            target(10.0, 0.0, 50.0),
            target(20.0, 0.0, 50.0),
            target(30.0, 0.0, 50.0),
        ]);

        let plan = mgr.plan_motion(1).unwrap();

        assert!(!plan.converged);
        assert_eq!(plan.blend_log.len(), 1);
        assert!(!plan.moves().is_empty());

        // Given a real budget the same chain converges
        mgr = MoveManager::new(constraints(10.0, 5.0, 1.0));
        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[
            target(10.0, 0.0, 50.0),
            target(20.0, 0.0, 50.0),
            target(30.0, 0.0, 50.0),
        ]);
        let plan = mgr.plan_motion(10).unwrap();
        assert!(plan.converged);
        assert!(plan.blend_log.len() > 1);
    }

    #[test]
    fn test_input_rejection() {
        let mut mgr = MoveManager::new(constraints(500.0, 15.0, 5.0));

        // Origin not set
        assert!(matches!(mgr.plan_motion(10), Err(PlanError::OriginNotSet)));

        // No targets
        mgr.set_origin(Coordinates::zero());
        assert!(matches!(mgr.plan_motion(10), Err(PlanError::NoTargets)));

        // Coincident waypoints
        mgr.add_targets(&[target(10.0, 0.0, 50.0), target(10.0, 0.0, 50.0)]);
        assert!(matches!(
            mgr.plan_motion(10),
            Err(PlanError::ZeroLengthLeg { index: 1 })
        ));

        // No constraints loaded
        let mut bare = MoveManager::default();
        bare.set_origin(Coordinates::zero());
        bare.add_targets(&[target(10.0, 0.0, 50.0)]);
        assert!(matches!(
            bare.plan_motion(10),
            Err(PlanError::ConstraintsNotSet)
        ));
    }

    #[test]
    fn test_reset() {
        let mut mgr = MoveManager::new(constraints(500.0, 15.0, 5.0));
        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[target(10.0, 0.0, 50.0)]);

        mgr.reset();

        assert!(matches!(mgr.plan_motion(10), Err(PlanError::OriginNotSet)));
    }

    #[test]
    fn test_module_proc() {
        let mut mgr = MoveManager::new(constraints(500.0, 15.0, 5.0));

        let request = PlanRequest {
            origin: Coordinates::zero(),
            targets: vec![target(100.0, 0.0, 50.0)],
            iteration_limit: super::super::DEFAULT_ITERATION_LIMIT,
        };

        let (plan, report) = mgr.proc(&request).unwrap();

        assert!(report.converged);
        assert_eq!(report.num_moves, 1);
        assert_eq!(report.passes_run, plan.blend_log.len());
        assert!(report.total_duration_s > 0.0);
    }

    #[test]
    fn test_module_init_from_params() {
        // Point the software root at a temp dir holding a parameter file
        let root = std::env::temp_dir().join("lh_sw_init_test");
        std::fs::create_dir_all(root.join("params")).unwrap();
        std::fs::write(
            root.join("params/move_mgr.toml"),
            "max_acceleration_mms2 = [500.0, 500.0, 100.0, 50.0]\n\
             max_speed_discontinuity_mms = [15.0, 15.0, 10.0, 5.0]\n\
             max_direction_change_speed_discontinuity_mms = [5.0, 5.0, 2.0, 1.0]\n",
        )
        .unwrap();
        std::env::set_var("LH_SW_ROOT", &root);

        let mut mgr = MoveManager::default();
        mgr.init("move_mgr.toml").unwrap();

        mgr.set_origin(Coordinates::zero());
        mgr.add_targets(&[target(50.0, 0.0, 30.0)]);
        assert!(mgr.plan_motion(10).unwrap().converged);
    }
}
