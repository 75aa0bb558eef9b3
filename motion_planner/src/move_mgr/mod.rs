//! Move manager module
//!
//! The move manager owns the planning state for one motion request: the
//! origin, the pending target chain and the iterative blending loop which
//! turns the chain into physically realisable, time-parameterised moves.
//!
//! The blending loop slides a three-move window over the chain (padded at
//! both ends with zero-speed dummy moves) and rebuilds each middle move so
//! its boundary speeds are consistent with its neighbours and the per-axis
//! constraints, repeating until a fixed point is reached or the iteration
//! budget is exhausted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_blend;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc_blend::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The default number of blending passes to attempt before reporting the
/// plan as unconverged.
pub const DEFAULT_ITERATION_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised during initialisation of the module.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Cannot load the parameter file: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Parameter file contains invalid constraints: {0}")]
    InvalidConstraints(#[from] crate::constraints::ConstraintError),
}

/// Errors raised when a motion plan is requested with invalid inputs.
///
/// These are caller bugs and fail fast. An unconverged plan is *not* an
/// error, it is reported through [`Plan::converged`].
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("No origin set, call `set_origin` before planning")]
    OriginNotSet,

    #[error("No targets added, call `add_targets` before planning")]
    NoTargets,

    #[error("No system constraints loaded, initialise the module first")]
    ConstraintsNotSet,

    #[error("Target {index} is coincident with the previous waypoint")]
    ZeroLengthLeg { index: usize },

    #[error("Target {index} has a non-positive speed limit ({speed_mms} mm/s)")]
    NonPositiveSpeed { index: usize, speed_mms: f64 },
}
