//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the software installation.
///
/// The root is taken from the `LH_SW_ROOT` environment variable, which must
/// be set before any executable is run. Parameter files are resolved
/// relative to this directory.
pub fn get_lh_sw_root() -> Result<PathBuf, std::env::VarError> {
    let root = std::env::var("LH_SW_ROOT")?;

    Ok(PathBuf::from(root))
}
