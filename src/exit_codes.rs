//! Exit code constants for the tether CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid state)
//! - 2: Configuration error (explicit binary override missing)
//! - 3: Discovery failure (no agent binary found anywhere)
//! - 4: Git operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable config, or invalid state.
pub const USER_ERROR: i32 = 1;

/// Configuration error: an explicitly configured binary path does not exist.
pub const CONFIG_FAILURE: i32 = 2;

/// Discovery failure: no binary found via override or fallback search.
pub const DISCOVERY_FAILURE: i32 = 3;

/// Git operation failure while locating the repository root.
pub const GIT_FAILURE: i32 = 4;
