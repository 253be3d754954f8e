//! Stable exit codes for the agent CLI.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed (invalid config, skill error, I/O error).
pub const FAILURE: i32 = 1;
/// Input was blank, so there was nothing to segment or display.
pub const NO_OUTPUT: i32 = 2;
