//! Stable exit codes for `regen` commands.

/// Command succeeded (and, for `check`, every golden file is current).
pub const OK: i32 = 0;
/// Command failed: scanner error, spawn failure, filesystem or config error.
pub const FAILED: i32 = 1;
/// `regen check` found missing or outdated golden files.
pub const STALE: i32 = 2;
