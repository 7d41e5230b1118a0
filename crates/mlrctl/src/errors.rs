//! Exit codes for mlrctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when a check found at least one issue
pub const EXIT_ISSUES_FOUND: i32 = 2;

/// Exit code when experiences never became available
pub const EXIT_NOT_READY: i32 = 75;
