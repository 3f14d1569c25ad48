pub mod build;
pub mod check;
pub mod doctor;
pub mod output;

/// Ran to completion.
pub const EXIT_OK: i32 = 0;
/// Fatal error before or during the run.
pub const EXIT_FAILURE: i32 = 1;
/// Ran to completion with problems while `--strict` was set.
pub const EXIT_PROBLEMS: i32 = 2;
