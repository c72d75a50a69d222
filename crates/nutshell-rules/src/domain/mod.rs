//! Pure rules: no I/O, no shared state.

pub mod dice;
pub mod grading;
pub mod outcome;
pub mod roll;
