//! Console reporting for tracking runs.

pub mod format;

pub use format::*;
