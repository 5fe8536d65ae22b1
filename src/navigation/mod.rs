//! Navigation state machine: status types, per-attempt state, and the
//! control loop.

pub mod navigator;
pub mod state;

pub use navigator::{NavTarget, Navigator};
pub use state::{NavOutcome, NavStatus, StatusView};
