//! Error types for the simulation.
//!
//! Configuration and lifecycle misuse are surfaced synchronously as typed
//! failures; there is no retry path. A tick either completes fully, or the
//! simulation must be re-initialized.

use std::fmt;

/// Errors surfaced at the simulation's API boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A configuration value failed validation at `new`, `initialize`, or
    /// `tick`. Carries the offending field and the value it held.
    InvalidConfig { field: &'static str, value: f64 },
    /// An operation that requires `initialize` was called first.
    NotInitialized,
    /// A tick is in flight; `finalize_tick` must complete before particle
    /// state is read, another tick starts, or the sim is disposed.
    TickInFlight,
    /// `finalize_tick` was called with no tick in flight.
    NoTickInFlight,
    /// The simulation's storage has already been released.
    Disposed,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig { field, value } => {
                write!(f, "Invalid configuration: `{field}` = {value}; must be positive")
            }
            SimError::NotInitialized => {
                write!(f, "Simulation not initialized. Call `initialize` first.")
            }
            SimError::TickInFlight => {
                write!(f, "A tick is in flight. Call `finalize_tick` before this operation.")
            }
            SimError::NoTickInFlight => {
                write!(f, "`finalize_tick` called with no tick in flight.")
            }
            SimError::Disposed => {
                write!(f, "Simulation storage has been disposed.")
            }
        }
    }
}

impl std::error::Error for SimError {}
