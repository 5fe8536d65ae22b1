//! Contracts for the external position and input subsystems.
//!
//! The navigation core never touches the screen or the keyboard itself; it
//! reads position estimates through [`PositionProvider`] and drives movement
//! through [`MovementActuator`]. The host wires in real implementations
//! (minimap OCR, input injection) or mocks.

use thiserror::Error;

use crate::core::{Coordinate, Direction};

/// Failure reported by a [`MovementActuator`].
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ActuatorError(pub String);

impl ActuatorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Source of position estimates for the controlled character.
///
/// `sample` returns `None` when no fresh estimate is available (occluded
/// minimap, OCR miss, loading screen). Implementations must return within
/// roughly one sample interval; the control loop does not guard against a
/// provider that blocks forever.
pub trait PositionProvider {
    /// Best current estimate of the character's position, or `None`.
    fn sample(&mut self) -> Option<Coordinate>;
}

/// Sink for movement commands.
///
/// `hold` presses-and-holds the input mapped to `direction`, replacing any
/// previously held direction. `stop` releases everything; calling it while
/// already stopped is a no-op, not an error.
pub trait MovementActuator {
    /// Hold the input for `direction` until the next command.
    fn hold(&mut self, direction: Direction) -> std::result::Result<(), ActuatorError>;

    /// Release all movement inputs.
    fn stop(&mut self) -> std::result::Result<(), ActuatorError>;
}
