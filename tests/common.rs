//! Test doubles for the navigation control loop.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use yatra_nav::{ActuatorError, Coordinate, Direction, MovementActuator, PositionProvider};

/// Position provider that replays a scripted sample sequence, then repeats
/// the final entry forever.
pub struct ScriptedProvider {
    script: VecDeque<Option<Coordinate>>,
    last: Option<Option<Coordinate>>,
}

impl ScriptedProvider {
    pub fn new(samples: Vec<Option<Coordinate>>) -> Self {
        Self {
            script: samples.into(),
            last: None,
        }
    }

    /// Provider that always reports the same position.
    pub fn fixed(position: Coordinate) -> Self {
        Self::new(vec![Some(position)])
    }

    /// Provider that never has a position estimate.
    pub fn blind() -> Self {
        Self::new(vec![None])
    }
}

impl PositionProvider for ScriptedProvider {
    fn sample(&mut self) -> Option<Coordinate> {
        match self.script.pop_front() {
            Some(sample) => {
                self.last = Some(sample.clone());
                sample
            }
            None => self.last.clone().flatten(),
        }
    }
}

/// Commands observed by a [`RecordingActuator`].
#[derive(Debug, Default)]
pub struct CommandLog {
    pub holds: Vec<Direction>,
    pub stops: u32,
}

/// Actuator that records every command; inspect through the paired
/// [`ActuatorProbe`] after the navigator is done with it.
pub struct RecordingActuator {
    log: Arc<Mutex<CommandLog>>,
    fail_holds: bool,
}

#[derive(Clone)]
pub struct ActuatorProbe {
    log: Arc<Mutex<CommandLog>>,
}

impl RecordingActuator {
    pub fn new() -> (Self, ActuatorProbe) {
        let log = Arc::new(Mutex::new(CommandLog::default()));
        (
            Self {
                log: Arc::clone(&log),
                fail_holds: false,
            },
            ActuatorProbe { log },
        )
    }

    /// Variant whose `hold` calls all fail (stop still succeeds).
    pub fn failing() -> (Self, ActuatorProbe) {
        let (mut actuator, probe) = Self::new();
        actuator.fail_holds = true;
        (actuator, probe)
    }
}

impl MovementActuator for RecordingActuator {
    fn hold(&mut self, direction: Direction) -> Result<(), ActuatorError> {
        if self.fail_holds {
            return Err(ActuatorError::new("input injection rejected"));
        }
        self.log.lock().holds.push(direction);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.log.lock().stops += 1;
        Ok(())
    }
}

impl ActuatorProbe {
    pub fn holds(&self) -> Vec<Direction> {
        self.log.lock().holds.clone()
    }

    pub fn stops(&self) -> u32 {
        self.log.lock().stops
    }
}

/// Sample helper.
pub fn at(x: f64, y: f64) -> Option<Coordinate> {
    Some(Coordinate::new(x, y))
}
