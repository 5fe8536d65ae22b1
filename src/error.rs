//! Error types for YatraNav.

use thiserror::Error;

use crate::io::ActuatorError;

/// YatraNav error type.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("unknown waypoint: {0}")]
    UnknownWaypoint(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("actuator fault: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
