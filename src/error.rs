/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{BuildingId, Floor};

/***************************************/
/*            Error types              */
/***************************************/
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock poisoned")]
    Poisoned,

    #[error("building {0} does not exist")]
    UnknownBuilding(BuildingId),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("building {0} does not exist")]
    UnknownBuilding(BuildingId),

    #[error("floor {floor} is outside building {building} (floors 0..{floors})")]
    InvalidFloor {
        building: BuildingId,
        floor: Floor,
        floors: Floor,
    },

    #[error("no pickup call at floor {pickup} in building {building} is waiting for a destination")]
    NotFound { building: BuildingId, pickup: Floor },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no subscriber is listening on {0}")]
    Disconnected(String),
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error("tick aborted: {0}")]
    Repository(#[from] RepositoryError),
}

pub type TickResult<T> = Result<T, TickError>;
