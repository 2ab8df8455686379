use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown incident type '{name}'")]
    UnknownIncidentType { name: String },

    #[error("Invalid priority {value}: expected 1..=3")]
    InvalidPriority { value: u8 },

    #[error("Invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    #[error("Team '{name}' not found")]
    TeamNotFound { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, DispatchError>;
