use thiserror::Error;

// ---------------------------------------------------------------------------
// Simulation (integrator) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// The solver could not meet its tolerance or produced a non-finite state.
    /// No partial trajectory is returned alongside this error.
    #[error("integration failed at t={time:.3} s: {reason}")]
    IntegrationFailure { time: f64, reason: String },

    #[error("invalid mission configuration: {0}")]
    InvalidConfig(String),
}

// ---------------------------------------------------------------------------
// Vehicle link errors (raised by VehicleLink implementations)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinkError {
    #[error("vehicle link disconnected: {0}")]
    Disconnected(String),

    /// The link is up but this reading has no value right now.
    #[error("reading unavailable: {0}")]
    Unavailable(&'static str),
}

// ---------------------------------------------------------------------------
// Guidance errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("interface disconnect: {0}")]
    InterfaceDisconnect(String),

    /// Recovered locally by the controller; surfaced in logs and the event list.
    #[error("engine not found on vehicle: {0}")]
    EngineNotFound(String),

    #[error("required telemetry unavailable: {0}")]
    TelemetryUnavailable(&'static str),

    #[error("telemetry recorder failed: {0}")]
    Recorder(#[from] RecorderError),
}

impl From<LinkError> for GuidanceError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Disconnected(msg) => GuidanceError::InterfaceDisconnect(msg),
            LinkError::Unavailable(field) => GuidanceError::TelemetryUnavailable(field),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration and dataset loading
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid mission configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is malformed: {0}")]
    Malformed(String),
}
