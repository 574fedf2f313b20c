use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Operand lengths differ: left has {left} elements, right has {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("Failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EvalError {
    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Renders a `JoinHandle::join` panic payload. `panic!` with a literal
    /// carries `&str`, formatted panics and arithmetic traps carry `String`.
    pub fn worker_panicked(worker: usize, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::WorkerPanicked { worker, message }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. })
    }
}
