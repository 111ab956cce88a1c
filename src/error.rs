// Error types for input validation and configuration loading

use thiserror::Error;

use crate::types::Direction;

/// Rejections raised while building a turn snapshot from a request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("snake '{0}' is not on the board")]
    MissingSnake(String),

    #[error("snake '{0}' has an empty body")]
    EmptyBody(String),
}

/// Failures while reading Snake.toml
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failures while loading or replaying a JSONL turn log
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("turn {0} not found in log file")]
    TurnNotFound(i32),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("turn {turn}: expected one of {expected:?}, but got {actual}")]
    UnexpectedMove {
        turn: i32,
        expected: Vec<Direction>,
        actual: Direction,
    },
}
