use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("candidate outputs disagree: {0}")]
    Mismatch(String),
    #[error("malformed statistics: {0}")]
    Stats(String),
    #[error("chart error: {0}")]
    Chart(String),
}

impl BenchError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        BenchError::Config(msg.into())
    }

    pub fn mismatch<T: Into<String>>(msg: T) -> Self {
        BenchError::Mismatch(msg.into())
    }

    pub fn stats<T: Into<String>>(msg: T) -> Self {
        BenchError::Stats(msg.into())
    }

    pub fn chart<T: Into<String>>(msg: T) -> Self {
        BenchError::Chart(msg.into())
    }
}
