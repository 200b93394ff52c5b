use thiserror::Error;

use super::{ConfigError, FirerError, ReceiverError, SinkError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("YAML error: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Receiver error: {0}")]
    Receiver(#[from] ReceiverError),
    #[error("Firer error: {0}")]
    Firer(#[from] FirerError),
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn receiver<E>(error: E) -> Self
    where
        E: Into<ReceiverError>,
    {
        error.into().into()
    }

    pub fn firer<E>(error: E) -> Self
    where
        E: Into<FirerError>,
    {
        error.into().into()
    }

    pub fn sink<E>(error: E) -> Self
    where
        E: Into<SinkError>,
    {
        error.into().into()
    }
}
