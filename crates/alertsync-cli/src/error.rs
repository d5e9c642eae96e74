//! CLI error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    User(String),

    #[error(transparent)]
    Config(#[from] alertsync_meta::Error),

    #[error(transparent)]
    Api(#[from] alertsync_api::ApiError),

    #[error(transparent)]
    Core(#[from] alertsync_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl CliError {
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }
}
