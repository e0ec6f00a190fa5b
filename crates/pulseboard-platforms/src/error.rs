//! Error types for platform connectors

use pulseboard_core::models::Platform;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("{platform} API error ({status}): {message}")]
    Api {
        platform: Platform,
        status: u16,
        message: String,
    },

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

pub type Result<T> = std::result::Result<T, Error>;
