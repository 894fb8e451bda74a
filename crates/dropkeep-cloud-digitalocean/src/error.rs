//! DigitalOcean provider error types

use dropkeep_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigitalOceanError {
    #[error("DigitalOcean rejected the API token: {0}")]
    Unauthorized(String),

    #[error("Droplet is already powered off: {0}")]
    AlreadyPoweredOff(String),

    #[error("DigitalOcean API error ({status} {id}): {message}")]
    Api {
        status: u16,
        id: String,
        message: String,
    },

    #[error("Droplet creation response carried no create action")]
    MissingCreateAction,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<DigitalOceanError> for CloudError {
    fn from(err: DigitalOceanError) -> Self {
        match err {
            DigitalOceanError::Unauthorized(message) => CloudError::AuthenticationFailed(message),
            DigitalOceanError::AlreadyPoweredOff(message) => CloudError::AlreadyInState(message),
            DigitalOceanError::Api {
                status, message, ..
            } => CloudError::ApiError { status, message },
            err @ DigitalOceanError::MissingCreateAction => CloudError::ApiError {
                status: 202,
                message: err.to_string(),
            },
            DigitalOceanError::Http(e) => CloudError::Http(e.to_string()),
            DigitalOceanError::JsonError(e) => CloudError::Json(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DigitalOceanError>;
