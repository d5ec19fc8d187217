use thiserror::Error;

#[derive(Debug, Error)]
pub enum LivegenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Upload error: {0}")]
    UploadError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for LivegenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LivegenError::ResponseError(err.to_string())
        } else {
            LivegenError::RequestError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LivegenError {
    fn from(err: serde_json::Error) -> Self {
        LivegenError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LivegenError>;
