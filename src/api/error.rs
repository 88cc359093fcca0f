use thiserror::Error;

/// Failure talking to the console backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The backend answered with a non-2xx status
    #[error("backend returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body was not the expected JSON
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    /// Text shown to the user in a blocking alert
    ///
    /// Server errors carry the backend's message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
