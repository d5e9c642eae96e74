//! Collaborator error type

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The platform rejected the request
    #[error("API returned {status} for {endpoint}: {message}")]
    Status {
        status: u16,
        endpoint: String,
        message: String,
    },

    /// The request never got a usable response
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// The addressed resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
