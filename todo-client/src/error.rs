/// Error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or undecodable response body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("{status} {error}: {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    /// Endpoint needs a token but none was set
    #[error("Not logged in")]
    MissingToken,
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
