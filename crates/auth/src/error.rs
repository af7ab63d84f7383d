use thiserror::Error;

/// Errors raised while talking to the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The auth service rejected the request.
    #[error("Auth service error ({status}): {message}")]
    Service {
        /// HTTP status returned by the auth service.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The auth service returned a body we could not interpret.
    #[error("Invalid auth service response: {0}")]
    InvalidResponse(String),
}
