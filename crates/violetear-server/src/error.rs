//! Server error types.

use thiserror::Error;
use violetear_router::RouterError;

/// Errors surfaced by the dispatch boundary and the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address is invalid or could not be bound.
    #[error("Bind error: {0}")]
    Bind(String),

    /// I/O failure on the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as given
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Route or pattern registration failed.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServerError::Bind("Invalid address 'nope'".to_string());
        assert_eq!(err.to_string(), "Bind error: Invalid address 'nope'");

        let err = ServerError::InvalidHeader {
            name: "bad header".to_string(),
            reason: "invalid HTTP header name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid header 'bad header': invalid HTTP header name"
        );
    }

    #[test]
    fn test_router_error_is_transparent() {
        let err: ServerError = RouterError::InvalidMethod("FETCH".to_string()).into();
        assert_eq!(
            err.to_string(),
            RouterError::InvalidMethod("FETCH".to_string()).to_string()
        );
        assert!(matches!(err, ServerError::Router(_)));
    }
}
