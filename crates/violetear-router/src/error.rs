//! Registration error types.
//!
//! Only registration can fail. Request-time outcomes such as "not found"
//! or "method not allowed" are values of [`Outcome`](crate::Outcome), not errors.

use thiserror::Error;

/// Errors returned when registering named patterns or routes.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The regular expression given for a named pattern does not compile.
    #[error("invalid regular expression for pattern `{name}`: {source}")]
    InvalidRegex {
        /// Name the expression was registered under.
        name: String,
        /// Underlying compilation error.
        #[source]
        source: regex::Error,
    },

    /// A `*` segment appears before the end of a route pattern.
    #[error("wildcard must be the last segment in route `{pattern}`")]
    WildcardNotLast {
        /// The offending route pattern.
        pattern: String,
    },

    /// A `:` segment without a pattern name.
    #[error("dynamic segment without a name in route `{pattern}`")]
    EmptyParamName {
        /// The offending route pattern.
        pattern: String,
    },

    /// A token in a method list is not a valid HTTP method.
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),
}

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RouterError>;
