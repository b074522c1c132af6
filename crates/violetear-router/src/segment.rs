//! Route pattern tokenizer.
//!
//! A route pattern is a `/`-separated list of segments:
//!
//! - `users` matches the literal text `users`
//! - `:uuid` matches one segment accepted by the named pattern `uuid`
//! - `*` matches every remaining segment and must come last

use crate::error::{Result, RouterError};

/// Name under which a wildcard's absorbed remainder is captured.
pub const WILDCARD_PARAM: &str = "*";

/// One segment of a tokenized route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text compared byte for byte.
    Static(String),
    /// A segment constrained by the named pattern.
    Dynamic(String),
    /// Absorbs the rest of the path.
    Wildcard,
}

impl Segment {
    /// Returns the literal text, the pattern name, or `*`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(text) => text,
            Self::Dynamic(name) => name,
            Self::Wildcard => WILDCARD_PARAM,
        }
    }
}

/// Splits a route pattern into segments.
///
/// One leading and one trailing `/` are ignored, as are empty segments.
/// `""` and `"/"` produce no segments and address the root.
///
/// # Example
///
/// ```rust
/// use violetear_router::{tokenize, Segment};
///
/// let segments = tokenize("/files/:name/*").unwrap();
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Static("files".into()),
///         Segment::Dynamic("name".into()),
///         Segment::Wildcard,
///     ]
/// );
/// ```
pub fn tokenize(pattern: &str) -> Result<Vec<Segment>> {
    let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let mut parts = trimmed.split('/').filter(|s| !s.is_empty()).peekable();
    let mut segments = Vec::new();

    while let Some(part) = parts.next() {
        let segment = if part == WILDCARD_PARAM {
            if parts.peek().is_some() {
                return Err(RouterError::WildcardNotLast {
                    pattern: pattern.to_string(),
                });
            }
            Segment::Wildcard
        } else if let Some(name) = part.strip_prefix(':') {
            if name.is_empty() {
                return Err(RouterError::EmptyParamName {
                    pattern: pattern.to_string(),
                });
            }
            Segment::Dynamic(name.to_string())
        } else {
            Segment::Static(part.to_string())
        };
        segments.push(segment);
    }

    Ok(segments)
}
