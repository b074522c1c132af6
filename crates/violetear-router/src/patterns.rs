//! Named-pattern registry.
//!
//! Dynamic route segments such as `:uuid` refer to a regular expression by
//! name. The registry owns those expressions. Routes store only the name,
//! so re-registering a name changes how every route that uses it matches
//! from then on.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Result, RouterError};

/// Maps dynamic-segment names to compiled, fully anchored expressions.
///
/// # Example
///
/// ```rust
/// use violetear_router::PatternRegistry;
///
/// let mut patterns = PatternRegistry::new();
/// patterns.register(":id", "[0-9]+").unwrap();
///
/// assert!(patterns.is_match("id", "42"));
/// // Anchored on both ends: a substring match is not enough.
/// assert!(!patterns.is_match("id", "42a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: HashMap<String, Regex>,
}

impl PatternRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `pattern` and stores it under `name`.
    ///
    /// The name may carry the route sigil (`":uuid"` and `"uuid"` are the
    /// same entry). Registering an existing name replaces its expression.
    /// On error the previous entry, if any, is left in place.
    pub fn register(&mut self, name: &str, pattern: &str) -> Result<()> {
        let name = pattern_name(name);
        let invalid = |source| RouterError::InvalidRegex {
            name: name.to_string(),
            source,
        };

        // Validate the expression as given before wrapping it, so that
        // input like `a)(` is rejected rather than balanced by the wrapper.
        Regex::new(pattern).map_err(invalid)?;
        let anchored = Regex::new(&anchor(pattern)).map_err(invalid)?;

        if self.patterns.insert(name.to_string(), anchored).is_some() {
            tracing::debug!(name, pattern, "replaced named pattern");
        } else {
            tracing::debug!(name, pattern, "registered named pattern");
        }
        Ok(())
    }

    /// Returns the anchored expression registered under `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(pattern_name(name))
    }

    /// Returns true if `name` has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(pattern_name(name))
    }

    /// Tests a whole path segment against the pattern named `name`.
    ///
    /// Unregistered names accept any non-empty segment.
    #[must_use]
    pub fn is_match(&self, name: &str, segment: &str) -> bool {
        match self.lookup(name) {
            Some(regex) => regex.is_match(segment),
            None => !segment.is_empty(),
        }
    }

    /// Returns the registered names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Wraps `pattern` so it must span a whole segment.
///
/// The wrapper is applied to the parsed form rather than the source text:
/// a verbose-mode pattern ending in a `#` comment would otherwise swallow
/// the closing `)$`.
fn anchor(pattern: &str) -> String {
    match regex_syntax::parse(pattern) {
        Ok(hir) => format!("^(?:{hir})$"),
        Err(_) => format!("^(?:{pattern})$"),
    }
}

/// Strips the optional `:` sigil from a pattern name.
pub(crate) fn pattern_name(name: &str) -> &str {
    name.strip_prefix(':').unwrap_or(name)
}
