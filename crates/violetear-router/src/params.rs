//! Values captured from the request path.
//!
//! Each dynamic segment stores the matched text under its pattern name,
//! and a wildcard stores the absorbed remainder under `*`. Names may
//! repeat (`/:uuid/:uuid`), so values are kept in path order.

use smallvec::SmallVec;

use crate::segment::WILDCARD_PARAM;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Path parameters captured by a successful match.
///
/// # Example
///
/// ```rust
/// use violetear_router::Params;
///
/// let mut params = Params::new();
/// params.push("uuid", "A22314BF-4A90-46C8-948D-5507379BD0DD");
/// params.push("uuid", "4293C253-6C7E-4B01-90F2-18203FAB2AEF");
///
/// assert_eq!(params.get("uuid"), Some("A22314BF-4A90-46C8-948D-5507379BD0DD"));
/// assert_eq!(params.get_all("uuid").count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the first value captured under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value captured under `name`, in path order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.inner
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the remainder absorbed by a wildcard, if any.
    #[must_use]
    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD_PARAM)
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over `(name, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
