//! Shared handles to rewritten resources.

use std::fmt;
use std::sync::Arc;

/// A rewritten (or to-be-rewritten) resource as seen by a slot.
///
/// Slots only need the resulting URL; fetching and content live elsewhere.
pub trait Resource: fmt::Debug + Send + Sync {
    /// Absolute URL the resource is served from.
    fn url(&self) -> &str;
}

/// Shared resource reference. Several slots may point at the same resource.
pub type ResourcePtr = Arc<dyn Resource>;

/// Resource known only by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlResource {
    url: Arc<str>,
}

impl UrlResource {
    pub fn new(url: impl Into<Arc<str>>) -> Self {
        Self { url: url.into() }
    }

    /// Create and wrap in a shared [`ResourcePtr`].
    pub fn shared(url: impl Into<Arc<str>>) -> ResourcePtr {
        Arc::new(Self::new(url))
    }
}

impl Resource for UrlResource {
    #[inline]
    fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for UrlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
