//! URL relativity classification and re-expression.
//!
//! A document may reference the same resource in several forms:
//!
//! | Relativity     | Example                          |
//! |----------------|----------------------------------|
//! | `Absolute`     | `https://example.com/a/img.png`  |
//! | `NetPath`      | `//example.com/a/img.png`        |
//! | `AbsolutePath` | `/a/img.png`                     |
//! | `Relative`     | `img.png`, `../b/img.png`        |
//!
//! The form is recorded before a rewrite so the rewritten (absolute) URL can
//! be written back the way the author wrote it.

use url::{Position, Url};

/// Syntactic form of a URL as written in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UrlRelativity {
    /// Scheme and authority present.
    Absolute,
    /// Protocol-relative (`//host/path`).
    NetPath,
    /// Path from the site root (`/path`).
    AbsolutePath,
    /// Relative to the document's base directory. Also used for missing values.
    #[default]
    Relative,
}

impl UrlRelativity {
    /// Classify a URL value. A missing value counts as relative.
    pub fn find(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return Self::Relative;
        };

        if Url::parse(value).is_ok() {
            Self::Absolute
        } else if value.starts_with("//") {
            Self::NetPath
        } else if value.starts_with('/') {
            Self::AbsolutePath
        } else {
            Self::Relative
        }
    }

    /// Re-express `url` in this relativity class against `base`.
    ///
    /// Falls back to a less relative form whenever the requested one would
    /// not resolve back to `url` (different scheme or origin, or a relative
    /// remainder that a browser would misread). A `Relative` URL outside the
    /// base directory is written path-absolute rather than with `../`
    /// segments. Whatever is returned resolves against `base` to `url`;
    /// otherwise the full URL is written.
    pub fn relativize(self, url: &Url, base: &Url) -> String {
        match self.shortest_form(url, base) {
            Some(out) if base.join(&out).is_ok_and(|resolved| resolved == *url) => out,
            _ => url.to_string(),
        }
    }

    /// Candidate output for `relativize`, before the round-trip check.
    fn shortest_form(self, url: &Url, base: &Url) -> Option<String> {
        if self == Self::Absolute || !url.has_host() || url.scheme() != base.scheme() {
            return None;
        }

        if self == Self::NetPath {
            // Drop "scheme:" and keep "//authority/path..."
            return Some(url.as_str()[url.scheme().len() + 1..].to_string());
        }

        // Remaining forms drop the authority, which must match the base's.
        if url[Position::BeforeUsername..Position::AfterPort]
            != base[Position::BeforeUsername..Position::AfterPort]
        {
            return None;
        }

        let absolute_path = &url[Position::BeforePath..];
        if self == Self::AbsolutePath {
            return Some(absolute_path.to_string());
        }

        let base_path = base.path();
        let base_dir = match base_path.rfind('/') {
            Some(idx) => &base_path[..=idx],
            None => "/",
        };

        match absolute_path.strip_prefix(base_dir) {
            Some(relative) if !is_ambiguous_relative(relative) => Some(relative.to_string()),
            _ => Some(absolute_path.to_string()),
        }
    }
}

/// Check whether a relative reference would resolve somewhere other than intended.
///
/// - empty or query/fragment-only: resolves against the base leaf, not its directory
/// - leading `/`: becomes an absolute path
/// - `:` in the first segment: parses as a scheme
fn is_ambiguous_relative(relative: &str) -> bool {
    if relative.is_empty() || relative.starts_with(['/', '?', '#']) {
        return true;
    }
    let first_segment = relative.split(['/', '?', '#']).next().unwrap_or_default();
    first_segment.contains(':')
}

// ============================================================================
// Tests
// ============================================================================
