//! `[rewrite]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [rewrite]
//! preserve_url_relativity = true   # Keep rewritten URLs in their original form
//! ```

use serde::Deserialize;

/// Options consulted by slots when writing a rewritten resource back.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RewriteOptions {
    /// Re-express rewritten URLs in the relativity class the document
    /// originally used (`img/a.png` stays relative, `//cdn/a.png` stays
    /// protocol-relative). When disabled, the absolute URL is written.
    pub preserve_url_relativity: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            preserve_url_relativity: true,
        }
    }
}

impl RewriteOptions {
    /// Options that always write absolute URLs.
    pub const fn absolute() -> Self {
        Self {
            preserve_url_relativity: false,
        }
    }
}
