//! Rewrite configuration management for `rewrite.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   └── rewrite    # [rewrite]
//! ├── types/         # Utility types
//! │   └── error      # ConfigError
//! └── mod.rs         # RewriteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section            | Purpose                                      |
//! |--------------------|----------------------------------------------|
//! | `[rewrite]`        | URL relativity preservation on write-back    |

pub mod section;
pub mod types;

pub use section::RewriteOptions;
pub use types::ConfigError;

use crate::log;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `rewrite.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Slot write-back settings
    #[serde(default)]
    pub rewrite: RewriteOptions,
}

impl RewriteConfig {
    /// Parse configuration from a TOML string.
    ///
    /// Unknown fields are reported and ignored.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, None);
        }
        Ok(config)
    }

    /// Read configuration from a file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Some(path));
        }
        Ok(config)
    }

    /// Load configuration from a file, attaching the path to any error.
    pub fn load(path: &Path) -> Result<Self> {
        Self::read(path).with_context(|| format!("Failed to load config `{}`", path.display()))
    }

    /// Deserialize while collecting the paths of fields nothing consumed.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: Option<&Path>) {
        let display_path = path
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = RewriteConfig::parse("").unwrap();
        assert_eq!(config, RewriteConfig::default());
        assert!(config.rewrite.preserve_url_relativity);
    }

    #[test]
    fn test_parse_rewrite_section() {
        let config = RewriteConfig::parse(
            r#"
            [rewrite]
            preserve_url_relativity = false
            "#,
        )
        .unwrap();
        assert!(!config.rewrite.preserve_url_relativity);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let (config, ignored) = RewriteConfig::parse_with_ignored(
            r#"
            [rewrite]
            preserve_url_relativity = false
            inline_images = true
            "#,
        )
        .unwrap();
        assert!(!config.rewrite.preserve_url_relativity);
        assert_eq!(ignored, vec!["rewrite.inline_images".to_string()]);
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let result = RewriteConfig::parse(
            r#"
            [rewrite]
            preserve_url_relativity = "yes"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_read_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rewrite.toml");
        fs::write(&path, "[rewrite]\npreserve_url_relativity = false\n").unwrap();

        let config = RewriteConfig::read(&path).unwrap();
        assert!(!config.rewrite.preserve_url_relativity);
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");

        let err = RewriteConfig::read(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(ref p, _) if p == &path));
    }

    #[test]
    fn test_load_adds_context() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");

        let err = RewriteConfig::load(&path).unwrap_err();
        assert!(format!("{err}").contains("missing.toml"));
    }
}
