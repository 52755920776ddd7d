//! Ignore patterns for template files.
//! Paths matched here are never copied, similar to .gitignore functionality.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiles the default patterns plus `patterns` into a set.
///
/// # Arguments
/// * `patterns` - Glob patterns from the `ignore` settings key
///
/// # Errors
/// * `Error::ConfigError` for an invalid pattern
///
/// # Example
/// ```ignore
/// # settings.yml
/// ignore:
///   - "*.pyc"
///   - "__pycache__/**"
/// ```
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let defaults = DEFAULT_IGNORE_PATTERNS.iter().copied();
    for pattern in defaults.chain(patterns.iter().map(String::as_str)) {
        builder.add(Glob::new(pattern).map_err(|e| {
            Error::ConfigError(format!("invalid ignore pattern '{}': {}", pattern, e))
        })?);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigError(format!("ignore patterns loading failed: {}", e)))
}
