//! Common constants used throughout the inception application.

/// Supported settings file names, tried in order
pub const SETTINGS_FILES: [&str; 3] = ["settings.json", "settings.yml", "settings.yaml"];

/// Supported package metadata file names, tried in order
pub const METADATA_FILES: [&str; 3] = ["metadata.json", "metadata.yml", "metadata.yaml"];

/// Files ending with this suffix are rendered and stored without it
pub const TEMPLATE_SUFFIX: &str = ".jinja";

/// Sub-directory of the template copied by default
pub const DEFAULT_COPY_SOURCE: &str = "files";

/// Patterns never copied from a template
pub const DEFAULT_IGNORE_PATTERNS: [&str; 3] = ["**/.DS_Store", "**/.git", "**/.git/**"];

/// Directory under `$HOME` holding the package repository and database
pub const DATA_DIR: &str = ".inception";

/// Name of the archive stored for every package version
pub const PACKAGE_FILE: &str = "package.zip";

/// Name of the name-to-url database file
pub const DATABASE_FILE: &str = "data.json";
