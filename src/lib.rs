//! inception applies project templates.
//! A template is a directory or a zip archive holding the files to copy and
//! a settings file describing the program to run: prompting for variables,
//! copying and rendering files, and running shell commands.

/// Command-line interface module
pub mod cli;

/// Program steps: prompt, copy and run
pub mod commands;

/// Settings, question and metadata documents
/// Supports JSON and YAML formats (settings.json, settings.yml, settings.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Glob patterns excluded from copying
pub mod ignore;

/// Template sources: directories and zip archives
pub mod loader;

/// Logger initialization
pub mod logger;

/// User input and interaction handling
pub mod prompt;

/// Local package repository and name database
pub mod registry;

/// Template rendering
pub mod renderer;

/// Program execution
pub mod runner;

/// Variables collected during a run
pub mod variables;
