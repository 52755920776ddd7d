//! Error handling for the inception application.
//! Defines the error taxonomy and the result type used throughout the crate.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for inception operations.
///
/// Only a few of these stop a whole run: source and settings errors before
/// anything is written, and command failures while the program executes.
/// Everything else that may go wrong while copying is logged as a warning.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors raised while reading a zip archive
    #[error("Archive error: {0}.")]
    ZipError(#[from] zip::result::ZipError),

    /// The template path is neither a directory nor a readable archive
    #[error("Unsupported template source: '{path}' is neither a directory nor a zip archive.")]
    UnsupportedSourceError { path: String },

    /// Represents errors that occur while reading an otherwise supported source
    #[error("Source error: {0}.")]
    SourceError(String),

    /// Malformed settings, metadata or question files
    #[error("Settings parse error: {0}.")]
    SettingsParseError(String),

    /// Represents errors that occur during configuration processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors that occur during template processing
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Errors reported by the rendering engine
    #[error("Template rendering error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors that occur while collecting answers
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// A shell command of the program exited unsuccessfully
    #[error("Command '{command}' failed with {status}.")]
    CommandFailure { command: String, status: ExitStatus },

    #[error("Version '{version}' of package '{name}' was not found.")]
    VersionNotFoundError { name: String, version: String },

    #[error("Package '{name}' version '{version}' has no package archive.")]
    PackageNotFoundError { name: String, version: String },

    #[error("Package '{name}' version '{version}' is already stored.")]
    PackageExistsError { name: String, version: String },

    /// Represents validation failures in template metadata or user input
    #[error("Validation error: {0}.")]
    ValidationError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
