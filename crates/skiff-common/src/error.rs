//! Common error types for the Skiff runtime.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`SkiffError`].
pub type SkiffResult<T> = Result<T, SkiffError>;

/// Common errors across the Skiff runtime.
///
/// Every variant is fatal to the current launch attempt; nothing here is
/// retried internally.
#[derive(Error, Diagnostic, Debug)]
pub enum SkiffError {
    /// A required part of the launch configuration was never populated.
    #[error("No {what} configuration")]
    #[diagnostic(code(skiff::config::missing))]
    MissingConfig {
        /// The configuration element that was absent.
        what: &'static str,
    },

    /// A path the hypervisor needs is missing or has the wrong type.
    #[error("{what}: {} does not exist", path.display())]
    #[diagnostic(code(skiff::config::path_validation))]
    PathValidation {
        /// What the path was supposed to point at.
        what: &'static str,
        /// The offending path.
        path: PathBuf,
    },

    /// No hypervisor argument template in any search location.
    #[error("File {filename} not found")]
    #[diagnostic(
        code(skiff::hypervisor::template_not_found),
        help("Place the file in the bundle directory, sysconfdir or defaultsdir")
    )]
    TemplateNotFound {
        /// Name of the template file searched for.
        filename: &'static str,
    },

    /// The hypervisor argument template could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    #[diagnostic(code(skiff::hypervisor::template_read))]
    TemplateRead {
        /// Path to the template that failed to read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A placeholder in the template had no value to substitute.
    #[error("No value for placeholder {token}")]
    #[diagnostic(code(skiff::hypervisor::token_substitution))]
    TokenSubstitution {
        /// The placeholder that could not be expanded.
        token: String,
    },

    /// Console wiring failed partway through.
    #[error("Console setup failed: {message}")]
    #[diagnostic(code(skiff::hypervisor::console_setup))]
    ConsoleSetup {
        /// What was being wired when the failure happened.
        message: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A spec section handler reported failure.
    #[error("Failed spec handler: {name}: {message}")]
    #[diagnostic(code(skiff::spec::handler))]
    Handler {
        /// Registered name of the handler that failed.
        name: &'static str,
        /// The failure reported by the handler.
        message: String,
    },

    /// A spec section was present but malformed.
    #[error("Invalid spec section: {message}")]
    #[diagnostic(code(skiff::spec::invalid))]
    Spec {
        /// The error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(skiff::io))]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    #[diagnostic(code(skiff::serialization))]
    Serialization(String),
}

impl From<serde_json::Error> for SkiffError {
    fn from(err: serde_json::Error) -> Self {
        SkiffError::Serialization(err.to_string())
    }
}
