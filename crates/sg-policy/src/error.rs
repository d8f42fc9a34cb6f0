// error.rs — Error types for the policy subsystem.
//
// Only configuration can fail. Evaluating a type name against the registry
// is total and never produces one of these.

use thiserror::Error;

/// Errors that can occur while building filters or loading policy files.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A type name pattern is malformed and cannot be parsed as a glob.
    #[error("invalid type pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A filter entry lists no types, so it could never match.
    #[error("filter '{name}' lists no types")]
    EmptyFilter { name: String },

    /// The policy file could not be read.
    #[error("failed to read policy file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The policy file could not be parsed.
    #[error("failed to parse policy file '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// The policy file has an extension we don't know how to parse.
    #[error("unsupported policy file format '{path}' (expected .toml, .yaml or .yml)")]
    UnsupportedFormat { path: String },
}
