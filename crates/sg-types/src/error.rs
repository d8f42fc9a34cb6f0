// error.rs — Error types for the host type table.

use thiserror::Error;

/// Errors that can occur while building or loading a type table.
///
/// Resolution itself never fails; these only surface at configuration time.
#[derive(Debug, Error)]
pub enum TypeError {
    /// A type with the same name is already registered.
    #[error("type '{name}' is already registered")]
    Duplicate { name: String },

    /// Registering the type would make it its own ancestor.
    #[error("registering '{name}' under '{supertype}' would create a cycle")]
    CyclicHierarchy { name: String, supertype: String },

    /// A type name was empty.
    #[error("type names must not be empty")]
    EmptyName,

    /// The table file could not be read.
    #[error("failed to read type table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The table file could not be parsed.
    #[error("failed to parse type table '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// The table file has an extension we don't know how to parse.
    #[error("unsupported type table format '{path}' (expected .toml, .yaml or .yml)")]
    UnsupportedFormat { path: String },
}
