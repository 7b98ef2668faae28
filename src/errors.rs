use std::fmt;

use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

/// The kind of access attempted on a context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Remove => "remove",
        })
    }
}

// Define an enum to represent every failure a context can report
#[derive(Debug, Error)] // Automatically implement `Debug` and `Error` traits for the enum
pub enum ContextError {
    // The binding of `key` does not permit `op` (write to read-only, read of
    // write-only, removal of any bound key)
    #[error("unsupported access: cannot {op} property `{key}`")]
    UnsupportedAccess { key: String, op: Operation },

    // An accessor rejected a value or the value could not be converted
    #[error("invalid value for property `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    // The same key was registered twice in one binding table
    #[error("duplicate binding for property `{0}`")]
    DuplicateBinding(String),

    // Options could not be parsed
    #[error("config error: {0}")]
    Config(String),
}

impl ContextError {
    pub fn unsupported(key: &str, op: Operation) -> Self {
        ContextError::UnsupportedAccess { key: key.to_owned(), op }
    }

    pub fn invalid(key: &str, reason: impl fmt::Display) -> Self {
        ContextError::InvalidValue { key: key.to_owned(), reason: reason.to_string() }
    }
}

// Type alias for results that use `ContextError` as the error type
pub type Result<T> = std::result::Result<T, ContextError>;
