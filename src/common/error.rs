//! Unified error types for the loquat-csv engine.
//!
//! Every fallible operation in the crate returns [`Result`]; the [`Error`]
//! enum covers configuration errors, per-row tokenizing failures, writer
//! representation failures, and sniffing failures, plus I/O passthrough for
//! the file- and mmap-backed paths.
use thiserror::Error;

/// Main error type for loquat-csv operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No dialect is registered under the requested name
    #[error("unknown dialect: {0}")]
    DialectNotFound(String),

    /// The name belongs to a built-in dialect and cannot be replaced or removed
    #[error("dialect name is reserved: {0}")]
    ReservedName(String),

    /// Invalid or contradictory dialect configuration
    #[error("invalid dialect: {0}")]
    Dialect(String),

    /// A row could not be tokenized under the active dialect
    #[error("malformed row at line {line}: {msg}")]
    MalformedRow {
        /// Physical input line the failure was detected on
        line: u64,
        /// What the tokenizer found
        msg: String,
    },

    /// The field cannot be represented without quoting and no escape
    /// character is configured
    #[error("field cannot be written: {0}")]
    UnquotableField(String),

    /// A dict row contains keys outside the writer's fieldnames
    #[error("dict contains fields not in fieldnames: {0:?}")]
    ExtraFields(Vec<String>),

    /// The sample could not be analyzed into a consistent dialect
    #[error("could not determine dialect: {0}")]
    Sniff(String),
}

/// Result type for loquat-csv operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DialectNotFound("pipe".to_string());
        assert_eq!(err.to_string(), "unknown dialect: pipe");

        let err = Error::MalformedRow {
            line: 3,
            msg: "unterminated quoted field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed row at line 3: unterminated quoted field"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
    }
}
