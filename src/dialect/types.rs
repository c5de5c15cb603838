//! Dialect value type and quoting policies.

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Quoting policy applied when writing fields.
///
/// The reader only distinguishes [`Quoting::None`] (quote characters are
/// ordinary data) from the other policies (a quote character at field start
/// opens a quoted field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quoting {
    /// Quote only fields that contain the delimiter, the quote character,
    /// or a line-terminator character
    Minimal,
    /// Quote every field
    All,
    /// Quote every non-numeric field and leave numeric fields bare
    NonNumeric,
    /// Never quote; offending characters must be escaped instead
    None,
}

/// Immutable bundle of CSV formatting rules.
///
/// A `Dialect` describes how rows are tokenized on read and rendered on
/// write: the field delimiter, quote handling, escaping, and the row
/// terminator. Values are built with chainable `with_*` methods starting
/// from one of the presets:
///
/// ```
/// use loquat_csv::{Dialect, Quoting};
///
/// let dialect = Dialect::excel()
///     .with_delimiter(b';')
///     .with_skipinitialspace(true);
/// assert_eq!(dialect.delimiter, b';');
/// assert_eq!(dialect.quoting, Quoting::Minimal);
/// ```
///
/// Validation happens at the operation that needs the dialect (reader,
/// writer, or registry construction), not in the builder itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    /// Field delimiter character
    pub delimiter: u8,
    /// Quote character for quoted fields, `None` disables quoting entirely
    pub quotechar: Option<u8>,
    /// Escape character used instead of (or in addition to) quote doubling
    pub escapechar: Option<u8>,
    /// Represent a quote inside a quoted field by doubling it
    pub doublequote: bool,
    /// Discard spaces immediately following a delimiter
    pub skipinitialspace: bool,
    /// Row terminator appended by the writer; the reader accepts `\n`,
    /// `\r\n`, and bare `\r` regardless of this value
    pub lineterminator: String,
    /// Quoting policy
    pub quoting: Quoting,
    /// Fail on a stray character after a closing quote instead of
    /// appending it to the field
    pub strict: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::excel()
    }
}

impl Dialect {
    /// Create a new dialect with the default (excel) parameters
    pub fn new() -> Self {
        Self::excel()
    }

    /// The `excel` built-in: comma-delimited, `"`-quoted with doubling,
    /// minimal quoting, `\r\n` terminator
    pub fn excel() -> Self {
        Dialect {
            delimiter: b',',
            quotechar: Some(b'"'),
            escapechar: None,
            doublequote: true,
            skipinitialspace: false,
            lineterminator: "\r\n".to_string(),
            quoting: Quoting::Minimal,
            strict: false,
        }
    }

    /// The `excel-tab` built-in: excel with a tab delimiter
    pub fn excel_tab() -> Self {
        Self::excel().with_delimiter(b'\t')
    }

    /// The `unix` built-in: comma-delimited, every field quoted, `\n`
    /// terminator
    pub fn unix() -> Self {
        Self::excel()
            .with_lineterminator("\n")
            .with_quoting(Quoting::All)
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character (`None` to disable quoting)
    pub fn with_quotechar(mut self, quotechar: Option<u8>) -> Self {
        self.quotechar = quotechar;
        self
    }

    /// Set the escape character (`None` to disable escaping)
    pub fn with_escapechar(mut self, escapechar: Option<u8>) -> Self {
        self.escapechar = escapechar;
        self
    }

    /// Enable/disable quote doubling inside quoted fields
    pub fn with_doublequote(mut self, doublequote: bool) -> Self {
        self.doublequote = doublequote;
        self
    }

    /// Enable/disable discarding of spaces after a delimiter
    pub fn with_skipinitialspace(mut self, skip: bool) -> Self {
        self.skipinitialspace = skip;
        self
    }

    /// Set the row terminator used by the writer
    pub fn with_lineterminator(mut self, terminator: impl Into<String>) -> Self {
        self.lineterminator = terminator.into();
        self
    }

    /// Set the quoting policy
    pub fn with_quoting(mut self, quoting: Quoting) -> Self {
        self.quoting = quoting;
        self
    }

    /// Enable/disable strict handling of text after a closing quote
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check the dialect for contradictory settings.
    ///
    /// The delimiter, quote character, and escape character must be
    /// distinct; any quoting policy other than [`Quoting::None`] requires a
    /// quote character; the delimiter and quote character may not be line
    /// terminator characters; the terminator itself must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dialect`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == b'\r' || self.delimiter == b'\n' {
            return Err(Error::Dialect(
                "delimiter may not be a line terminator character".to_string(),
            ));
        }
        if let Some(quote) = self.quotechar {
            if quote == self.delimiter {
                return Err(Error::Dialect(
                    "quotechar and delimiter must differ".to_string(),
                ));
            }
            if quote == b'\r' || quote == b'\n' {
                return Err(Error::Dialect(
                    "quotechar may not be a line terminator character".to_string(),
                ));
            }
        }
        if let Some(escape) = self.escapechar {
            if escape == self.delimiter {
                return Err(Error::Dialect(
                    "escapechar and delimiter must differ".to_string(),
                ));
            }
            if self.quotechar == Some(escape) {
                return Err(Error::Dialect(
                    "escapechar and quotechar must differ".to_string(),
                ));
            }
        }
        if self.quoting != Quoting::None && self.quotechar.is_none() {
            return Err(Error::Dialect(
                "quoting policy requires a quotechar".to_string(),
            ));
        }
        if self.lineterminator.is_empty() {
            return Err(Error::Dialect(
                "lineterminator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_defaults() {
        let dialect = Dialect::excel();
        assert_eq!(dialect.delimiter, b',');
        assert_eq!(dialect.quotechar, Some(b'"'));
        assert_eq!(dialect.escapechar, None);
        assert!(dialect.doublequote);
        assert!(!dialect.skipinitialspace);
        assert_eq!(dialect.lineterminator, "\r\n");
        assert_eq!(dialect.quoting, Quoting::Minimal);
        assert!(dialect.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(Dialect::excel_tab().delimiter, b'\t');
        let unix = Dialect::unix();
        assert_eq!(unix.lineterminator, "\n");
        assert_eq!(unix.quoting, Quoting::All);
        assert!(unix.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let dialect = Dialect::new()
            .with_delimiter(b'|')
            .with_quotechar(Some(b'\''))
            .with_escapechar(Some(b'\\'))
            .with_doublequote(false)
            .with_strict(true);
        assert_eq!(dialect.delimiter, b'|');
        assert_eq!(dialect.quotechar, Some(b'\''));
        assert_eq!(dialect.escapechar, Some(b'\\'));
        assert!(!dialect.doublequote);
        assert!(dialect.strict);
        assert!(dialect.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_clashing_characters() {
        let same = Dialect::new().with_quotechar(Some(b','));
        assert!(matches!(same.validate(), Err(Error::Dialect(_))));

        let escape_clash = Dialect::new().with_escapechar(Some(b','));
        assert!(matches!(escape_clash.validate(), Err(Error::Dialect(_))));

        let escape_quote_clash = Dialect::new().with_escapechar(Some(b'"'));
        assert!(matches!(escape_quote_clash.validate(), Err(Error::Dialect(_))));
    }

    #[test]
    fn test_validate_requires_quotechar_for_quoting() {
        let disabled = Dialect::new()
            .with_quotechar(None)
            .with_quoting(Quoting::All);
        assert!(matches!(disabled.validate(), Err(Error::Dialect(_))));

        let none = Dialect::new()
            .with_quotechar(None)
            .with_quoting(Quoting::None);
        assert!(none.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_terminator_characters() {
        let newline_delim = Dialect::new().with_delimiter(b'\n');
        assert!(matches!(newline_delim.validate(), Err(Error::Dialect(_))));

        let empty_terminator = Dialect::new().with_lineterminator("");
        assert!(matches!(empty_terminator.validate(), Err(Error::Dialect(_))));
    }
}
