//! Streaming CSV reader over any [`Read`] implementation.

use std::io::Read;

use super::parser::RecordTokenizer;
use super::source::StreamSource;
use crate::common::Result;
use crate::dialect::{Dialect, get_dialect};

/// Lazy row reader bound to one byte source and one dialect.
///
/// `Reader` implements [`Iterator`], yielding each row as a `Vec<String>`.
/// Iteration is single-pass: once the source is exhausted (or a malformed
/// row surfaces) the reader cannot be restarted — create a new one from the
/// original source instead.
///
/// # Example
///
/// ```
/// use loquat_csv::reader;
///
/// let data = "name,age\nJohn,30\nJane,25\n";
/// let rows: Vec<_> = reader(data.as_bytes()).collect::<Result<_, _>>()?;
/// assert_eq!(rows[1], vec!["John", "30"]);
/// # Ok::<(), loquat_csv::Error>(())
/// ```
pub struct Reader<R> {
    source: StreamSource<R>,
    tokenizer: RecordTokenizer,
    dialect: Dialect,
    errored: bool,
}

impl<R: Read> Reader<R> {
    /// Create a reader with the default (excel) dialect.
    pub fn new(source: R) -> Self {
        Reader {
            source: StreamSource::new(source),
            tokenizer: RecordTokenizer::new(&Dialect::excel()),
            dialect: Dialect::excel(),
            errored: false,
        }
    }

    /// Create a reader with an explicit dialect.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Dialect`] if the dialect fails validation.
    pub fn with_dialect(source: R, dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        Ok(Reader {
            source: StreamSource::new(source),
            tokenizer: RecordTokenizer::new(&dialect),
            dialect,
            errored: false,
        })
    }

    /// Create a reader with a dialect looked up from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DialectNotFound`] for unknown names.
    pub fn with_named_dialect(source: R, name: &str) -> Result<Self> {
        Self::with_dialect(source, get_dialect(name)?)
    }

    /// The dialect this reader tokenizes under.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Physical input lines consumed so far. A quoted field spanning
    /// multiple lines advances this by the number of newlines it embeds.
    pub fn line_num(&self) -> u64 {
        self.tokenizer.line_num()
    }

    /// Read the next row without going through the iterator adapter.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.errored {
            return Ok(None);
        }
        match self.tokenizer.read_record(&mut self.source) {
            Ok(row) => Ok(row),
            Err(err) => {
                self.errored = true;
                Err(err)
            }
        }
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// Create a [`Reader`] over `source` with the default (excel) dialect.
///
/// Overrides are expressed through [`Reader::with_dialect`] and the
/// [`Dialect`] builder.
pub fn reader<R: Read>(source: R) -> Reader<R> {
    Reader::new(source)
}
