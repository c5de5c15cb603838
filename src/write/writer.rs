//! Row writer: the mirror path from rows to delimited text.

use std::io::Write;

use memchr::{memchr, memchr2};

use super::value::Value;
use crate::common::{Error, Result};
use crate::dialect::{Dialect, Quoting, get_dialect};

/// Serializes rows under a dialect, quoting fields as the quoting policy
/// requires and terminating each row with the dialect's line terminator.
///
/// The writer performs no reordering or schema validation; fields are
/// emitted in the order supplied.
///
/// # Example
///
/// ```
/// use loquat_csv::writer;
///
/// let mut out = Vec::new();
/// let mut w = writer(&mut out);
/// w.write_row(["name", "amount"])?;
/// w.write_row(["Alice", "a,b"])?;
/// drop(w);
/// assert_eq!(out, b"name,amount\r\nAlice,\"a,b\"\r\n");
/// # Ok::<(), loquat_csv::Error>(())
/// ```
pub struct Writer<W: Write> {
    sink: W,
    dialect: Dialect,
    /// Reused per-row output buffer; a row is flushed to the sink only
    /// after it serialized completely, so a failed row writes nothing
    buf: Vec<u8>,
}

impl<W: Write> Writer<W> {
    /// Create a writer with the default (excel) dialect.
    pub fn new(sink: W) -> Self {
        Writer {
            sink,
            dialect: Dialect::excel(),
            buf: Vec::new(),
        }
    }

    /// Create a writer with an explicit dialect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dialect`] if the dialect fails validation.
    pub fn with_dialect(sink: W, dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        Ok(Writer {
            sink,
            dialect,
            buf: Vec::new(),
        })
    }

    /// Create a writer with a dialect looked up from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DialectNotFound`] for unknown names.
    pub fn with_named_dialect(sink: W, name: &str) -> Result<Self> {
        Self::with_dialect(sink, get_dialect(name)?)
    }

    /// The dialect this writer serializes under.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Serialize one row and write it to the sink.
    ///
    /// # Errors
    ///
    /// [`Error::UnquotableField`] when [`Quoting::None`] cannot represent a
    /// field, or [`Error::Io`] from the sink. Nothing is written for a row
    /// that fails to serialize.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = row.into_iter().map(Into::into).collect();
        let single = values.len() == 1;

        self.buf.clear();
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                self.buf.push(self.dialect.delimiter);
            }
            self.append_field(value, single)?;
        }
        self.buf.extend_from_slice(self.dialect.lineterminator.as_bytes());
        self.sink.write_all(&self.buf)?;
        Ok(())
    }

    /// Serialize every row of `rows`.
    pub fn write_rows<I, Row, T>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
        Row: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Unwrap the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn append_field(&mut self, value: &Value, single_field: bool) -> Result<()> {
        let text = value.render();
        let bytes = text.as_bytes();

        let quoted = match self.dialect.quoting {
            Quoting::All => true,
            Quoting::NonNumeric => !value.is_numeric() || self.needs_quotes(bytes),
            Quoting::Minimal => {
                self.needs_quotes(bytes) || (single_field && bytes.is_empty())
            }
            Quoting::None => {
                if single_field && bytes.is_empty() {
                    return Err(Error::UnquotableField(
                        "a single empty field cannot be represented without quoting"
                            .to_string(),
                    ));
                }
                return self.append_escaped(bytes);
            }
        };

        if !quoted {
            self.buf.extend_from_slice(bytes);
            return Ok(());
        }

        let quote = self
            .dialect
            .quotechar
            .ok_or_else(|| Error::Dialect("quoting policy requires a quotechar".to_string()))?;
        self.buf.push(quote);
        for &b in bytes {
            if b == quote {
                if self.dialect.doublequote {
                    self.buf.push(quote);
                    self.buf.push(quote);
                } else if let Some(escape) = self.dialect.escapechar {
                    self.buf.push(escape);
                    self.buf.push(quote);
                } else {
                    return Err(Error::UnquotableField(
                        "field contains the quote character but neither doubling nor an \
                         escapechar is enabled"
                            .to_string(),
                    ));
                }
            } else {
                self.buf.push(b);
            }
        }
        self.buf.push(quote);
        Ok(())
    }

    /// Emit `bytes` unquoted, escaping every byte [`Quoting::None`] cannot
    /// carry bare.
    fn append_escaped(&mut self, bytes: &[u8]) -> Result<()> {
        for &b in bytes {
            if self.must_escape(b) {
                match self.dialect.escapechar {
                    Some(escape) => {
                        self.buf.push(escape);
                        self.buf.push(b);
                    }
                    None => {
                        return Err(Error::UnquotableField(format!(
                            "field contains {:?} but no escapechar is set",
                            b as char
                        )));
                    }
                }
            } else {
                self.buf.push(b);
            }
        }
        Ok(())
    }

    fn must_escape(&self, b: u8) -> bool {
        b == self.dialect.delimiter
            || b == b'\r'
            || b == b'\n'
            || self.dialect.quotechar == Some(b)
            || self.dialect.escapechar == Some(b)
            || self.dialect.lineterminator.as_bytes().contains(&b)
    }

    /// Whether a field must be quoted under [`Quoting::Minimal`].
    fn needs_quotes(&self, bytes: &[u8]) -> bool {
        if let Some(quote) = self.dialect.quotechar {
            if memchr2(self.dialect.delimiter, quote, bytes).is_some() {
                return true;
            }
        } else if memchr(self.dialect.delimiter, bytes).is_some() {
            return true;
        }
        if memchr2(b'\r', b'\n', bytes).is_some() {
            return true;
        }
        if self
            .dialect
            .lineterminator
            .as_bytes()
            .iter()
            .any(|&t| memchr(t, bytes).is_some())
        {
            return true;
        }
        if self.dialect.skipinitialspace
            && (bytes.first() == Some(&b' ') || bytes.last() == Some(&b' '))
        {
            return true;
        }
        false
    }
}

/// Create a [`Writer`] over `sink` with the default (excel) dialect.
pub fn writer<W: Write>(sink: W) -> Writer<W> {
    Writer::new(sink)
}
