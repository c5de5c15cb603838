//! Record tokenizer: the state machine turning bytes into rows.
//!
//! One tokenizer serves both the streaming and the memory-mapped readers;
//! the byte input is abstracted behind [`ByteSource`]. Rows are tokenized
//! field by field: a quote character at field start opens a quoted field,
//! doubled quotes fold to one literal quote, an escape character takes the
//! following byte verbatim, and `\n`, `\r\n`, or a bare `\r` terminate the
//! row when no quoted field is open.

use memchr::{memchr2, memchr3};
use smallvec::SmallVec;

use super::source::ByteSource;
use crate::common::{Error, Result};
use crate::dialect::{Dialect, Quoting};

/// Tokenizer states, one per position in the field grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field, nothing significant seen yet
    StartField,
    /// Accumulating an unquoted field
    InField,
    /// Escape character seen in an unquoted field
    Escaped,
    /// Accumulating a quoted field
    InQuotedField,
    /// Escape character seen inside a quoted field
    QuotedEscape,
    /// Quote character seen inside a quoted field; the next byte decides
    /// between a doubled quote, the end of the field, or a stray character
    QuoteInQuoted,
}

/// How the inner byte loop left the current record.
enum RowEnd {
    Done,
    Fail(Error),
}

/// Cursor-free record tokenizer.
///
/// Holds the dialect parameters relevant to reading plus the physical line
/// counter. The byte cursor lives in the [`ByteSource`], so the same
/// tokenizer value works for buffered streams and borrowed slices alike.
pub(crate) struct RecordTokenizer {
    delimiter: u8,
    /// `None` when the dialect disables quoting for reading
    quote: Option<u8>,
    escape: Option<u8>,
    doublequote: bool,
    skipinitialspace: bool,
    strict: bool,
    line_num: u64,
    /// Row ended at a bare `\r`; swallow an immediately following `\n`
    pending_lf: bool,
}

impl RecordTokenizer {
    pub(crate) fn new(dialect: &Dialect) -> Self {
        RecordTokenizer {
            delimiter: dialect.delimiter,
            quote: if dialect.quoting == Quoting::None {
                None
            } else {
                dialect.quotechar
            },
            escape: dialect.escapechar,
            doublequote: dialect.doublequote,
            skipinitialspace: dialect.skipinitialspace,
            strict: dialect.strict,
            line_num: 0,
            pending_lf: false,
        }
    }

    /// Physical input lines consumed so far. A multi-line quoted field
    /// advances this by the number of newlines it embeds.
    pub(crate) fn line_num(&self) -> u64 {
        self.line_num
    }

    /// Tokenize the next record from `src`.
    ///
    /// Returns `Ok(None)` at end of input. An empty physical line yields a
    /// one-element row holding an empty string.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedRow`] for an unterminated quoted field at end of
    /// input, or (in strict mode) a stray character after a closing quote.
    pub(crate) fn read_record<S: ByteSource>(&mut self, src: &mut S) -> Result<Option<Vec<String>>> {
        if self.pending_lf {
            self.pending_lf = false;
            if src.chunk()?.first() == Some(&b'\n') {
                src.consume(1);
            }
        }

        let mut fields: SmallVec<[String; 8]> = SmallVec::new();
        let mut field: Vec<u8> = Vec::new();
        let mut state = State::StartField;
        let mut saw_any = false;

        loop {
            let chunk = src.chunk()?;
            if chunk.is_empty() {
                return match state {
                    State::InQuotedField | State::QuotedEscape => Err(Error::MalformedRow {
                        line: self.line_num + 1,
                        msg: "unterminated quoted field at end of input".to_string(),
                    }),
                    _ => {
                        if saw_any {
                            self.line_num += 1;
                            finish_field(&mut field, &mut fields);
                            Ok(Some(fields.into_vec()))
                        } else {
                            Ok(None)
                        }
                    }
                };
            }

            let len = chunk.len();
            let mut i = 0;
            let mut outcome: Option<RowEnd> = None;

            while i < len {
                // Bulk-scan fast paths: extend the field up to the next
                // structural byte in one memchr pass.
                if state == State::InField && self.escape.is_none() {
                    let rest = &chunk[i..];
                    if let Some(j) = memchr3(self.delimiter, b'\r', b'\n', rest) {
                        field.extend_from_slice(&rest[..j]);
                        i += j;
                    } else {
                        field.extend_from_slice(rest);
                        i = len;
                        break;
                    }
                } else if state == State::InQuotedField
                    && self.escape.is_none()
                    && let Some(quote) = self.quote
                {
                    let rest = &chunk[i..];
                    if let Some(j) = memchr2(quote, b'\n', rest) {
                        field.extend_from_slice(&rest[..j]);
                        i += j;
                    } else {
                        field.extend_from_slice(rest);
                        i = len;
                        break;
                    }
                }

                let b = chunk[i];
                i += 1;

                match state {
                    State::StartField => {
                        if b == b'\r' || b == b'\n' {
                            self.terminate_line(b);
                            outcome = Some(RowEnd::Done);
                        } else if self.quote == Some(b) {
                            state = State::InQuotedField;
                        } else if self.escape == Some(b) {
                            state = State::Escaped;
                        } else if b == b' ' && self.skipinitialspace {
                            // discarded
                        } else if b == self.delimiter {
                            finish_field(&mut field, &mut fields);
                        } else {
                            field.push(b);
                            state = State::InField;
                        }
                    }
                    State::InField => {
                        if b == b'\r' || b == b'\n' {
                            self.terminate_line(b);
                            outcome = Some(RowEnd::Done);
                        } else if self.escape == Some(b) {
                            state = State::Escaped;
                        } else if b == self.delimiter {
                            finish_field(&mut field, &mut fields);
                            state = State::StartField;
                        } else {
                            field.push(b);
                        }
                    }
                    State::Escaped => {
                        if b == b'\n' {
                            self.line_num += 1;
                        }
                        field.push(b);
                        state = State::InField;
                    }
                    State::InQuotedField => {
                        if self.quote == Some(b) {
                            state = State::QuoteInQuoted;
                        } else if self.escape == Some(b) {
                            state = State::QuotedEscape;
                        } else {
                            if b == b'\n' {
                                self.line_num += 1;
                            }
                            field.push(b);
                        }
                    }
                    State::QuotedEscape => {
                        if b == b'\n' {
                            self.line_num += 1;
                        }
                        field.push(b);
                        state = State::InQuotedField;
                    }
                    State::QuoteInQuoted => {
                        if self.quote == Some(b) && self.doublequote {
                            field.push(b);
                            state = State::InQuotedField;
                        } else if b == self.delimiter {
                            finish_field(&mut field, &mut fields);
                            state = State::StartField;
                        } else if b == b'\r' || b == b'\n' {
                            self.terminate_line(b);
                            outcome = Some(RowEnd::Done);
                        } else if self.strict {
                            outcome = Some(RowEnd::Fail(Error::MalformedRow {
                                line: self.line_num + 1,
                                msg: format!(
                                    "unexpected character {:?} after closing quote",
                                    b as char
                                ),
                            }));
                        } else {
                            field.push(b);
                            state = State::InField;
                        }
                    }
                }

                if outcome.is_some() {
                    break;
                }
            }

            src.consume(i);
            if i > 0 {
                saw_any = true;
            }

            match outcome {
                None => {}
                Some(RowEnd::Done) => {
                    finish_field(&mut field, &mut fields);
                    return Ok(Some(fields.into_vec()));
                }
                Some(RowEnd::Fail(err)) => return Err(err),
            }
        }
    }

    fn terminate_line(&mut self, terminator: u8) {
        self.line_num += 1;
        if terminator == b'\r' {
            self.pending_lf = true;
        }
    }
}

/// Close the in-progress field and append it to the row.
fn finish_field(field: &mut Vec<u8>, fields: &mut SmallVec<[String; 8]>) {
    let bytes = std::mem::take(field);
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            // Handle invalid UTF-8 by replacing invalid sequences
            let valid_bytes = e.into_bytes();
            String::from_utf8_lossy(&valid_bytes).to_string()
        }
    };
    fields.push(text);
}
