//! Field-name-keyed adapter over the row writer.

use std::collections::HashMap;
use std::io::Write;

use super::value::Value;
use super::writer::Writer;
use crate::common::{Error, Result};
use crate::dialect::Dialect;

/// What to do when a dict row carries keys outside the fieldnames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtrasAction {
    /// Fail with [`Error::ExtraFields`]
    #[default]
    Raise,
    /// Drop the extra keys silently
    Ignore,
}

/// Writes name-keyed rows in a fixed field order.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use loquat_csv::{DictWriter, Value};
///
/// let mut out = Vec::new();
/// let mut w = DictWriter::new(&mut out, ["name", "age"]);
/// w.write_header()?;
/// let row = HashMap::from([
///     ("name".to_string(), Value::from("Alice")),
///     ("age".to_string(), Value::from(28)),
/// ]);
/// w.write_row(&row)?;
/// drop(w);
/// assert_eq!(out, b"name,age\r\nAlice,28\r\n");
/// # Ok::<(), loquat_csv::Error>(())
/// ```
pub struct DictWriter<W: Write> {
    writer: Writer<W>,
    fieldnames: Vec<String>,
    restval: Option<String>,
    extras_action: ExtrasAction,
}

impl<W: Write> DictWriter<W> {
    /// Create a dict writer with the default (excel) dialect.
    pub fn new<I, S>(sink: W, fieldnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DictWriter {
            writer: Writer::new(sink),
            fieldnames: fieldnames.into_iter().map(Into::into).collect(),
            restval: None,
            extras_action: ExtrasAction::default(),
        }
    }

    /// Create a dict writer with an explicit dialect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dialect`] if the dialect fails validation.
    pub fn with_dialect<I, S>(sink: W, fieldnames: I, dialect: Dialect) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(DictWriter {
            writer: Writer::with_dialect(sink, dialect)?,
            fieldnames: fieldnames.into_iter().map(Into::into).collect(),
            restval: None,
            extras_action: ExtrasAction::default(),
        })
    }

    /// Create a dict writer with a dialect looked up from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DialectNotFound`] for unknown names.
    pub fn with_named_dialect<I, S>(sink: W, fieldnames: I, name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(DictWriter {
            writer: Writer::with_named_dialect(sink, name)?,
            fieldnames: fieldnames.into_iter().map(Into::into).collect(),
            restval: None,
            extras_action: ExtrasAction::default(),
        })
    }

    /// Substitute `value` for keys absent from a row.
    pub fn with_restval(mut self, value: impl Into<String>) -> Self {
        self.restval = Some(value.into());
        self
    }

    /// Set the handling of keys outside the fieldnames.
    pub fn with_extras_action(mut self, action: ExtrasAction) -> Self {
        self.extras_action = action;
        self
    }

    /// The field order rows are written in.
    pub fn fieldnames(&self) -> &[String] {
        &self.fieldnames
    }

    /// Write the fieldnames as a row.
    pub fn write_header(&mut self) -> Result<()> {
        let names = self.fieldnames.clone();
        self.writer.write_row(names)
    }

    /// Write one name-keyed row in fieldnames order.
    ///
    /// # Errors
    ///
    /// [`Error::ExtraFields`] when the row carries unknown keys and the
    /// extras action is [`ExtrasAction::Raise`], plus any writer error.
    pub fn write_row(&mut self, row: &HashMap<String, Value>) -> Result<()> {
        if self.extras_action == ExtrasAction::Raise {
            let mut extras: Vec<String> = row
                .keys()
                .filter(|key| !self.fieldnames.contains(key))
                .cloned()
                .collect();
            if !extras.is_empty() {
                extras.sort();
                return Err(Error::ExtraFields(extras));
            }
        }

        let restval = self.restval.clone().unwrap_or_default();
        let values: Vec<Value> = self
            .fieldnames
            .iter()
            .map(|name| {
                row.get(name)
                    .cloned()
                    .unwrap_or_else(|| Value::Str(restval.clone()))
            })
            .collect();
        self.writer.write_row(values)
    }

    /// Write every row of `rows`.
    pub fn write_rows<'a, I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a HashMap<String, Value>>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    /// Unwrap the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
