//! Field-name-keyed adapter over the row reader.

use std::collections::HashMap;
use std::io::Read;

use super::reader::Reader;
use crate::common::Result;
use crate::dialect::Dialect;

/// One value in a [`DictRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictValue {
    /// A single field mapped to its column name
    Field(String),
    /// Overflow fields collected under the rest key, in row order
    Rest(Vec<String>),
}

impl DictValue {
    /// The field text, or `None` for the overflow entry.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DictValue::Field(s) => Some(s),
            DictValue::Rest(_) => None,
        }
    }

    /// The overflow fields, or `None` for a plain field.
    pub fn as_rest(&self) -> Option<&[String]> {
        match self {
            DictValue::Field(_) => None,
            DictValue::Rest(values) => Some(values),
        }
    }
}

/// A row mapped onto field names.
pub type DictRecord = HashMap<String, DictValue>;

/// Shared mapping logic for the streaming and memory-mapped dict readers.
#[derive(Debug, Clone, Default)]
pub(crate) struct DictCore {
    pub(crate) fieldnames: Option<Vec<String>>,
    pub(crate) restkey: Option<String>,
    pub(crate) restval: Option<String>,
}

impl DictCore {
    /// Map one positional row onto the field names.
    ///
    /// Rows shorter than the field names fill missing keys with the rest
    /// value (empty string when unset); overflow goes under the rest key
    /// when one is configured and is dropped otherwise. Duplicate field
    /// names resolve to the later position.
    pub(crate) fn map_row(&self, mut row: Vec<String>) -> DictRecord {
        let names = self.fieldnames.as_deref().unwrap_or(&[]);
        let extra = if row.len() > names.len() {
            row.split_off(names.len())
        } else {
            Vec::new()
        };

        let mut record = DictRecord::with_capacity(names.len() + 1);
        let mut values = row.into_iter();
        for name in names {
            let value = values
                .next()
                .unwrap_or_else(|| self.restval.clone().unwrap_or_default());
            record.insert(name.clone(), DictValue::Field(value));
        }
        if !extra.is_empty()
            && let Some(key) = &self.restkey
        {
            record.insert(key.clone(), DictValue::Rest(extra));
        }
        record
    }
}

/// Lazy reader yielding rows as name-keyed mappings.
///
/// When no field names are supplied, the first row of the source is
/// consumed and used as the header.
///
/// # Example
///
/// ```
/// use loquat_csv::DictReader;
///
/// let data = "name,age\nJohn,30\n";
/// let mut rows = DictReader::new(data.as_bytes());
/// let row = rows.next().unwrap()?;
/// assert_eq!(row["name"].as_str(), Some("John"));
/// # Ok::<(), loquat_csv::Error>(())
/// ```
pub struct DictReader<R> {
    reader: Reader<R>,
    core: DictCore,
}

impl<R: Read> DictReader<R> {
    /// Create a dict reader with the default (excel) dialect.
    pub fn new(source: R) -> Self {
        DictReader {
            reader: Reader::new(source),
            core: DictCore::default(),
        }
    }

    /// Create a dict reader with an explicit dialect.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Dialect`] if the dialect fails validation.
    pub fn with_dialect(source: R, dialect: Dialect) -> Result<Self> {
        Ok(DictReader {
            reader: Reader::with_dialect(source, dialect)?,
            core: DictCore::default(),
        })
    }

    /// Create a dict reader with a dialect looked up from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DialectNotFound`] for unknown names.
    pub fn with_named_dialect(source: R, name: &str) -> Result<Self> {
        Ok(DictReader {
            reader: Reader::with_named_dialect(source, name)?,
            core: DictCore::default(),
        })
    }

    /// Use explicit field names instead of consuming the first row.
    pub fn with_fieldnames<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core.fieldnames = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Collect overflow fields of long rows under `key`.
    pub fn with_restkey(mut self, key: impl Into<String>) -> Self {
        self.core.restkey = Some(key.into());
        self
    }

    /// Fill missing fields of short rows with `value`.
    pub fn with_restval(mut self, value: impl Into<String>) -> Self {
        self.core.restval = Some(value.into());
        self
    }

    /// The field names, reading them from the first row if necessary.
    ///
    /// Returns `Ok(None)` when the source is empty and no explicit names
    /// were supplied.
    pub fn fieldnames(&mut self) -> Result<Option<&[String]>> {
        if self.core.fieldnames.is_none() {
            match self.reader.read_row()? {
                Some(row) => self.core.fieldnames = Some(row),
                None => return Ok(None),
            }
        }
        Ok(self.core.fieldnames.as_deref())
    }

    /// Physical input lines consumed so far, header included.
    pub fn line_num(&self) -> u64 {
        self.reader.line_num()
    }

    /// The dialect the underlying reader tokenizes under.
    pub fn dialect(&self) -> &Dialect {
        self.reader.dialect()
    }
}

impl<R: Read> Iterator for DictReader<R> {
    type Item = Result<DictRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fieldnames() {
            Ok(Some(_)) => {}
            Ok(None) => return None,
            Err(err) => return Some(Err(err)),
        }
        match self.reader.read_row() {
            Ok(Some(row)) => Some(Ok(self.core.map_row(row))),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
