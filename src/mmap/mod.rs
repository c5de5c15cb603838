//! Memory-mapped reading path for large files.
//!
//! [`MmapFile`] holds a read-only page-mapped view of a file; the readers
//! tokenize directly over the mapped byte range with the same state
//! machine as the streaming path, so rows come out identical either way.
//! The mapping and the file handle live exactly as long as the reader and
//! are released once when it drops — on normal exhaustion, early
//! termination, and error paths alike.
//!
//! # Example
//!
//! ```no_run
//! use loquat_csv::mmap_reader;
//!
//! let mut reader = mmap_reader("large.csv")?;
//! while let Some(row) = reader.read_row()? {
//!     println!("{} fields on line {}", row.len(), reader.line_num());
//! }
//! # Ok::<(), loquat_csv::Error>(())
//! ```

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::common::Result;
use crate::dialect::{Dialect, get_dialect};
use crate::read::dict::{DictCore, DictRecord};
use crate::read::parser::RecordTokenizer;
use crate::read::source::SliceSource;

/// Scoped read-only mapping of a file.
///
/// A zero-length file is represented without a mapping, since mapping zero
/// bytes is disallowed on several platforms; such a file simply exposes an
/// empty slice. The file handle is kept open alongside the mapping and
/// both are released when the value drops.
pub struct MmapFile {
    map: Option<Mmap>,
    _file: File,
}

impl MmapFile {
    /// Open and map `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be opened, stat'ed,
    /// or mapped. Nothing is left half-open on failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(MmapFile { map: None, _file: file });
        }
        // SAFETY: the mapping is read-only and backed by a file we keep
        // open for the lifetime of this value. Mutations of the file by
        // other processes are outside this program's control, as with any
        // file-backed mapping.
        let map = unsafe { Mmap::map(&file)? };
        Ok(MmapFile {
            map: Some(map),
            _file: file,
        })
    }

    /// The mapped content, empty for a zero-length file.
    pub fn as_slice(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    /// File length in bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the file is zero-length.
    pub fn is_empty(&self) -> bool {
        self.map.is_none()
    }
}

/// Row reader tokenizing directly over a memory-mapped file.
///
/// Same iteration and `line_num` contract as the streaming
/// [`Reader`](crate::Reader); field text is materialized only when a field
/// boundary is reached.
pub struct MmapReader {
    file: MmapFile,
    pos: usize,
    tokenizer: RecordTokenizer,
    dialect: Dialect,
    errored: bool,
}

impl MmapReader {
    /// Open `path` with the default (excel) dialect.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_dialect(path, Dialect::excel())
    }

    /// Open `path` with an explicit dialect.
    ///
    /// # Errors
    ///
    /// Dialect validation and file/mapping acquisition both fail before
    /// any row is produced.
    pub fn open_with_dialect<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        let file = MmapFile::open(path)?;
        Ok(MmapReader {
            file,
            pos: 0,
            tokenizer: RecordTokenizer::new(&dialect),
            dialect,
            errored: false,
        })
    }

    /// Open `path` with a dialect looked up from the registry.
    pub fn open_with_named_dialect<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        Self::open_with_dialect(path, get_dialect(name)?)
    }

    /// The dialect this reader tokenizes under.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Physical input lines consumed so far.
    pub fn line_num(&self) -> u64 {
        self.tokenizer.line_num()
    }

    /// Read the next row without going through the iterator adapter.
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.errored {
            return Ok(None);
        }
        let mut source = SliceSource::at(self.file.as_slice(), self.pos);
        let outcome = self.tokenizer.read_record(&mut source);
        self.pos = source.position();
        match outcome {
            Ok(row) => Ok(row),
            Err(err) => {
                self.errored = true;
                Err(err)
            }
        }
    }
}

impl Iterator for MmapReader {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// Dict reader tokenizing directly over a memory-mapped file.
///
/// Carries the same mapping semantics as
/// [`DictReader`](crate::DictReader): field names from the first row
/// unless supplied, rest key/value handling for ragged rows.
pub struct MmapDictReader {
    reader: MmapReader,
    core: DictCore,
}

impl MmapDictReader {
    /// Open `path` with the default (excel) dialect.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(MmapDictReader {
            reader: MmapReader::open(path)?,
            core: DictCore::default(),
        })
    }

    /// Open `path` with an explicit dialect.
    pub fn open_with_dialect<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        Ok(MmapDictReader {
            reader: MmapReader::open_with_dialect(path, dialect)?,
            core: DictCore::default(),
        })
    }

    /// Open `path` with a dialect looked up from the registry.
    pub fn open_with_named_dialect<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        Ok(MmapDictReader {
            reader: MmapReader::open_with_named_dialect(path, name)?,
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
}

impl Iterator for MmapDictReader {
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

/// Open a [`MmapReader`] over `path` with the default (excel) dialect.
pub fn mmap_reader<P: AsRef<Path>>(path: P) -> Result<MmapReader> {
    MmapReader::open(path)
}

/// Open a [`MmapDictReader`] over `path` with the default (excel) dialect.
pub fn mmap_dict_reader<P: AsRef<Path>>(path: P) -> Result<MmapDictReader> {
    MmapDictReader::open(path)
}
