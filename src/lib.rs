//! Loquat - a Rust library for tokenizing and serializing CSV data
//!
//! This library provides a dialect-parameterized CSV engine: a streaming
//! tokenizer, the mirror-image writer, name-keyed dict adapters, heuristic
//! dialect sniffing, and a memory-mapped reading path for large files.
//!
//! # Features
//!
//! - **Pluggable dialects**: delimiter, quoting, escaping, and terminator
//!   rules bundled into immutable [`Dialect`] values with the built-ins
//!   `excel`, `excel-tab`, and `unix` in a process-wide registry
//! - **Streaming reader**: lazy row iteration with physical line tracking,
//!   multi-line quoted fields included
//! - **Writer**: minimal/all/non-numeric/none quoting policies with typed
//!   field values
//! - **Dict adapters**: field-name-keyed reading and writing
//! - **Sniffer**: delimiter and header inference from a sample
//! - **Memory-mapped reading**: tokenizes directly over an OS-paged view
//!   of a file instead of a copied buffer
//!
//! # Example - Reading
//!
//! ```
//! let data = "name,age,city\nJohn,30,\"New York\"\nJane,25,Boston\n";
//!
//! let mut rows = Vec::new();
//! for row in loquat_csv::reader(data.as_bytes()) {
//!     rows.push(row?);
//! }
//! assert_eq!(rows[1], vec!["John", "30", "New York"]);
//! # Ok::<(), loquat_csv::Error>(())
//! ```
//!
//! # Example - Writing
//!
//! ```
//! let mut out = Vec::new();
//! let mut w = loquat_csv::writer(&mut out);
//! w.write_row(["name", "age"])?;
//! w.write_row(["Alice", "28"])?;
//! drop(w);
//! assert_eq!(out, b"name,age\r\nAlice,28\r\n");
//! # Ok::<(), loquat_csv::Error>(())
//! ```
//!
//! # Example - Dialects and sniffing
//!
//! ```
//! use loquat_csv::{Dialect, Sniffer, register_dialect};
//!
//! register_dialect("pipe", Dialect::new().with_delimiter(b'|'))?;
//!
//! let dialect = Sniffer::new().sniff("a;b;c\n1;2;3\n", None)?;
//! assert_eq!(dialect.delimiter, b';');
//! # Ok::<(), loquat_csv::Error>(())
//! ```
//!
//! # Example - Memory-mapped reading
//!
//! ```no_run
//! let mut reader = loquat_csv::mmap_reader("large.csv")?;
//! for row in &mut reader {
//!     let row = row?;
//!     println!("{:?}", row);
//! }
//! # Ok::<(), loquat_csv::Error>(())
//! ```

/// Shared infrastructure: the unified error type
pub mod common;

/// Dialect values and the process-wide dialect registry
pub mod dialect;

/// Memory-mapped reading path
pub mod mmap;

/// Reading path: tokenizer, streaming reader, dict adapter
pub mod read;

/// Heuristic dialect and header detection
pub mod sniff;

/// Writing path: row writer, dict adapter, typed values
pub mod write;

// Re-export the public surface for convenience
pub use common::error::{Error, Result};
pub use dialect::{
    Dialect, Quoting, get_dialect, is_builtin_dialect, list_dialects, register_dialect,
    unregister_dialect,
};
pub use mmap::{MmapDictReader, MmapFile, MmapReader, mmap_dict_reader, mmap_reader};
pub use read::{DictReader, DictRecord, DictValue, Reader, reader};
pub use sniff::Sniffer;
pub use write::{DictWriter, ExtrasAction, Value, Writer, writer};
