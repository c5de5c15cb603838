//! CSV dialects: formatting rules and the process-wide registry.
//!
//! A [`Dialect`] is an immutable value describing how rows are tokenized
//! and rendered: delimiter, quoting, escaping, and the row terminator. The
//! registry stores dialects under process-wide names so readers and writers
//! can be constructed from a name instead of an explicit value.
//!
//! # Example
//!
//! ```
//! use loquat_csv::{Dialect, register_dialect, get_dialect, unregister_dialect};
//!
//! register_dialect("colon", Dialect::new().with_delimiter(b':'))?;
//! assert_eq!(get_dialect("colon")?.delimiter, b':');
//! unregister_dialect("colon")?;
//! # Ok::<(), loquat_csv::Error>(())
//! ```

// Submodule declarations
pub mod registry;
pub mod types;

// Re-exports
pub use registry::{
    get_dialect, is_builtin_dialect, list_dialects, register_dialect, unregister_dialect,
};
pub use types::{Dialect, Quoting};
