//! Writing path: row writer, dict adapter, and typed field values.
//!
//! [`Writer`] is the mirror of the reading path: rows go in, delimited and
//! quoted text comes out under the active dialect. [`DictWriter`] emits
//! name-keyed rows in a fixed field order, and [`Value`] carries the typed
//! fields that drive [`Quoting::NonNumeric`](crate::Quoting::NonNumeric).

// Submodule declarations
pub mod dict;
pub mod value;
pub mod writer;

// Re-exports
pub use dict::{DictWriter, ExtrasAction};
pub use value::Value;
pub use writer::{Writer, writer};

#[cfg(test)]
mod tests;
