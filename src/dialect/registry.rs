//! Process-wide dialect registry.
//!
//! The registry maps names to [`Dialect`] values so callers can refer to a
//! dialect by name wherever a reader or writer is constructed. It is seeded
//! once with the built-in dialects `excel`, `excel-tab`, and `unix`; those
//! entries are read-only. All access goes through one lock, and lookups
//! return the dialect by value, so a registered dialect can never be
//! mutated in place.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::types::Dialect;
use crate::common::{Error, Result};

/// Names reserved for the built-in dialects
const BUILTIN_NAMES: [&str; 3] = ["excel", "excel-tab", "unix"];

/// Global name-to-dialect registry, seeded with the built-ins
static REGISTRY: Lazy<RwLock<HashMap<String, Dialect>>> = Lazy::new(|| {
    let mut dialects = HashMap::new();
    dialects.insert("excel".to_string(), Dialect::excel());
    dialects.insert("excel-tab".to_string(), Dialect::excel_tab());
    dialects.insert("unix".to_string(), Dialect::unix());
    RwLock::new(dialects)
});

/// Whether `name` refers to one of the built-in dialects.
pub fn is_builtin_dialect(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Register `dialect` under `name`, replacing any existing user entry.
///
/// # Errors
///
/// Returns [`Error::ReservedName`] if `name` is a built-in dialect, or
/// [`Error::Dialect`] if the dialect fails validation.
pub fn register_dialect(name: &str, dialect: Dialect) -> Result<()> {
    if is_builtin_dialect(name) {
        return Err(Error::ReservedName(name.to_string()));
    }
    dialect.validate()?;
    REGISTRY.write().insert(name.to_string(), dialect);
    Ok(())
}

/// Remove the user dialect registered under `name`.
///
/// # Errors
///
/// Returns [`Error::ReservedName`] for built-in names and
/// [`Error::DialectNotFound`] for names that were never registered.
pub fn unregister_dialect(name: &str) -> Result<()> {
    if is_builtin_dialect(name) {
        return Err(Error::ReservedName(name.to_string()));
    }
    match REGISTRY.write().remove(name) {
        Some(_) => Ok(()),
        None => Err(Error::DialectNotFound(name.to_string())),
    }
}

/// Look up the dialect registered under `name`, returned by value.
///
/// # Errors
///
/// Returns [`Error::DialectNotFound`] if no dialect carries that name.
pub fn get_dialect(name: &str) -> Result<Dialect> {
    REGISTRY
        .read()
        .get(name)
        .cloned()
        .ok_or_else(|| Error::DialectNotFound(name.to_string()))
}

/// All registered dialect names (built-ins included), sorted.
pub fn list_dialects() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.read().keys().cloned().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let names = list_dialects();
        for builtin in BUILTIN_NAMES {
            assert!(names.contains(&builtin.to_string()));
        }
        assert_eq!(get_dialect("excel-tab").unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_register_get_unregister() {
        let name = "registry-test-pipe";
        register_dialect(name, Dialect::new().with_delimiter(b'|')).unwrap();
        assert_eq!(get_dialect(name).unwrap().delimiter, b'|');

        // Overwriting a user entry is allowed
        register_dialect(name, Dialect::new().with_delimiter(b'^')).unwrap();
        assert_eq!(get_dialect(name).unwrap().delimiter, b'^');

        unregister_dialect(name).unwrap();
        assert!(matches!(
            get_dialect(name),
            Err(Error::DialectNotFound(_))
        ));
    }

    #[test]
    fn test_builtins_are_reserved() {
        assert!(matches!(
            register_dialect("excel", Dialect::new()),
            Err(Error::ReservedName(_))
        ));
        assert!(matches!(
            unregister_dialect("excel"),
            Err(Error::ReservedName(_))
        ));
    }

    #[test]
    fn test_unregister_unknown() {
        assert!(matches!(
            unregister_dialect("registry-test-never-registered"),
            Err(Error::DialectNotFound(_))
        ));
    }

    #[test]
    fn test_register_validates() {
        let bad = Dialect::new().with_quotechar(Some(b','));
        assert!(matches!(
            register_dialect("registry-test-bad", bad),
            Err(Error::Dialect(_))
        ));
    }

    #[test]
    fn test_lookup_returns_a_copy() {
        let name = "registry-test-copy";
        register_dialect(name, Dialect::new().with_delimiter(b';')).unwrap();
        let mut copy = get_dialect(name).unwrap();
        copy.delimiter = b'@';
        assert_eq!(get_dialect(name).unwrap().delimiter, b';');
        unregister_dialect(name).unwrap();
    }
}
