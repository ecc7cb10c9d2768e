//! A minimal stand-in for the NetDisk's string table (spec.md §6):
//! headers, sequence strings and other free text are stored out-of-line
//! and addressed by `Name`, rather than inlined into every record.

use crate::error::{CactusError, Result};
use crate::name::Name;
use std::collections::HashMap;

pub trait StringStore {
    fn get_string(&self, name: Name) -> Result<String>;
    fn put_string(&mut self, name: Name, value: String) -> Result<()>;
}

/// An in-process `StringStore`, sufficient for tests and for callers who
/// don't need cross-process persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStringStore {
    strings: HashMap<Name, String>,
}

impl InMemoryStringStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StringStore for InMemoryStringStore {
    fn get_string(&self, name: Name) -> Result<String> {
        self.strings.get(&name).cloned().ok_or_else(|| CactusError::MissingEntity(format!("string {name}")))
    }

    fn put_string(&mut self, name: Name, value: String) -> Result<()> {
        self.strings.insert(name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_string() {
        let mut store = InMemoryStringStore::new();
        store.put_string(Name::from_raw(1), "chr1".into()).unwrap();
        assert_eq!(store.get_string(Name::from_raw(1)).unwrap(), "chr1");
    }

    #[test]
    fn missing_name_is_an_error() {
        let store = InMemoryStringStore::new();
        assert!(store.get_string(Name::from_raw(99)).is_err());
    }
}
