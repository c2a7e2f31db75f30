//! Dataspace names.
//!
//! A dataspace partitions all events into isolated namespaces. Each one maps
//! to its own backend index.

use std::fmt;

use crate::error::EventError;

/// Prefix for backend index names.
pub const INDEX_PREFIX: &str = "datalog.";

/// A normalised dataspace name: trimmed, lowercase, non-empty, no `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dataspace(String);

impl Dataspace {
    pub fn new(raw: &str) -> Result<Self, EventError> {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            return Err(EventError::EmptyDataspace);
        }
        if name.contains('/') {
            return Err(EventError::InvalidDataspace { dataspace: name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backend index holding this dataspace's events.
    pub fn index_name(&self) -> String {
        self.index_name_with_prefix(INDEX_PREFIX)
    }

    pub fn index_name_with_prefix(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Display for Dataspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Dataspace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_case_and_whitespace() {
        let ds = Dataspace::new("  GoodLoop ").unwrap();
        assert_eq!(ds.as_str(), "goodloop");
        assert_eq!(ds.to_string(), "goodloop");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Dataspace::new(""), Err(EventError::EmptyDataspace));
        assert_eq!(Dataspace::new("   "), Err(EventError::EmptyDataspace));
    }

    #[test]
    fn test_rejects_slash() {
        assert!(matches!(
            Dataspace::new("a/b"),
            Err(EventError::InvalidDataspace { .. })
        ));
    }

    #[test]
    fn test_index_name() {
        let ds = Dataspace::new("default").unwrap();
        assert_eq!(ds.index_name(), "datalog.default");
        assert_eq!(ds.index_name_with_prefix("test."), "test.default");
    }
}
