//! Event field schema.
//!
//! A fixed, closed set of common properties is promoted to first-class
//! fields in the encoding so they keep a type in the backend. Everything else
//! goes into the generic `props` list, which keeps the indexed field count
//! bounded.

/// Top-level field names written by the encoder.
pub const EVENT_TYPE_FIELD: &str = "eventType";
pub const TIME_FIELD: &str = "time";
pub const COUNT_FIELD: &str = "count";
pub const PROPS_FIELD: &str = "props";

/// Declared backend type of an event field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Numeric,
    Keyword,
    Date,
}

impl FieldType {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Numeric)
    }
}

/// Common properties and their declared types.
pub const COMMON_PROPS: &[(&str, FieldType)] = &[
    // tracking
    ("ip", FieldType::Keyword),
    ("user", FieldType::Keyword),
    ("url", FieldType::Keyword),
    ("domain", FieldType::Keyword),
    // event-defining
    ("tag", FieldType::Keyword),
    ("action", FieldType::Keyword),
    ("verb", FieldType::Keyword),
    ("as", FieldType::Keyword),
    // ids
    ("id", FieldType::Keyword),
    ("xid", FieldType::Keyword),
    ("oxid", FieldType::Keyword),
    ("txid", FieldType::Keyword),
    ("uxid", FieldType::Keyword),
    ("su", FieldType::Keyword),
    // scoring / results
    ("start", FieldType::Numeric),
    ("end", FieldType::Numeric),
    ("dt", FieldType::Numeric),
    ("note", FieldType::Keyword),
    ("notes", FieldType::Keyword),
    ("score", FieldType::Numeric),
    ("x", FieldType::Numeric),
    ("y", FieldType::Numeric),
    ("z", FieldType::Numeric),
    ("lat", FieldType::Numeric),
    ("lng", FieldType::Numeric),
];

pub fn is_common_prop(name: &str) -> bool {
    COMMON_PROPS.iter().any(|(p, _)| *p == name)
}

/// Declared type of a top-level event field, if the schema knows it.
pub fn field_type(name: &str) -> Option<FieldType> {
    match name {
        COUNT_FIELD => Some(FieldType::Numeric),
        TIME_FIELD => Some(FieldType::Date),
        EVENT_TYPE_FIELD => Some(FieldType::Keyword),
        _ => COMMON_PROPS
            .iter()
            .find(|(p, _)| *p == name)
            .map(|(_, t)| *t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_types() {
        assert_eq!(field_type("count"), Some(FieldType::Numeric));
        assert_eq!(field_type("score"), Some(FieldType::Numeric));
        assert_eq!(field_type("tag"), Some(FieldType::Keyword));
        assert_eq!(field_type("time"), Some(FieldType::Date));
        assert_eq!(field_type("mycount"), None);
    }

    #[test]
    fn test_common_props() {
        assert!(is_common_prop("user"));
        assert!(is_common_prop("lng"));
        assert!(!is_common_prop("host"));
        assert!(!is_common_prop("count"));
        assert_eq!(COMMON_PROPS.len(), 25);
    }
}
