//! Dotted-path column projection.
//!
//! A column key like `organization.name` resolves by successive field
//! lookup. A path that runs into a missing field or a non-object is
//! [`Projected::Missing`], which is distinct from a field that exists and
//! holds JSON null ([`Projected::Null`]) so rendering can tell "no such
//! path" apart from "field is null".

use serde_json::Value;

/// Result of projecting one dotted path against one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projected<'a> {
    /// The path does not exist on this record.
    Missing,
    /// The path exists and holds JSON null.
    Null,
    /// The path exists and holds a value.
    Value(&'a Value),
}

impl<'a> Projected<'a> {
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Project a dotted field path against a record.
pub fn project<'a>(record: &'a Value, path: &str) -> Projected<'a> {
    let mut current = record;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Projected::Missing,
        }
    }

    if current.is_null() {
        Projected::Null
    } else {
        Projected::Value(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_field() {
        let record = json!({"name": "Acme"});
        assert_eq!(project(&record, "name").value(), Some(&json!("Acme")));
    }

    #[test]
    fn test_nested_field() {
        let record = json!({"organization": {"name": "Acme"}});
        assert_eq!(
            project(&record, "organization.name").value(),
            Some(&json!("Acme"))
        );
    }

    #[test]
    fn test_missing_path_is_not_null() {
        let record = json!({"organization": null, "customer": {"name": null}});

        // Intermediate object is null -> the deeper path does not exist.
        assert_eq!(project(&record, "organization.name"), Projected::Missing);
        // Field exists but holds null.
        assert_eq!(project(&record, "customer.name"), Projected::Null);
        // Field absent entirely.
        assert_eq!(project(&record, "plan.name"), Projected::Missing);
    }

    #[test]
    fn test_lookup_through_non_object() {
        let record = json!({"amount": 42});
        assert_eq!(project(&record, "amount.currency"), Projected::Missing);
    }
}
