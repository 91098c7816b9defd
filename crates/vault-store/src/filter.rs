use vault_document::{Document, Value, ID_FIELD};

/// Query filter understood by every [`DocumentStore`](crate::DocumentStore).
///
/// Paths are dotted (`metadata.inputId`) and resolve through nested
/// documents. Only equality, conjunction and element matching exist: there
/// is no ranking, projection or pagination.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// The value at `path` equals `value`.
    Eq { path: String, value: Value },
    /// Every sub-filter matches.
    And(Vec<Filter>),
    /// The array at `path` contains at least one document matching `filter`.
    ElemMatch { path: String, filter: Box<Filter> },
}

impl Filter {
    pub fn all() -> Self {
        Self::All
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Filter on the reserved primary-key field.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::eq(ID_FIELD, Value::String(id.into()))
    }

    pub fn elem_match(path: impl Into<String>, filter: Filter) -> Self {
        Self::ElemMatch {
            path: path.into(),
            filter: Box::new(filter),
        }
    }

    /// Conjoin another filter, flattening nested conjunctions.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Self::All, f) | (f, Self::All) => f,
            (Self::And(mut a), Self::And(b)) => {
                a.extend(b);
                Self::And(a)
            }
            (Self::And(mut a), f) => {
                a.push(f);
                Self::And(a)
            }
            (f, Self::And(mut b)) => {
                b.insert(0, f);
                Self::And(b)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Shorthand for `self.and(Filter::eq(path, value))`.
    pub fn and_eq(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Self::eq(path, value))
    }

    /// If this filter pins `_id` to a single string, return it.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Eq { path, value } if path == ID_FIELD => value.as_str(),
            Self::And(parts) => parts.iter().find_map(Filter::id),
            _ => None,
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq { path, value } => document.get_path(path) == Some(value),
            Self::And(parts) => parts.iter().all(|f| f.matches(document)),
            Self::ElemMatch { path, filter } => document
                .get_path(path)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_document)
                        .any(|item| filter.matches(item))
                })
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Document {
        Document::from_json(json).unwrap()
    }

    fn config(deps: serde_json::Value) -> Document {
        doc(json!({
            "_id": "c1",
            "service": "billing",
            "provider": "acme",
            "active": true,
            "dependsOn": deps,
            "metadata": {"inputId": "i1"}
        }))
    }

    #[test]
    fn all_matches_everything() {
        assert!(Filter::all().matches(&Document::new()));
    }

    #[test]
    fn equality_conjunction() {
        let d = config(json!([]));
        let f = Filter::eq("service", "billing").and_eq("provider", "acme");
        assert!(f.matches(&d));
        let f = f.and_eq("active", false);
        assert!(!f.matches(&d));
    }

    #[test]
    fn dotted_paths_reach_nested_documents() {
        let d = config(json!([]));
        assert!(Filter::eq("metadata.inputId", "i1").matches(&d));
        assert!(!Filter::eq("metadata.inputId", "i2").matches(&d));
    }

    #[test]
    fn elem_match_is_any_element() {
        let d = config(json!([
            {"service": "svcB", "source": "srcB"},
            {"service": "svcA", "source": "srcA"}
        ]));
        let hit = Filter::elem_match(
            "dependsOn",
            Filter::eq("service", "svcA").and_eq("source", "srcA"),
        );
        assert!(hit.matches(&d));

        // Fields must match within the same element.
        let crossed = Filter::elem_match(
            "dependsOn",
            Filter::eq("service", "svcA").and_eq("source", "srcB"),
        );
        assert!(!crossed.matches(&d));
    }

    #[test]
    fn elem_match_on_missing_or_scalar_field_is_false() {
        let d = config(json!([]));
        assert!(!Filter::elem_match("dependsOn", Filter::all()).matches(&d));
        assert!(!Filter::elem_match("service", Filter::all()).matches(&d));
        assert!(!Filter::elem_match("nope", Filter::all()).matches(&d));
    }

    #[test]
    fn and_flattens() {
        let f = Filter::eq("a", 1i64)
            .and(Filter::eq("b", 2i64).and_eq("c", 3i64))
            .and(Filter::all());
        match f {
            Filter::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn id_extracts_pinned_primary_key() {
        assert_eq!(Filter::by_id("x").id(), Some("x"));
        assert_eq!(Filter::eq("service", "s").and(Filter::by_id("y")).id(), Some("y"));
        assert_eq!(Filter::eq("service", "s").id(), None);
    }
}
