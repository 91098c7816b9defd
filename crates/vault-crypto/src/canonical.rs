use std::collections::BTreeMap;
use std::fmt::Write as _;

use vault_types::{RecordId, Timestamp};

/// A semantic value in the shape the hasher understands.
///
/// `Map` keys are kept in a `BTreeMap`, so two containers with identical
/// content render identically regardless of insertion order. `Seq` keeps
/// the order it was given: reordering a sequence changes its rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Seq(Vec<CanonicalValue>),
    Map(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    /// Build a map from `(key, value)` pairs. Later duplicates win.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CanonicalValue)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Render to the stable string form.
    ///
    /// Strings and keys are JSON-quoted so that separators inside values
    /// cannot alias another structure. Maps render as `{"k":v;...}` with
    /// keys in lexicographic order; sequences as `[a,b,...]`.
    pub fn canonicalize(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("null"),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Int(n) => {
                let _ = write!(out, "{n}");
            }
            Self::Str(s) => write_quoted(out, s),
            Self::Seq(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_to(out);
                }
                out.push(']');
            }
            Self::Map(entries) => {
                out.push('{');
                for (key, value) in entries {
                    write_quoted(out, key);
                    out.push(':');
                    value.write_to(out);
                    out.push(';');
                }
                out.push('}');
            }
        }
    }
}

fn write_quoted(out: &mut String, s: &str) {
    // serde_json's string escaping is stable and total for &str.
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
    }
}

impl From<serde_json::Value> for CanonicalValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Str(n.to_string()),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::Seq(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

/// Conversion of a semantic field into a [`CanonicalValue`].
///
/// Implemented for the scalar and container types records are built from;
/// nested record types implement it by returning a [`CanonicalValue::Map`]
/// of their own fields.
pub trait Canonical {
    fn to_canonical(&self) -> CanonicalValue;
}

impl Canonical for CanonicalValue {
    fn to_canonical(&self) -> CanonicalValue {
        self.clone()
    }
}

impl Canonical for str {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Str(self.to_string())
    }
}

impl Canonical for String {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Str(self.clone())
    }
}

impl Canonical for bool {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Bool(*self)
    }
}

impl Canonical for i64 {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Int(*self)
    }
}

impl Canonical for u32 {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Int(i64::from(*self))
    }
}

impl Canonical for RecordId {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Str(self.to_hex())
    }
}

impl Canonical for Timestamp {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Str(self.format())
    }
}

impl<T: Canonical> Canonical for Option<T> {
    fn to_canonical(&self) -> CanonicalValue {
        match self {
            Some(v) => v.to_canonical(),
            None => CanonicalValue::Null,
        }
    }
}

impl<T: Canonical> Canonical for [T] {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Seq(self.iter().map(Canonical::to_canonical).collect())
    }
}

impl<T: Canonical> Canonical for Vec<T> {
    fn to_canonical(&self) -> CanonicalValue {
        self.as_slice().to_canonical()
    }
}

impl<T: Canonical> Canonical for BTreeMap<String, T> {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_canonical()))
                .collect(),
        )
    }
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn to_canonical(&self) -> CanonicalValue {
        (**self).to_canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(service: &str, source: &str) -> CanonicalValue {
        CanonicalValue::map([
            ("service", service.to_canonical()),
            ("source", source.to_canonical()),
        ])
    }

    #[test]
    fn map_keys_are_sorted() {
        let a = CanonicalValue::map([
            ("b", CanonicalValue::Int(2)),
            ("a", CanonicalValue::Int(1)),
        ]);
        assert_eq!(a.canonicalize(), r#"{"a":1;"b":2;}"#);
    }

    #[test]
    fn insertion_order_does_not_matter_for_maps() {
        let a = CanonicalValue::map([("x", "1".to_canonical()), ("y", "2".to_canonical())]);
        let b = CanonicalValue::map([("y", "2".to_canonical()), ("x", "1".to_canonical())]);
        assert_eq!(a.canonicalize(), b.canonicalize());
    }

    #[test]
    fn sequence_order_is_preserved() {
        let ab = vec![pair("a", "x"), pair("b", "y")].to_canonical();
        let ba = vec![pair("b", "y"), pair("a", "x")].to_canonical();
        assert_ne!(ab.canonicalize(), ba.canonicalize());
    }

    #[test]
    fn scalars_render_stably() {
        assert_eq!(CanonicalValue::Null.canonicalize(), "null");
        assert_eq!(true.to_canonical().canonicalize(), "true");
        assert_eq!(42i64.to_canonical().canonicalize(), "42");
        assert_eq!("hi".to_canonical().canonicalize(), "\"hi\"");
        assert_eq!(None::<String>.to_canonical(), CanonicalValue::Null);
    }

    #[test]
    fn separators_inside_strings_do_not_alias() {
        let tricky = CanonicalValue::map([("a", "1;b:2".to_canonical())]);
        let plain = CanonicalValue::map([
            ("a", "1".to_canonical()),
            ("b", "2".to_canonical()),
        ]);
        assert_ne!(tricky.canonicalize(), plain.canonicalize());
    }

    #[test]
    fn string_and_number_are_distinct() {
        assert_ne!(
            "1".to_canonical().canonicalize(),
            1i64.to_canonical().canonicalize()
        );
    }

    #[test]
    fn from_json_sorts_object_keys() {
        let json = serde_json::json!({"z": [1, "two"], "a": {"k": null}});
        let value = CanonicalValue::from(json);
        assert_eq!(value.canonicalize(), r#"{"a":{"k":null;};"z":[1,"two"];}"#);
    }

    #[test]
    fn nested_maps_render_recursively() {
        let mut inner = BTreeMap::new();
        inner.insert("q".to_string(), "v".to_string());
        let value = CanonicalValue::map([("outer", inner.to_canonical())]);
        assert_eq!(value.canonicalize(), r#"{"outer":{"q":"v";};}"#);
    }
}
