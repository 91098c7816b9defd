//! Document → record direction of the mapper.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    Unexpected, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;

use crate::error::{MapperError, MapperResult};
use crate::value::{Document, Value};

/// Reconstruct a record of type `T` from its document form.
///
/// Every declared field is looked up by its tag. A tag absent from the
/// document fails with [`MapperError::MissingField`] and a value that cannot
/// become the declared type fails with [`MapperError::TypeMismatch`]; both
/// carry the dotted path of the offending field (`dependsOn[1].source`).
/// Optional fields treat an absent tag as `None`.
pub fn from_document<T: DeserializeOwned>(document: Document) -> MapperResult<T> {
    T::deserialize(ValueDeserializer(Value::Document(document)))
}

struct ValueDeserializer(Value);

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Int(n) => Unexpected::Signed(*n),
        Value::Float(f) => Unexpected::Float(*f),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Document(_) => Unexpected::Map,
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = MapperError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> MapperResult<V::Value> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(n) => visitor.visit_i64(n),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Document(doc) => visitor.visit_map(MapDeserializer::new(doc)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> MapperResult<V::Value> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(ValueDeserializer(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> MapperResult<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> MapperResult<V::Value> {
        match self.0 {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Document(doc) if doc.len() == 1 => {
                let (variant, value) = doc
                    .into_iter()
                    .next()
                    .ok_or_else(|| <MapperError as de::Error>::custom("empty enum document"))?;
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                })
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"an enum variant",
            )),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::iter::Enumerate<std::vec::IntoIter<Value>>,
    len: usize,
}

impl SeqDeserializer {
    fn new(items: Vec<Value>) -> Self {
        let len = items.len();
        Self {
            iter: items.into_iter().enumerate(),
            len,
        }
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = MapperError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> MapperResult<Option<T::Value>> {
        match self.iter.next() {
            Some((index, value)) => seed
                .deserialize(ValueDeserializer(value))
                .map(Some)
                .map_err(|e| e.within(&format!("[{index}]"))),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<(String, Value)>,
    current: Option<(String, Value)>,
}

impl MapDeserializer {
    fn new(doc: Document) -> Self {
        Self {
            iter: doc.into_iter(),
            current: None,
        }
    }
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = MapperError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> MapperResult<Option<K::Value>> {
        match self.iter.next() {
            Some((key, value)) => {
                let key_de: de::value::StrDeserializer<'_, MapperError> =
                    key.as_str().into_deserializer();
                let parsed = seed.deserialize(key_de)?;
                self.current = Some((key, value));
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> MapperResult<V::Value> {
        let (key, value) = self
            .current
            .take()
            .ok_or_else(|| <MapperError as de::Error>::custom("value requested before key"))?;
        seed.deserialize(ValueDeserializer(value))
            .map_err(|e| e.within(&key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = MapperError;
    type Variant = VariantDeserializer;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> MapperResult<(V::Value, VariantDeserializer)> {
        let variant_de: de::value::StringDeserializer<MapperError> =
            self.variant.into_deserializer();
        let variant = seed.deserialize(variant_de)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = MapperError;

    fn unit_variant(self) -> MapperResult<()> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a unit variant",
            )),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> MapperResult<T::Value> {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer(value)),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"a newtype variant",
            )),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> MapperResult<V::Value> {
        match self.value {
            Some(Value::Array(items)) => visitor.visit_seq(SeqDeserializer::new(items)),
            _ => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"a tuple variant",
            )),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> MapperResult<V::Value> {
        match self.value {
            Some(Value::Document(doc)) => visitor.visit_map(MapDeserializer::new(doc)),
            _ => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"a struct variant",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::to_document;
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Dep {
        service: String,
        source: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Storage {
        bucket: String,
        prefix: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Stage {
        Input,
        Output,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Job {
        #[serde(rename = "_id")]
        id: String,
        service: String,
        active: bool,
        #[serde(rename = "dependsOn")]
        depends_on: Vec<Dep>,
        storage: Storage,
        stage: Stage,
        retries: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    fn job() -> Job {
        Job {
            id: "abc".into(),
            service: "billing".into(),
            active: true,
            depends_on: vec![
                Dep {
                    service: "auth".into(),
                    source: "events".into(),
                },
                Dep {
                    service: "users".into(),
                    source: "cdc".into(),
                },
            ],
            storage: Storage {
                bucket: "b".into(),
                prefix: "p/".into(),
            },
            stage: Stage::Output,
            retries: 2,
            note: Some("hello".into()),
        }
    }

    fn doc_of(json: serde_json::Value) -> Document {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn roundtrip_preserves_every_field() {
        let original = job();
        let doc = to_document(&original).unwrap();
        let back: Job = from_document(doc).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn roundtrip_with_absent_optional() {
        let mut original = job();
        original.note = None;
        let doc = to_document(&original).unwrap();
        assert!(!doc.contains_key("note"));
        let back: Job = from_document(doc).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn missing_top_level_field() {
        let mut doc = to_document(&job()).unwrap();
        doc.remove("active");
        let err = from_document::<Job>(doc).unwrap_err();
        assert_eq!(
            err,
            MapperError::MissingField {
                field: "active".into()
            }
        );
    }

    #[test]
    fn missing_nested_field_reports_path() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert("storage", doc_of(json!({"bucket": "b"})));
        let err = from_document::<Job>(doc).unwrap_err();
        assert_eq!(
            err,
            MapperError::MissingField {
                field: "storage.prefix".into()
            }
        );
    }

    #[test]
    fn missing_field_inside_sequence_reports_index() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert(
            "dependsOn",
            Value::Array(vec![
                Value::Document(doc_of(json!({"service": "a", "source": "b"}))),
                Value::Document(doc_of(json!({"service": "c"}))),
            ]),
        );
        let err = from_document::<Job>(doc).unwrap_err();
        assert_eq!(
            err,
            MapperError::MissingField {
                field: "dependsOn[1].source".into()
            }
        );
    }

    #[test]
    fn type_mismatch_reports_field() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert("active", "yes");
        match from_document::<Job>(doc).unwrap_err() {
            MapperError::TypeMismatch { field, .. } => assert_eq!(field, "active"),
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn scalar_where_record_expected_is_mismatch() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert("storage", "flat");
        assert!(matches!(
            from_document::<Job>(doc),
            Err(MapperError::TypeMismatch { field, .. }) if field == "storage"
        ));
    }

    #[test]
    fn negative_into_unsigned_is_mismatch() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert("retries", -1i64);
        assert!(matches!(
            from_document::<Job>(doc),
            Err(MapperError::TypeMismatch { field, .. }) if field == "retries"
        ));
    }

    #[test]
    fn unknown_enum_variant_is_rejected() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert("stage", "sideways");
        assert!(from_document::<Job>(doc).is_err());
    }

    #[test]
    fn raw_json_sequences_are_accepted_after_normalization() {
        let wire = json!({
            "_id": "abc",
            "service": "billing",
            "active": true,
            "dependsOn": [{"service": "auth", "source": "events"}],
            "storage": {"bucket": "b", "prefix": "p/"},
            "stage": "input",
            "retries": 0
        });
        let job: Job = from_document(doc_of(wire)).unwrap();
        assert_eq!(job.depends_on[0].service, "auth");
        assert_eq!(job.stage, Stage::Input);
        assert_eq!(job.note, None);
    }

    #[test]
    fn extra_document_keys_are_ignored() {
        let mut doc = to_document(&job()).unwrap();
        doc.insert("legacy", true);
        let back: Job = from_document(doc).unwrap();
        assert_eq!(back, job());
    }

    #[test]
    fn typed_wrappers_read_back_from_strings() {
        use vault_types::{RecordId, Timestamp};

        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Stamped {
            #[serde(rename = "_id")]
            id: RecordId,
            #[serde(rename = "createdAt")]
            created_at: Timestamp,
        }

        let original = Stamped {
            id: RecordId::from_hash([7u8; 32]),
            created_at: Timestamp::parse("2024-01-02 03:04:05").unwrap(),
        };
        let doc = to_document(&original).unwrap();
        assert_eq!(doc.get("_id"), Some(&Value::String(original.id.to_hex())));
        assert_eq!(
            doc.get("createdAt"),
            Some(&Value::from("2024-01-02 03:04:05"))
        );
        let back: Stamped = from_document(doc).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn malformed_timestamp_is_mismatch() {
        use vault_types::Timestamp;

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Stamped {
            #[serde(rename = "createdAt")]
            created_at: Timestamp,
        }

        let doc = doc_of(json!({"createdAt": "2024-01-02T03:04:05Z"}));
        assert!(matches!(
            from_document::<Stamped>(doc),
            Err(MapperError::TypeMismatch { field, .. }) if field == "createdAt"
        ));
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_dependencies(
            deps in proptest::collection::vec(("[a-z]{1,6}", "[a-z]{1,6}"), 0..5),
            active in any::<bool>(),
            retries in any::<u32>(),
        ) {
            let mut original = job();
            original.active = active;
            original.retries = retries;
            original.depends_on = deps
                .into_iter()
                .map(|(service, source)| Dep { service, source })
                .collect();
            let back: Job = from_document(to_document(&original).unwrap()).unwrap();
            prop_assert_eq!(back, original);
        }
    }
}
