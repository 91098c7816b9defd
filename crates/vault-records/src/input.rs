//! Input vault record.

use serde::{Deserialize, Serialize};
use vault_crypto::{Canonical, CanonicalValue, Identity};
use vault_types::{RecordId, Timestamp};

use crate::record::Record;
use crate::validation::{ValidationError, Validator};

/// Caller-supplied properties for an [`Input`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProps {
    pub service: String,
    pub source: String,
    pub provider: String,
    #[serde(rename = "uri")]
    pub object_uri: String,
    pub format: String,
}

/// A raw object registered for processing.
///
/// ID derives from `(service, source, provider, objectUri)`: registering
/// the same object twice is rejected by the repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub service: String,
    pub source: String,
    pub provider: String,
    #[serde(rename = "objectUri")]
    pub object_uri: String,
    pub format: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Input {
    pub fn new(props: InputProps, now: Timestamp) -> Result<Self, ValidationError> {
        let mut input = Self {
            id: RecordId::null(),
            service: props.service,
            source: props.source,
            provider: props.provider,
            object_uri: props.object_uri,
            format: props.format,
            created_at: now,
            updated_at: now,
        };
        input.field_checks().finish()?;
        input.id = input.derived_id();
        Ok(input)
    }

    fn field_checks(&self) -> Validator {
        Validator::new(Self::KIND)
            .require("service", &self.service)
            .require("source", &self.source)
            .require("provider", &self.provider)
            .require("objectUri", &self.object_uri)
            .require("format", &self.format)
            .check(
                self.updated_at >= self.created_at,
                "updatedAt",
                "precedes createdAt",
            )
    }
}

impl Identity for Input {
    const KIND: &'static str = "input";

    fn natural_key(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
            ("provider", self.provider.to_canonical()),
            ("objectUri", self.object_uri.to_canonical()),
        ])
    }
}

impl Record for Input {
    const COLLECTION: &'static str = "inputs";

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_timestamps(&mut self, created_at: Timestamp, updated_at: Timestamp) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.field_checks().derived_id(self, &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_document::{from_document, to_document};

    fn props(uri: &str) -> InputProps {
        InputProps {
            service: "billing".into(),
            source: "events".into(),
            provider: "acme".into(),
            object_uri: uri.into(),
            format: "jsonl".into(),
        }
    }

    fn now() -> Timestamp {
        Timestamp::parse("2024-05-01 12:00:00").unwrap()
    }

    #[test]
    fn object_uri_is_part_of_identity() {
        let a = Input::new(props("s3://raw/a.jsonl"), now()).unwrap();
        let b = Input::new(props("s3://raw/b.jsonl"), now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn format_is_not_part_of_identity() {
        let a = Input::new(props("s3://raw/a"), now()).unwrap();
        let mut p = props("s3://raw/a");
        p.format = "csv".into();
        let b = Input::new(p, now()).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn missing_uri_is_rejected() {
        let err = Input::new(props(""), now()).unwrap_err();
        assert!(err.has_violation("objectUri"));
    }

    #[test]
    fn document_roundtrip() {
        let input = Input::new(props("s3://raw/a"), now()).unwrap();
        let doc = to_document(&input).unwrap();
        assert!(doc.contains_key("objectUri"));
        let back: Input = from_document(doc).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn ids_do_not_collide_across_kinds() {
        // Same strings as a config natural key plus a uri: separate id space.
        let input = Input::new(props("x"), now()).unwrap();
        assert_ne!(
            input.id,
            vault_crypto::derive_id("config", &input.natural_key())
        );
    }
}
