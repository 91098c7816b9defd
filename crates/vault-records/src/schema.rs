//! Schema vault record.

use std::fmt;

use serde::{Deserialize, Serialize};
use vault_crypto::{Canonical, CanonicalValue, Identity};
use vault_types::{RecordId, Timestamp};

use crate::record::Record;
use crate::validation::{ValidationError, Validator};

/// Which side of a job a schema describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Input,
    Output,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied properties for a [`Schema`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProps {
    pub service: String,
    pub source: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub json_schema: String,
}

/// A JSON schema registered for one side of a job.
///
/// ID derives from `(service, source, provider, schemaType)`; the version
/// marker also covers the schema body, so re-registering a changed schema
/// under the same ID is visible as a new version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "versionId")]
    pub version_id: RecordId,
    pub service: String,
    pub source: String,
    pub provider: String,
    #[serde(rename = "schemaType")]
    pub schema_type: SchemaType,
    #[serde(rename = "jsonSchema")]
    pub json_schema: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Schema {
    pub fn new(props: SchemaProps, now: Timestamp) -> Result<Self, ValidationError> {
        let mut schema = Self {
            id: RecordId::null(),
            version_id: RecordId::null(),
            service: props.service,
            source: props.source,
            provider: props.provider,
            schema_type: props.schema_type,
            json_schema: props.json_schema,
            created_at: now,
            updated_at: now,
        };
        schema.field_checks().finish()?;
        schema.id = schema.derived_id();
        schema.version_id = schema.derived_version();
        Ok(schema)
    }

    fn field_checks(&self) -> Validator {
        let is_object = matches!(self.parsed(), Some(serde_json::Value::Object(_)));
        Validator::new(Self::KIND)
            .require("service", &self.service)
            .require("source", &self.source)
            .require("provider", &self.provider)
            .require("jsonSchema", &self.json_schema)
            .check(
                self.json_schema.trim().is_empty() || is_object,
                "jsonSchema",
                "must be a JSON object",
            )
            .check(
                self.updated_at >= self.created_at,
                "updatedAt",
                "precedes createdAt",
            )
    }

    /// The schema body as JSON, if it parses.
    pub fn parsed(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.json_schema).ok()
    }

    fn body_canonical(&self) -> CanonicalValue {
        // Whitespace and key order in the body must not mint a new version.
        match self.parsed() {
            Some(json) => CanonicalValue::from(json),
            None => self.json_schema.to_canonical(),
        }
    }
}

impl Identity for Schema {
    const KIND: &'static str = "schema";

    fn natural_key(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
            ("provider", self.provider.to_canonical()),
            ("schemaType", self.schema_type.as_str().to_canonical()),
        ])
    }

    fn semantic_payload(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
            ("provider", self.provider.to_canonical()),
            ("schemaType", self.schema_type.as_str().to_canonical()),
            ("jsonSchema", self.body_canonical()),
        ])
    }
}

impl Record for Schema {
    const COLLECTION: &'static str = "schemas";

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
        self.field_checks()
            .derived_id(self, &self.id)
            .derived_version(self, &self.version_id)
            .finish()
    }
}
