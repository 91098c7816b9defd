//! Output vault record.

use serde::{Deserialize, Serialize};
use vault_crypto::{Canonical, CanonicalValue, Identity};
use vault_types::{RecordId, Timestamp};

use crate::record::Record;
use crate::validation::{ValidationError, Validator};

/// Provenance of an output: which input produced it and in which run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMetadata {
    #[serde(rename = "inputId")]
    pub input_id: RecordId,
    #[serde(rename = "processingId")]
    pub processing_id: String,
    #[serde(rename = "processingTimestamp")]
    pub processing_timestamp: Timestamp,
}

/// Caller-supplied properties for an [`Output`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputProps {
    pub service: String,
    pub source: String,
    pub provider: String,
    pub config_version_id: RecordId,
    pub input_id: RecordId,
    pub processing_id: String,
    pub processing_timestamp: Timestamp,
}

/// A processed result registered by a job run.
///
/// ID derives from `(service, source, provider, metadata.inputId)`: one
/// output per input per job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "configVersionId")]
    pub config_version_id: RecordId,
    pub service: String,
    pub source: String,
    pub provider: String,
    pub metadata: OutputMetadata,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Output {
    pub fn new(props: OutputProps, now: Timestamp) -> Result<Self, ValidationError> {
        let mut output = Self {
            id: RecordId::null(),
            config_version_id: props.config_version_id,
            service: props.service,
            source: props.source,
            provider: props.provider,
            metadata: OutputMetadata {
                input_id: props.input_id,
                processing_id: props.processing_id,
                processing_timestamp: props.processing_timestamp,
            },
            created_at: now,
            updated_at: now,
        };
        output.field_checks().finish()?;
        output.id = output.derived_id();
        Ok(output)
    }

    fn field_checks(&self) -> Validator {
        Validator::new(Self::KIND)
            .require("service", &self.service)
            .require("source", &self.source)
            .require("provider", &self.provider)
            .check(
                !self.config_version_id.is_null(),
                "configVersionId",
                "is required",
            )
            .check(
                !self.metadata.input_id.is_null(),
                "metadata.inputId",
                "is required",
            )
            .require("metadata.processingId", &self.metadata.processing_id)
            .check(
                self.updated_at >= self.created_at,
                "updatedAt",
                "precedes createdAt",
            )
    }
}

impl Identity for Output {
    const KIND: &'static str = "output";

    fn natural_key(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
            ("provider", self.provider.to_canonical()),
            ("inputId", self.metadata.input_id.to_canonical()),
        ])
    }
}

impl Record for Output {
    const COLLECTION: &'static str = "outputs";

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
    use vault_document::{from_document, to_document, Value};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn props(input: u8) -> OutputProps {
        OutputProps {
            service: "billing".into(),
            source: "events".into(),
            provider: "acme".into(),
            config_version_id: RecordId::from_hash([9; 32]),
            input_id: RecordId::from_hash([input; 32]),
            processing_id: "run-1".into(),
            processing_timestamp: ts("2024-05-01 11:59:00"),
        }
    }

    #[test]
    fn one_output_per_input() {
        let now = ts("2024-05-01 12:00:00");
        let a = Output::new(props(1), now).unwrap();
        let mut rerun = props(1);
        rerun.processing_id = "run-2".into();
        let b = Output::new(rerun, now).unwrap();
        let c = Output::new(props(2), now).unwrap();
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn null_references_are_rejected() {
        let mut p = props(1);
        p.config_version_id = RecordId::null();
        p.input_id = RecordId::null();
        p.processing_id = String::new();
        let err = Output::new(p, ts("2024-05-01 12:00:00")).unwrap_err();
        assert!(err.has_violation("configVersionId"));
        assert!(err.has_violation("metadata.inputId"));
        assert!(err.has_violation("metadata.processingId"));
    }

    #[test]
    fn nested_metadata_roundtrips_through_document() {
        let output = Output::new(props(3), ts("2024-05-01 12:00:00")).unwrap();
        let doc = to_document(&output).unwrap();
        let metadata = doc.get("metadata").and_then(Value::as_document).unwrap();
        assert_eq!(
            metadata.get("processingTimestamp"),
            Some(&Value::from("2024-05-01 11:59:00"))
        );
        let back: Output = from_document(doc).unwrap();
        assert_eq!(back, output);
    }
}
