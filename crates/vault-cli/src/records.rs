use serde::de::DeserializeOwned;
use serde::Serialize;
use vault_document::{from_document, to_document, Document};
use vault_records::{
    Config, ConfigProps, Input, InputProps, Output, OutputProps, Record, Schema, SchemaProps,
    ValidationError,
};
use vault_types::{RecordId, Timestamp};

use crate::cli::RecordKind;

/// A record of any vault, as handled by the CLI.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyRecord {
    Config(Config),
    Output(Output),
    Schema(Schema),
    Input(Input),
}

impl AnyRecord {
    /// Build and validate a record from wire-format properties.
    pub fn build(
        kind: RecordKind,
        props: serde_json::Value,
        now: Timestamp,
    ) -> anyhow::Result<Self> {
        Ok(match kind {
            RecordKind::Config => Self::Config(Config::new(parse::<ConfigProps>(props)?, now)?),
            RecordKind::Output => Self::Output(Output::new(parse::<OutputProps>(props)?, now)?),
            RecordKind::Schema => Self::Schema(Schema::new(parse::<SchemaProps>(props)?, now)?),
            RecordKind::Input => Self::Input(Input::new(parse::<InputProps>(props)?, now)?),
        })
    }

    /// Rebuild a record from its stored document, without validating it.
    pub fn from_stored(kind: RecordKind, json: serde_json::Value) -> anyhow::Result<Self> {
        let document = Document::from_json(json)?;
        Ok(match kind {
            RecordKind::Config => Self::Config(from_document(document)?),
            RecordKind::Output => Self::Output(from_document(document)?),
            RecordKind::Schema => Self::Schema(from_document(document)?),
            RecordKind::Input => Self::Input(from_document(document)?),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Output(_) => "output",
            Self::Schema(_) => "schema",
            Self::Input(_) => "input",
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Self::Config(r) => r.id(),
            Self::Output(r) => r.id(),
            Self::Schema(r) => r.id(),
            Self::Input(r) => r.id(),
        }
    }

    /// Version marker, for the record types that carry one.
    pub fn version_id(&self) -> Option<RecordId> {
        match self {
            Self::Config(r) => Some(r.version_id),
            Self::Schema(r) => Some(r.version_id),
            Self::Output(_) | Self::Input(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Config(r) => r.validate(),
            Self::Output(r) => r.validate(),
            Self::Schema(r) => r.validate(),
            Self::Input(r) => r.validate(),
        }
    }

    pub fn to_json_document(&self) -> anyhow::Result<serde_json::Value> {
        match self {
            Self::Config(r) => project(r),
            Self::Output(r) => project(r),
            Self::Schema(r) => project(r),
            Self::Input(r) => project(r),
        }
    }
}

fn parse<P: DeserializeOwned>(props: serde_json::Value) -> anyhow::Result<P> {
    Ok(serde_json::from_value(props)?)
}

fn project<R: Serialize>(record: &R) -> anyhow::Result<serde_json::Value> {
    Ok(to_document(record)?.to_json())
}
