//! Configuration vault record.

use serde::{Deserialize, Serialize};
use vault_crypto::{Canonical, CanonicalValue, Identity};
use vault_types::{RecordId, Timestamp};

use crate::record::Record;
use crate::validation::{ValidationError, Validator};

/// One upstream job a configuration waits on.
///
/// Dependency order is kept for display and is part of the version
/// marker; queries match on membership only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobDependency {
    pub service: String,
    pub source: String,
}

impl JobDependency {
    pub fn new(service: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            source: source.into(),
        }
    }
}

impl Canonical for JobDependency {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
        ])
    }
}

/// Where a configured job writes its results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageTarget {
    pub bucket: String,
    pub prefix: String,
}

impl Canonical for StorageTarget {
    fn to_canonical(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("bucket", self.bucket.to_canonical()),
            ("prefix", self.prefix.to_canonical()),
        ])
    }
}

/// Caller-supplied properties for a [`Config`], as received on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProps {
    pub service: String,
    pub source: String,
    pub provider: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub depends_on: Vec<JobDependency>,
    #[serde(default, rename = "storageTarget")]
    pub storage: StorageTarget,
}

/// A job configuration: which service/source/provider triple runs, which
/// upstream jobs it depends on, and where it writes.
///
/// ID derives from `(service, source, provider)`; `version_id` from the
/// full semantic payload, so a changed dependency list yields a new
/// version under the same ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "versionId")]
    pub version_id: RecordId,
    pub service: String,
    pub source: String,
    pub provider: String,
    pub active: bool,
    #[serde(rename = "dependsOn")]
    pub depends_on: Vec<JobDependency>,
    pub storage: StorageTarget,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Config {
    /// Build and validate a configuration. `created_at == updated_at == now`.
    pub fn new(props: ConfigProps, now: Timestamp) -> Result<Self, ValidationError> {
        let mut config = Self {
            id: RecordId::null(),
            version_id: RecordId::null(),
            service: props.service,
            source: props.source,
            provider: props.provider,
            active: props.active,
            depends_on: props.depends_on,
            storage: props.storage,
            created_at: now,
            updated_at: now,
        };
        config.field_checks().finish()?;
        config.id = config.derived_id();
        config.version_id = config.derived_version();
        Ok(config)
    }

    fn field_checks(&self) -> Validator {
        let mut v = Validator::new(Self::KIND)
            .require("service", &self.service)
            .require("source", &self.source)
            .require("provider", &self.provider);
        for (i, dep) in self.depends_on.iter().enumerate() {
            v = v
                .require(format!("dependsOn[{i}].service"), &dep.service)
                .require(format!("dependsOn[{i}].source"), &dep.source);
        }
        v.check(
            self.updated_at >= self.created_at,
            "updatedAt",
            "precedes createdAt",
        )
    }
}

impl Identity for Config {
    const KIND: &'static str = "config";

    fn natural_key(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
            ("provider", self.provider.to_canonical()),
        ])
    }

    fn semantic_payload(&self) -> CanonicalValue {
        CanonicalValue::map([
            ("service", self.service.to_canonical()),
            ("source", self.source.to_canonical()),
            ("provider", self.provider.to_canonical()),
            ("active", self.active.to_canonical()),
            ("dependsOn", self.depends_on.to_canonical()),
            ("storage", self.storage.to_canonical()),
        ])
    }
}

impl Record for Config {
    const COLLECTION: &'static str = "configs";

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
