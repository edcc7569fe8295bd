// crates/molt-core/src/record.rs
//
// Legacy upload records as exported by the old service, one JSON document
// per line. Identifier fields are validated at decode time; unknown legacy
// metadata beyond the fields below is dropped.

use serde::{Deserialize, Serialize};

use crate::cid::Cid;
use crate::error::MoltError;

/// One completed upload in the legacy service. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// Root content identifier of the logical upload.
    pub cid: Cid,
    /// CAR shards the upload's data lives in, in export order.
    pub parts: Vec<Cid>,
    /// Human-readable name from the legacy service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation timestamp string from the legacy service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Last-update timestamp string from the legacy service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Total DAG size in bytes as reported by the legacy service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dag_size: Option<u64>,
}

impl UploadRecord {
    /// Decode one NDJSON line into a record, validating all identifiers.
    pub fn decode(line: &str) -> Result<Self, MoltError> {
        serde_json::from_str(line).map_err(|e| MoltError::Serialization(e.to_string()))
    }

    /// The subset of this record embedded in provenance entries.
    pub fn summary(&self) -> UploadSummary {
        UploadSummary {
            cid: self.cid.clone(),
            parts: self.parts.clone(),
            name: self.name.clone(),
            created: self.created.clone(),
        }
    }
}

/// Summary of a legacy record, preserved in every provenance entry that
/// migrating the record produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub cid: Cid,
    pub parts: Vec<Cid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}
