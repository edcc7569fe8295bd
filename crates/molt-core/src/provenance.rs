// crates/molt-core/src/provenance.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capability::{Invocation, Receipt};
use crate::cid::SpaceDid;
use crate::error::MoltError;
use crate::record::UploadSummary;

/// One outbound byte-transfer request, summarized for the provenance log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
}

/// The destination's response to an outbound byte transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub status: u16,
}

/// Record of one completed shard byte transfer. Attached to the shard's
/// provenance entry only when the registration receipt asked for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub request: TransferRequest,
    pub response: TransferResponse,
}

/// Receipt fields preserved in a provenance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub id: String,
    pub out: Value,
}

impl ReceiptSummary {
    /// Summarize a typed receipt for logging.
    pub fn of<T: Serialize>(receipt: &Receipt<T>) -> Result<Self, MoltError> {
        Ok(ReceiptSummary {
            id: receipt.id.clone(),
            out: serde_json::to_value(&receipt.out)?,
        })
    }
}

/// One durable, self-describing audit record of a completed migration
/// action: a shard registered (and possibly transferred), or a logical
/// upload registered. Write-once; output order reflects operation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEntry {
    /// Action kind. Always "Add"; shard and upload additions are told
    /// apart by `invocation.can`.
    #[serde(rename = "type")]
    pub kind: String,
    /// DID of the agent that performed the invocation.
    pub attributed_to: String,
    /// Summary of the legacy record this action migrated.
    pub source: UploadSummary,
    /// The content identifier that was added.
    pub object: String,
    /// The destination space.
    pub target: SpaceDid,
    /// The invocation payload as executed.
    pub invocation: Invocation,
    /// The receipt the destination returned.
    pub receipt: ReceiptSummary,
    /// When the action completed.
    pub at: DateTime<Utc>,
    /// Present only when the receipt requested a byte transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_car_to: Option<TransferSummary>,
}
