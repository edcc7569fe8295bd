// crates/molt-core/src/capability.rs
//
// Capability invocation payloads and receipts for the destination's
// store/add and upload/add operations. The transport encoding of the
// authorization protocol itself lives behind the StoreClient trait; these
// types are what the pipeline builds, logs, and interprets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cid::{Cid, SpaceDid};
use crate::error::MoltError;

/// Capability name for registering one CAR shard with a space.
pub const STORE_ADD: &str = "store/add";

/// Capability name for registering a logical upload against a space.
pub const UPLOAD_ADD: &str = "upload/add";

/// One shard registration to perform: the CAR link, its declared size, and
/// the source URL its bytes can be fetched from if the destination asks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardAdd {
    pub link: Cid,
    pub size: u64,
    pub part_url: String,
}

impl ShardAdd {
    /// The store/add caveats for this shard.
    pub fn nb(&self) -> StoreAddNb {
        StoreAddNb {
            link: self.link.clone(),
            size: self.size,
        }
    }
}

/// Caveats of a store/add invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAddNb {
    pub link: Cid,
    pub size: u64,
}

/// Caveats of an upload/add invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAddNb {
    pub root: Cid,
    pub shards: Vec<Cid>,
}

/// A capability invocation payload: the target space, the capability name,
/// and its caveats. This is what gets signed, executed, and logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub with: SpaceDid,
    pub can: String,
    pub nb: Value,
}

impl Invocation {
    /// Build a store/add invocation for one shard.
    pub fn store_add(space: &SpaceDid, nb: &StoreAddNb) -> Result<Self, MoltError> {
        Ok(Invocation {
            with: space.clone(),
            can: STORE_ADD.to_string(),
            nb: serde_json::to_value(nb)?,
        })
    }

    /// Build an upload/add invocation for one record.
    pub fn upload_add(space: &SpaceDid, nb: &UploadAddNb) -> Result<Self, MoltError> {
        Ok(Invocation {
            with: space.clone(),
            can: UPLOAD_ADD.to_string(),
            nb: serde_json::to_value(nb)?,
        })
    }
}

/// Result of executing a capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt<T> {
    /// Receipt identifier assigned by the destination.
    pub id: String,
    /// Success or failure payload.
    pub out: ReceiptOut<T>,
}

/// Success or failure payload of a receipt. Failure details stay untyped:
/// they are only ever logged or carried in an error, never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReceiptOut<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "error")]
    Error(Value),
}

/// Success payload of store/add.
///
/// `status` stays a raw string so the engine can surface out-of-contract
/// values as UnexpectedStatus instead of silently dropping them at decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAddOk {
    pub status: String,
    /// Destination-provided URL to PUT the shard bytes to. Present only
    /// when `status` is "upload".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Headers the destination requires on the PUT, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}
