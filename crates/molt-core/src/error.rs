use thiserror::Error;

use crate::capability::ShardAdd;
use crate::cid::{Cid, SpaceDid};
use crate::provenance::{ReceiptSummary, TransferRequest};

/// Pipeline-wide error types for the molt migration.
///
/// Every variant is fatal: the run stops at the first error, and the
/// provenance log emitted so far is the resumption checkpoint. No error is
/// caught and retried internally.
#[derive(Debug, Error)]
pub enum MoltError {
    /// An input line could not be decoded as a legacy upload record.
    #[error("malformed upload record on line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// A CID or DID failed shape validation.
    #[error("invalid identifier: {0}")]
    Identifier(String),

    /// The destination rejected a store/add invocation.
    #[error("store/add rejected for shard {} in space {}", .request.link, .space)]
    Registration {
        request: ShardAdd,
        space: SpaceDid,
        receipt: ReceiptSummary,
    },

    /// Fetching shard bytes from the source gateway returned a non-200 status.
    #[error("fetching shard bytes from {url} returned status {status}")]
    Fetch { url: String, status: u16 },

    /// Delivering shard bytes to the destination-provided URL failed.
    #[error("sending shard bytes to {} returned status {status}", .request.url)]
    Transfer {
        request: TransferRequest,
        status: u16,
    },

    /// A store/add receipt carried a status outside the protocol contract.
    #[error("unexpected store/add status {status:?} for shard {link}")]
    UnexpectedStatus { link: Cid, status: String },

    /// The destination rejected an upload/add invocation.
    #[error("upload/add rejected for root {root} in space {space}")]
    Finalization {
        root: Cid,
        space: SpaceDid,
        receipt: ReceiptSummary,
    },

    /// Transport-level network failure (connect, TLS, interrupted body).
    #[error("network error: {0}")]
    Network(String),

    /// Signing or key decoding failure.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Reading input or writing a provenance entry failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MoltError {
    fn from(e: serde_json::Error) -> Self {
        MoltError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MoltError {
    fn from(e: std::io::Error) -> Self {
        MoltError::Io(e.to_string())
    }
}
