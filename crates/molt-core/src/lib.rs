// crates/molt-core/src/lib.rs
//
// molt-core: Core types, traits, and crypto primitives for the molt
// migration pipeline.
//
// This is the leaf crate the other molt crates depend on. It defines the
// identifier newtypes, legacy record shapes, capability invocation and
// receipt envelopes, provenance records, error types, and the trait seams
// the pipeline drives its collaborators through.

pub mod capability;
pub mod cid;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod provenance;
pub mod record;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use molt_core::UploadRecord;`

// Identifier types
pub use cid::{Cid, SpaceDid};

// Legacy record types
pub use record::{UploadRecord, UploadSummary};

// Capability types
pub use capability::{
    Invocation, Receipt, ReceiptOut, ShardAdd, StoreAddNb, StoreAddOk, UploadAddNb, STORE_ADD,
    UPLOAD_ADD,
};

// Provenance types
pub use provenance::{
    ProvenanceEntry, ReceiptSummary, TransferRequest, TransferResponse, TransferSummary,
};

// Identity type
pub use identity::AgentIdentity;

// Error type
pub use error::MoltError;

// Traits
pub use traits::{ByteStream, ByteTransport, StoreClient};
