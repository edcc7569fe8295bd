// crates/molt-core/src/traits.rs

use std::collections::BTreeMap;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;

use crate::capability::{Receipt, StoreAddOk};
use crate::cid::{Cid, SpaceDid};
use crate::error::MoltError;

/// A streaming HTTP body plus the response status it arrived with.
///
/// The body is consumed exactly once and never buffered whole, so
/// arbitrarily large shards flow through the pipeline in bounded memory.
pub struct ByteStream {
    /// HTTP status of the response that produced this stream.
    pub status: u16,
    /// Content-Length header value, when the source declared one.
    pub content_length: Option<u64>,
    /// The body chunks.
    pub body: Pin<Box<dyn Stream<Item = Result<Bytes, MoltError>> + Send>>,
}

/// Capability-scoped operations against the destination store.
///
/// Implemented by molt-client's BridgeClient. The transport encoding of
/// the authorization protocol is the implementation's concern; callers
/// only ever see receipts.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Invoke store/add: register one CAR shard with the space.
    async fn store_add(
        &self,
        space: &SpaceDid,
        link: &Cid,
        size: u64,
    ) -> Result<Receipt<StoreAddOk>, MoltError>;

    /// Invoke upload/add: register the logical upload (root plus its
    /// shards) against the space.
    async fn upload_add(
        &self,
        space: &SpaceDid,
        root: &Cid,
        shards: &[Cid],
    ) -> Result<Receipt<Value>, MoltError>;
}

/// Raw byte movement between the source gateway and destination-provided
/// upload URLs.
///
/// Implemented by molt-client's HttpTransport.
#[async_trait]
pub trait ByteTransport: Send + Sync {
    /// GET the given URL, returning the response status and streaming body.
    async fn fetch(&self, url: &str) -> Result<ByteStream, MoltError>;

    /// PUT the stream to the given URL with exactly the given headers.
    /// Returns the response status.
    async fn transfer(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: ByteStream,
    ) -> Result<u16, MoltError>;
}
