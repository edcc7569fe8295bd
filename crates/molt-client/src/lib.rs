// crates/molt-client/src/lib.rs
//
// molt-client: HTTP implementations of the molt-core collaborator traits.
//
// BridgeClient executes capability invocations against the destination's
// HTTP bridge; HttpTransport moves raw shard bytes between the source
// gateway and destination-provided upload URLs.

pub mod bridge;
pub mod transport;

pub use bridge::BridgeClient;
pub use transport::HttpTransport;
