// crates/molt-client/src/bridge.rs
//
// HTTP bridge client for capability invocations. Serializes the invocation
// payload, signs its digest with the agent key, POSTs the envelope to the
// bridge endpoint, and decodes the receipt.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use molt_core::crypto;
use molt_core::{
    AgentIdentity, Cid, Invocation, MoltError, Receipt, SpaceDid, StoreAddNb, StoreAddOk,
    StoreClient, UploadAddNb,
};

/// Signed envelope POSTed to the bridge for each invocation.
#[derive(Debug, Clone, Serialize)]
struct InvocationEnvelope {
    /// Hex SHA-256 digest of the serialized invocation payload.
    id: String,
    /// DID of the issuing agent.
    iss: String,
    #[serde(flatten)]
    payload: Invocation,
    /// Hex ed25519 signature over the digest.
    sig: String,
}

/// Executes capability invocations against the destination's HTTP bridge.
#[derive(Debug)]
pub struct BridgeClient {
    endpoint: String,
    identity: AgentIdentity,
    client: reqwest::Client,
}

impl BridgeClient {
    /// Create a client for the given bridge endpoint, issuing invocations
    /// as the given agent.
    pub fn new(endpoint: &str, identity: AgentIdentity) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            identity,
            client,
        }
    }

    /// The DID invocations are attributed to.
    pub fn issuer(&self) -> &str {
        &self.identity.did
    }

    async fn invoke<T>(&self, invocation: Invocation) -> Result<Receipt<T>, MoltError>
    where
        T: serde::de::DeserializeOwned,
    {
        let payload = serde_json::to_vec(&invocation)?;
        let id = crypto::digest_hex(&payload);
        let sig = hex::encode(self.identity.sign(id.as_bytes()));
        tracing::debug!("invoking {} (id {})", invocation.can, id);

        let envelope = InvocationEnvelope {
            id,
            iss: self.identity.did.clone(),
            payload: invocation,
            sig,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| MoltError::Network(format!("bridge request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MoltError::Network(format!(
                "bridge returned {}: {}",
                status, body
            )));
        }

        let receipt: Receipt<T> = response
            .json()
            .await
            .map_err(|e| MoltError::Serialization(format!("bridge receipt decode failed: {}", e)))?;
        Ok(receipt)
    }
}

#[async_trait]
impl StoreClient for BridgeClient {
    async fn store_add(
        &self,
        space: &SpaceDid,
        link: &Cid,
        size: u64,
    ) -> Result<Receipt<StoreAddOk>, MoltError> {
        let nb = StoreAddNb {
            link: link.clone(),
            size,
        };
        let invocation = Invocation::store_add(space, &nb)?;
        self.invoke(invocation).await
    }

    async fn upload_add(
        &self,
        space: &SpaceDid,
        root: &Cid,
        shards: &[Cid],
    ) -> Result<Receipt<Value>, MoltError> {
        let nb = UploadAddNb {
            root: root.clone(),
            shards: shards.to_vec(),
        };
        let invocation = Invocation::upload_add(space, &nb)?;
        self.invoke(invocation).await
    }
}
