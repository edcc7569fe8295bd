// crates/molt-core/src/identity.rs

use std::fmt;

use ed25519_dalek::SigningKey;

use crate::crypto;
use crate::error::MoltError;

/// The acting agent: a DID for attribution and an ed25519 key for signing
/// capability invocations.
///
/// Key material is loaded from a local profile by the CLI. This crate never
/// generates or persists keys — credential acquisition is outside the
/// migration's scope.
#[derive(Clone)]
pub struct AgentIdentity {
    /// The agent's DID (e.g. "did:key:z6Mk...").
    pub did: String,
    signing_key: SigningKey,
}

impl AgentIdentity {
    /// Construct an identity from a DID string and a hex-encoded 32-byte
    /// ed25519 secret key.
    pub fn from_hex_secret(did: &str, secret_hex: &str) -> Result<Self, MoltError> {
        let did = did.trim();
        if !did.starts_with("did:") {
            return Err(MoltError::Identifier(format!(
                "agent DID must start with 'did:': {:?}",
                did
            )));
        }

        let bytes = hex::decode(secret_hex.trim())
            .map_err(|e| MoltError::Crypto(format!("invalid hex secret key: {}", e)))?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| MoltError::Crypto("secret key must be exactly 32 bytes".to_string()))?;

        Ok(AgentIdentity {
            did: did.to_string(),
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    /// Sign a message with the agent's key. Returns the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        crypto::sign_message(&self.signing_key, message)
    }

    /// The agent's public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("did", &self.did)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_signature;

    const SECRET_HEX: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn from_hex_secret_builds_signing_identity() {
        let identity = AgentIdentity::from_hex_secret("did:key:z6MkAgent", SECRET_HEX).unwrap();
        let signature = identity.sign(b"hello");
        let valid = verify_signature(&identity.public_key_bytes(), b"hello", &signature).unwrap();
        assert!(valid);
    }

    #[test]
    fn rejects_non_did_identifier() {
        assert!(AgentIdentity::from_hex_secret("z6MkAgent", SECRET_HEX).is_err());
    }

    #[test]
    fn rejects_short_secret() {
        assert!(AgentIdentity::from_hex_secret("did:key:z6MkAgent", "0101").is_err());
    }

    #[test]
    fn rejects_non_hex_secret() {
        assert!(AgentIdentity::from_hex_secret("did:key:z6MkAgent", "zz".repeat(32).as_str())
            .is_err());
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let identity = AgentIdentity::from_hex_secret("did:key:z6MkAgent", SECRET_HEX).unwrap();
        let rendered = format!("{:?}", identity);
        assert!(rendered.contains("did:key:z6MkAgent"));
        assert!(!rendered.contains("0101010101"));
    }
}
