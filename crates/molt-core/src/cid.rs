// crates/molt-core/src/cid.rs
//
// Validated string newtypes for content identifiers and space DIDs.
//
// Validation here is shape-level: fail fast on garbage at decode time.
// Full multiformat decoding is the destination's job; the pipeline only
// needs identifiers it can safely embed in URLs and invocation payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoltError;

/// A content identifier string — the root of a logical upload or one of
/// its CAR shards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

impl Cid {
    /// Parse a CID string, rejecting empty or non-alphanumeric input.
    pub fn parse(s: &str) -> Result<Self, MoltError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoltError::Identifier(
                "empty content identifier".to_string(),
            ));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MoltError::Identifier(format!(
                "content identifier contains non-alphanumeric characters: {:?}",
                trimmed
            )));
        }
        Ok(Cid(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Cid {
    type Error = MoltError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Cid::parse(&s)
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

/// DID of a destination storage space. Must use the `did:key` method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpaceDid(String);

impl SpaceDid {
    /// Parse a space DID, requiring the `did:key` method with a non-empty
    /// method-specific identifier.
    pub fn parse(s: &str) -> Result<Self, MoltError> {
        let trimmed = s.trim();
        let suffix = trimmed.strip_prefix("did:key:").ok_or_else(|| {
            MoltError::Identifier(format!(
                "space DID must use the did:key method: {:?}",
                trimmed
            ))
        })?;
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MoltError::Identifier(format!(
                "malformed did:key identifier: {:?}",
                trimmed
            )));
        }
        Ok(SpaceDid(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceDid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SpaceDid {
    type Error = MoltError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SpaceDid::parse(&s)
    }
}

impl From<SpaceDid> for String {
    fn from(did: SpaceDid) -> Self {
        did.0
    }
}
