// crates/molt-cli/src/profile.rs
//
// Agent profile loading. The profile directory holds agent.toml with the
// agent's DID and hex-encoded ed25519 secret key. molt loads credentials,
// it never mints or stores them.

use std::fs;
use std::path::PathBuf;

use molt_core::AgentIdentity;
use serde::Deserialize;

/// Default profile directory.
const DEFAULT_PROFILE_DIR: &str = "~/.molt";

/// On-disk shape of agent.toml.
#[derive(Debug, Deserialize)]
struct AgentProfile {
    /// The agent's DID.
    did: String,
    /// Hex-encoded 32-byte ed25519 secret key.
    secret: String,
}

/// Resolve the profile directory: the --profile flag wins, then the
/// MOLT_PROFILE environment variable, then the default.
fn profile_dir(flag: Option<&str>) -> String {
    if let Some(dir) = flag {
        return dir.to_string();
    }
    std::env::var("MOLT_PROFILE").unwrap_or_else(|_| DEFAULT_PROFILE_DIR.to_string())
}

/// Load the agent identity from the profile directory.
///
/// Returns an error if the profile file is missing or malformed; running
/// without credentials is a fatal startup condition.
pub fn load_agent(flag: Option<&str>) -> Result<AgentIdentity, Box<dyn std::error::Error>> {
    let dir = expand_tilde(&profile_dir(flag));
    let path = PathBuf::from(&dir).join("agent.toml");

    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("could not read agent profile at {}: {}", path.display(), e))?;
    let profile: AgentProfile = toml::from_str(&contents)
        .map_err(|e| format!("malformed agent profile at {}: {}", path.display(), e))?;

    let identity = AgentIdentity::from_hex_secret(&profile.did, &profile.secret)?;
    Ok(identity)
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.display(), &path[1..]);
        }
    }
    path.to_string()
}
