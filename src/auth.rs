use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{FacturaError, Result};
use crate::settings::config_dir;

/// A signed-in identity plus the bearer token the store accepts. Cached as
/// JSON under the config dir; deleting the file is signing out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    pub token: String,
}

fn session_path() -> PathBuf {
    config_dir().join("session.json")
}

/// Exchange email + password for a session at the external identity
/// provider. Protocol internals beyond this one call are out of scope.
pub fn sign_in(identity_url: &str, email: &str, password: &str) -> Result<Session> {
    debug!("signing in {email} against {identity_url}");
    let client = reqwest::blocking::Client::new();
    let resp = client
        .post(format!("{}/sessions", identity_url.trim_end_matches('/')))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()?;
    if !resp.status().is_success() {
        return Err(FacturaError::SignIn(format!(
            "identity provider returned {}",
            resp.status()
        )));
    }
    Ok(resp.json()?)
}

pub fn save_session(session: &Session) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(session_path(), format!("{json}\n"))?;
    Ok(())
}

/// Current signed-in identity, or none. A malformed session file reads as
/// signed out rather than an error.
pub fn load_session() -> Option<Session> {
    let content = std::fs::read_to_string(session_path()).ok()?;
    serde_json::from_str(&content).ok()
}

/// Like [`load_session`] but an absent session is an error, for commands
/// that cannot proceed without one.
pub fn require_session() -> Result<Session> {
    load_session().ok_or(FacturaError::NotSignedIn)
}

/// Remove the cached session. Returns whether one existed.
pub fn clear_session() -> Result<bool> {
    let path = session_path();
    if path.exists() {
        std::fs::remove_file(&path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let session = Session {
            uid: "u1".to_string(),
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            token: "tok".to_string(),
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"displayName\":\"Ana\""));
        let loaded: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.uid, "u1");
        assert_eq!(loaded.token, "tok");
    }

    #[test]
    fn test_malformed_session_reads_as_none() {
        let parsed: std::result::Result<Session, _> = serde_json::from_str("{not json");
        assert!(parsed.is_err());
    }
}
