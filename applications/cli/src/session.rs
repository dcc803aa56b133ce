/// Token persistence between CLI invocations
use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StoredSession {
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    pub fn new(access: Option<String>, refresh: Option<String>) -> Self {
        Self {
            access,
            refresh,
            saved_at: Some(Utc::now()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    /// Load a session file. A missing file is an empty session.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| CliError::Session(format!("{}: {}", path.display(), e)))
    }

    /// Write the session, or remove the file when there is nothing to keep.
    pub fn save(&self, path: &Path) -> Result<()> {
        if self.is_empty() {
            if path.exists() {
                std::fs::remove_file(path)?;
                tracing::debug!(path = %path.display(), "Session file removed");
            }
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::Session(e.to_string()))?;
        std::fs::write(path, contents)?;
        tracing::debug!(path = %path.display(), "Session saved");
        Ok(())
    }
}

/// Save the tokens left behind by a command. A failed write is logged and
/// never replaces the command's own outcome.
pub fn persist(path: &Path, access: Option<String>, refresh: Option<String>) -> bool {
    match StoredSession::new(access, refresh).save(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save session");
            false
        }
    }
}
