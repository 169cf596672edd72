use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::SessionStore;
use crate::common::{Credential, PendingAuthorization, Provider};
use crate::error::SessionError;

/// On-disk layout: one key for the credential, one for the pending provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct SessionData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub pending: Option<PendingAuthorization>,
}

/// Session store persisted to a JSON file so it survives a restart
pub struct FileSessionStore {
    session_path: PathBuf,
    data: Mutex<SessionData>,
}

impl FileSessionStore {
    /// Open the store at the default location (`<cache dir>/socialbug/session.json`)
    pub fn new() -> Result<Self, SessionError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| SessionError::Configuration("Could not find cache directory".to_string()))?
            .join("socialbug");
        Self::open(cache_dir.join("session.json"))
    }

    /// Open the store at an explicit path, loading whatever was persisted there
    pub fn open(session_path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let session_path = session_path.into();

        if let Some(dir) = session_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    SessionError::Storage(format!("Failed to create session directory: {}", e))
                })?;
            }
        }

        let data = Self::load(&session_path)?;
        tracing::debug!(
            path = %session_path.display(),
            authenticated = data.token.is_some(),
            pending = ?data.pending.as_ref().map(|p| p.provider),
            "Opened session store"
        );

        Ok(Self {
            session_path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.session_path
    }

    fn load(path: &Path) -> Result<SessionData, SessionError> {
        if !path.exists() {
            return Ok(SessionData::default());
        }

        let json = fs::read_to_string(path)
            .map_err(|e| SessionError::Storage(format!("Failed to read session: {}", e)))?;

        match serde_json::from_str(&json) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                Ok(SessionData::default())
            }
        }
    }

    fn data(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a change and write the result through to disk
    ///
    /// Memory only reflects the change once it has been written.
    fn update(&self, change: impl FnOnce(&mut SessionData)) -> Result<(), SessionError> {
        let mut data = self.data();
        let mut next = data.clone();
        change(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn persist(&self, data: &SessionData) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(data)?;

        fs::write(&self.session_path, json)
            .map_err(|e| SessionError::Storage(format!("Failed to save session: {}", e)))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.session_path)
                .map_err(|e| {
                    SessionError::Storage(format!("Failed to get file permissions: {}", e))
                })?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.session_path, perms).map_err(|e| {
                SessionError::Storage(format!("Failed to set file permissions: {}", e))
            })?;
        }

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Credential> {
        self.data().token.clone().map(Credential::new)
    }

    fn set(&self, credential: Credential) -> Result<(), SessionError> {
        self.update(|data| data.token = Some(credential.expose().to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.update(|data| *data = SessionData::default())
    }

    fn set_pending(&self, provider: Provider) -> Result<(), SessionError> {
        self.update(|data| data.pending = Some(PendingAuthorization::new(provider)))
    }

    fn get_pending(&self) -> Option<PendingAuthorization> {
        self.data().pending.clone()
    }

    fn clear_pending(&self) -> Result<(), SessionError> {
        self.update(|data| data.pending = None)
    }
}
