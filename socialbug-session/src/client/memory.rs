use std::sync::{Mutex, MutexGuard};

use super::file_store::SessionData;
use super::SessionStore;
use crate::common::{Credential, PendingAuthorization, Provider};
use crate::error::SessionError;

/// Session store that lives only as long as the process
#[derive(Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.data().token = Some(token.into());
        store
    }

    fn data(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Credential> {
        self.data().token.clone().map(Credential::new)
    }

    fn set(&self, credential: Credential) -> Result<(), SessionError> {
        self.data().token = Some(credential.expose().to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.data() = SessionData::default();
        Ok(())
    }

    fn set_pending(&self, provider: Provider) -> Result<(), SessionError> {
        self.data().pending = Some(PendingAuthorization::new(provider));
        Ok(())
    }

    fn get_pending(&self) -> Option<PendingAuthorization> {
        self.data().pending.clone()
    }

    fn clear_pending(&self) -> Result<(), SessionError> {
        self.data().pending = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pending_replaces_previous() {
        let store = MemorySessionStore::new();
        store.set_pending(Provider::Instagram).unwrap();
        store.set_pending(Provider::LinkedIn).unwrap();
        assert_eq!(
            store.get_pending().map(|p| p.provider),
            Some(Provider::LinkedIn)
        );
    }

    #[test]
    fn clear_drops_credential_and_pending() {
        let store = MemorySessionStore::with_credential("tok");
        store.set_pending(Provider::Twitter).unwrap();
        assert!(store.is_authenticated());

        store.clear().unwrap();
        assert!(store.get().is_none());
        assert!(store.get_pending().is_none());
    }
}
