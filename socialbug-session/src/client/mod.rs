mod config;
mod file_store;
mod memory;

pub use config::Settings;
pub use file_store::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::common::{Credential, PendingAuthorization, Provider};
use crate::error::SessionError;

/// Tab-wide session state: the bearer credential and the pending provider marker
///
/// Implementations do no network I/O and never inspect token contents. Reads
/// are served from memory; writes may fail if the backing storage does.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Credential>;

    fn set(&self, credential: Credential) -> Result<(), SessionError>;

    /// Drop the credential and any pending authorization (logout)
    fn clear(&self) -> Result<(), SessionError>;

    /// Record the provider of a new authorization, replacing any earlier one
    fn set_pending(&self, provider: Provider) -> Result<(), SessionError>;

    fn get_pending(&self) -> Option<PendingAuthorization>;

    fn clear_pending(&self) -> Result<(), SessionError>;

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}
