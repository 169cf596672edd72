// Types shared by the session store, the API client and the app
pub mod common;

// Session persistence and configuration
mod client;
mod error;

pub use client::{FileSessionStore, MemorySessionStore, SessionStore, Settings};
pub use common::{Credential, PendingAuthorization, Provider, ProviderParseError};
pub use error::SessionError;
