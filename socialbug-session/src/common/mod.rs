mod models;

pub use models::{Credential, PendingAuthorization, Provider, ProviderParseError};
