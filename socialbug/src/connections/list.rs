use socialbug_api::endpoints::connections::Connection;
use socialbug_api::{ApiError, CancellationToken, Client, Request};
use socialbug_session::Provider;

/// Cached list of the user's active connections
#[derive(Debug, Default)]
pub struct ConnectionList {
    pub connections: Vec<Connection>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ConnectionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list with the server's current one
    pub async fn reload(&mut self, client: &Client, cancel: &CancellationToken) {
        self.loading = true;
        self.error = None;

        match client.send(Request::connections().active(), cancel).await {
            Ok(response) => {
                tracing::info!("Loaded {} active connections", response.content.len());
                self.connections = response.content;
            }
            Err(ApiError::Cancelled) => {}
            Err(e) => {
                tracing::error!("Failed to load connections: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Account preselected for a new item: first one on `platform`, else the first overall
    pub fn default_account_for(&self, platform: Provider) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.platform == platform)
            .or_else(|| self.connections.first())
    }

    /// Accounts offered for `platform`
    pub fn accounts_for(&self, platform: Provider) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.platform == platform)
    }
}
