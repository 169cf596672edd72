mod guard;
mod list;

pub use guard::CallbackGuard;
pub use list::ConnectionList;

use std::sync::Arc;
use url::Url;

use crate::browser::{authorization_code, strip_authorization_code, Browser};
use crate::mutations;
use socialbug_api::endpoints::connections::AuthorizationUrl;
use socialbug_api::endpoints::ConnectionId;
use socialbug_api::{ApiError, CancellationToken, Client, Request};
use socialbug_session::{Provider, SessionStore};

/// Where the authorization flow stands in this tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Authorizing(Provider),
    AwaitingCallback,
    Exchanging(Provider),
    Settled(Settlement),
}

impl LifecycleState {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            LifecycleState::Authorizing(_) | LifecycleState::Exchanging(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Connected(Provider),
    Failed(String),
}

/// Result of inspecting the current page for a provider callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Ordinary page load, no code in the URL
    NoCallback,
    /// A code was present but could not be used; it was dropped
    Ignored(IgnoreReason),
    /// Another mount already started the exchange for this code
    AlreadyConsumed,
    /// The exchange was aborted before it completed
    Cancelled,
    Settled(Settlement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Unauthenticated,
    NoPendingAuthorization,
}

/// Drives "authorize → provider consent → callback → code exchange"
///
/// Nothing here survives the trip to the provider. On return, the flow is
/// rebuilt from the pending provider in the session store and the `code`
/// parameter of the current URL.
pub struct ConnectionController<B: Browser> {
    client: Arc<Client>,
    browser: B,
    guard: CallbackGuard,
    redirect_uri: String,
    state: LifecycleState,
    list: ConnectionList,
    cancel: CancellationToken,
}

impl<B: Browser> ConnectionController<B> {
    pub fn new(
        client: Arc<Client>,
        browser: B,
        guard: CallbackGuard,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client,
            browser,
            guard,
            redirect_uri: redirect_uri.into(),
            state: LifecycleState::Idle,
            list: ConnectionList::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn connections(&self) -> &ConnectionList {
        &self.list
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    fn session(&self) -> &Arc<dyn SessionStore> {
        self.client.session()
    }

    /// Page load of the connections view: finish a returning flow, then show the list
    pub async fn mount(&mut self) -> ResumeOutcome {
        let outcome = self.resume().await;
        // A completed exchange has already reloaded the list
        if !matches!(outcome, ResumeOutcome::Settled(Settlement::Connected(_))) {
            self.reload().await;
        }
        outcome
    }

    pub async fn reload(&mut self) {
        self.list.reload(&self.client, &self.cancel).await;
    }

    /// Begin linking an account on `provider`
    ///
    /// Any earlier pending authorization is replaced. On success the browser
    /// has been sent to the provider's consent page.
    pub async fn start_authorization(&mut self, provider: Provider) -> &LifecycleState {
        tracing::info!(%provider, "Starting authorization");

        if let Err(e) = self.session().set_pending(provider) {
            return self.fail(format!("Failed to start authorization: {}", e));
        }
        self.state = LifecycleState::Authorizing(provider);

        let request = Request::connections().authorize(provider, self.redirect_uri.as_str());
        let url = match self.client.send(request, &self.cancel).await {
            Ok(AuthorizationUrl { url: Some(url) }) if !url.is_empty() => {
                Url::parse(&url).map_err(|e| format!("Invalid authorization URL: {}", e))
            }
            Ok(_) => Err("No authorization URL returned".to_string()),
            Err(ApiError::Cancelled) => {
                self.clear_pending();
                self.state = LifecycleState::Idle;
                return &self.state;
            }
            Err(e) => Err(e.to_string()),
        };

        let navigated = url.and_then(|url| {
            self.browser
                .navigate(&url)
                .map_err(|e| format!("Failed to open authorization page: {}", e))
        });

        match navigated {
            Ok(()) => {
                tracing::info!(%provider, "Redirected to provider consent page");
                self.state = LifecycleState::AwaitingCallback;
                &self.state
            }
            Err(message) => self.fail(message),
        }
    }

    /// Inspect the current URL for a returning provider callback and complete it
    ///
    /// The `code` parameter is removed from the URL whatever happens, so a
    /// refresh never replays the exchange.
    pub async fn resume(&mut self) -> ResumeOutcome {
        let url = self.browser.current_url();
        let Some(code) = authorization_code(&url) else {
            self.state = LifecycleState::Idle;
            return ResumeOutcome::NoCallback;
        };

        self.state = LifecycleState::AwaitingCallback;
        let outcome = self.exchange(code).await;

        self.browser.replace_url(strip_authorization_code(&url));
        outcome
    }

    async fn exchange(&mut self, code: String) -> ResumeOutcome {
        if !self.session().is_authenticated() {
            tracing::warn!("Ignoring authorization code: not authenticated");
            self.state = LifecycleState::Idle;
            return ResumeOutcome::Ignored(IgnoreReason::Unauthenticated);
        }
        let Some(pending) = self.session().get_pending() else {
            tracing::warn!("Ignoring authorization code: no authorization pending");
            self.state = LifecycleState::Idle;
            return ResumeOutcome::Ignored(IgnoreReason::NoPendingAuthorization);
        };

        // Consumed before the await so a second mount never exchanges it again
        if !self.guard.try_consume(&code) {
            tracing::debug!("Authorization code already consumed");
            self.state = LifecycleState::Idle;
            return ResumeOutcome::AlreadyConsumed;
        }

        let provider = pending.provider;
        self.state = LifecycleState::Exchanging(provider);
        tracing::info!(
            %provider,
            pending_since = %pending.started_at,
            "Exchanging authorization code"
        );

        let request =
            Request::connections().complete(provider, code, self.redirect_uri.as_str());
        let result = self.client.send(request, &self.cancel).await;

        // Terminal on every path
        self.clear_pending();

        let settlement = match result {
            Ok(_) => {
                tracing::info!(%provider, "Connection completed");
                Settlement::Connected(provider)
            }
            Err(ApiError::Cancelled) => {
                self.state = LifecycleState::Idle;
                return ResumeOutcome::Cancelled;
            }
            Err(e) => {
                tracing::error!(%provider, "Failed to complete connection: {}", e);
                Settlement::Failed(e.to_string())
            }
        };

        self.state = LifecycleState::Settled(settlement.clone());
        if settlement == Settlement::Connected(provider) {
            self.reload().await;
        }
        ResumeOutcome::Settled(settlement)
    }

    /// Disconnect an account, then refresh the list once the server confirmed it
    pub async fn disconnect(&mut self, id: ConnectionId) -> Result<(), ApiError> {
        mutations::disconnect_connection(&self.client, id, &self.cancel).await?;
        self.reload().await;
        Ok(())
    }

    fn clear_pending(&self) {
        if let Err(e) = self.session().clear_pending() {
            tracing::error!("Failed to clear pending authorization: {}", e);
        }
    }

    fn fail(&mut self, message: String) -> &LifecycleState {
        tracing::error!("Authorization failed: {}", message);
        self.clear_pending();
        self.state = LifecycleState::Settled(Settlement::Failed(message));
        &self.state
    }
}

impl<B: Browser> Drop for ConnectionController<B> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
