use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use itertools::Itertools;
use std::fmt::Write as _;
use std::sync::Arc;
use url::Url;

use crate::browser::SystemBrowser;
use crate::cli::Command;
use crate::connections::{
    CallbackGuard, ConnectionController, ConnectionList, IgnoreReason, LifecycleState,
    ResumeOutcome, Settlement,
};
use crate::insights::{caption_hashtags, caption_preview, load_insights, KpiRow};
use crate::mutations::{self, Asset, CampaignDraft, ItemDraft};
use crate::pagination::sources::{CampaignItemSource, CampaignSource, PostSource};
use crate::pagination::{ListController, ListLoader, ListView, PageMode};
use socialbug_api::endpoints::campaign_items::{CampaignItem, ItemType};
use socialbug_api::endpoints::campaigns::{Campaign, CampaignStatus};
use socialbug_api::endpoints::posts::Post;
use socialbug_api::endpoints::CampaignId;
use socialbug_api::{ApiError, CancellationToken, Client, Request};
use socialbug_session::{Credential, SessionStore, Settings};

pub struct App {
    settings: Settings,
    client: Arc<Client>,
    guard: CallbackGuard,
    cancel: CancellationToken,
}

impl App {
    pub fn new(settings: Settings, session: Arc<dyn SessionStore>) -> Self {
        let client = Arc::new(Client::new(settings.api_base_url.clone(), session));
        Self {
            settings,
            client,
            guard: CallbackGuard::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    fn session(&self) -> &Arc<dyn SessionStore> {
        self.client.session()
    }

    /// Run one command and return what should be printed
    pub async fn run(&self, command: Command) -> Result<String> {
        match command {
            Command::Login { email, password } => {
                let response = self
                    .client
                    .send(Request::auth().login(email, password), &self.cancel)
                    .await?;
                self.store_token(response.token)?;
                Ok("Logged in".to_string())
            }
            Command::Register {
                name,
                email,
                password,
            } => {
                let response = self
                    .client
                    .send(Request::auth().register(name, email, password), &self.cancel)
                    .await?;
                self.store_token(response.token)?;
                Ok("Account created, logged in".to_string())
            }
            Command::Logout => {
                self.session().clear()?;
                Ok("Logged out".to_string())
            }
            Command::Connect { provider } => {
                self.require_login()?;
                let mut controller = self.connection_controller(self.redirect_url()?);
                let state = controller.start_authorization(provider).await.clone();
                match state {
                    LifecycleState::AwaitingCallback => Ok(format!(
                        "After approving access, run:\n  socialbug resume '<the {} URL you were sent back to>'",
                        self.settings.redirect_uri()
                    )),
                    LifecycleState::Settled(Settlement::Failed(message)) => {
                        anyhow::bail!("Could not start {} authorization: {}", provider.label(), message)
                    }
                    other => Ok(format!("Authorization {:?}", other)),
                }
            }
            Command::Resume { callback_url } => {
                let url = Url::parse(&callback_url)
                    .with_context(|| format!("Invalid callback URL '{}'", callback_url))?;
                let mut controller = self.connection_controller(url);
                let outcome = controller.mount().await;
                Ok(format!(
                    "{}\n\n{}",
                    describe_outcome(&outcome),
                    render_connections(controller.connections())
                ))
            }
            Command::Connections => {
                let mut list = ConnectionList::new();
                list.reload(&self.client, &self.cancel).await;
                Ok(render_connections(&list))
            }
            Command::Disconnect { id } => {
                let mut controller = self.connection_controller(self.redirect_url()?);
                controller.disconnect(id).await?;
                Ok(format!(
                    "Disconnected account {}\n\n{}",
                    id,
                    render_connections(controller.connections())
                ))
            }
            Command::Campaigns { status, page } => self.campaigns(status, page).await,
            Command::CreateCampaign {
                name,
                description,
                platform,
            } => {
                let draft = CampaignDraft::new(name, platform).description(description);
                mutations::create_campaign(&self.client, &draft, &self.cancel).await?;
                // New campaigns start out active
                let listing = self.campaigns(CampaignStatus::Active, 0).await?;
                Ok(format!("Campaign '{}' created\n\n{}", draft.name, listing))
            }
            Command::Items { campaign_id, page } => self.items(campaign_id, page).await,
            Command::CreateItem {
                campaign_id,
                platform,
                item_type,
                file,
                caption,
                hashtags,
                date,
                time,
                account,
            } => {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string());

                let connection_id = match account {
                    Some(id) => Some(id),
                    None => {
                        let mut list = ConnectionList::new();
                        list.reload(&self.client, &self.cancel).await;
                        list.default_account_for(platform).map(|c| c.id)
                    }
                };

                let draft = ItemDraft {
                    platform: Some(platform),
                    item_type: item_type.or_else(|| ItemType::options_for(platform).first().copied()),
                    asset: Some(Asset::new(file_name, bytes)),
                    caption,
                    hashtags,
                    date,
                    time,
                    connection_id,
                };
                mutations::create_campaign_item(&self.client, campaign_id, &draft, &Local, &self.cancel)
                    .await?;
                let listing = self.items(campaign_id, 0).await?;
                Ok(format!("Item scheduled\n\n{}", listing))
            }
            Command::Posts { pages } => self.posts(pages).await,
            Command::Insights { provider_post_id } => {
                let rows = load_insights(&self.client, &provider_post_id, &self.cancel).await?;
                Ok(render_insights(&rows))
            }
        }
    }

    async fn campaigns(&self, status: CampaignStatus, page: u32) -> Result<String> {
        let mut loader = ListLoader::new(
            CampaignSource::new(self.client.clone()),
            PageMode::Replace,
            status,
            self.settings.campaign_page_size,
        );
        loader.set_page(page);
        loader.wait_idle().await;

        let tabs = CampaignStatus::TABS
            .iter()
            .map(|tab| if *tab == status { format!("[{}]", tab) } else { tab.to_string() })
            .join("  ");
        Ok(format!("{}\n{}", tabs, render_list(loader.list(), "No campaigns", campaign_row)))
    }

    async fn items(&self, campaign_id: CampaignId, page: u32) -> Result<String> {
        let mut loader = ListLoader::new(
            CampaignItemSource::new(self.client.clone(), campaign_id),
            PageMode::Replace,
            (),
            self.settings.page_size,
        );
        loader.set_page(page);
        loader.wait_idle().await;
        Ok(render_list(loader.list(), "No items in this campaign", item_row))
    }

    async fn posts(&self, pages: u32) -> Result<String> {
        let mut loader = ListLoader::new(
            PostSource::new(self.client.clone()),
            PageMode::Accumulate,
            (),
            self.settings.page_size,
        );
        loader.set_page(0);
        loader.wait_idle().await;
        for _ in 1..pages {
            if !loader.next_page() {
                break;
            }
            loader.wait_idle().await;
        }
        Ok(render_list(loader.list(), "No posts yet", post_row))
    }

    fn store_token(&self, token: Option<String>) -> Result<()> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("No token returned".to_string()))?;
        self.session()
            .set(Credential::new(token))
            .context("Failed to save session")
    }

    fn require_login(&self) -> Result<(), ApiError> {
        if self.session().is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }

    fn redirect_url(&self) -> Result<Url> {
        let redirect = self.settings.redirect_uri();
        Url::parse(&redirect).with_context(|| format!("Invalid app_origin '{}'", redirect))
    }

    fn connection_controller(&self, current: Url) -> ConnectionController<SystemBrowser> {
        ConnectionController::new(
            self.client.clone(),
            SystemBrowser::new(current),
            self.guard.clone(),
            self.settings.redirect_uri(),
        )
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn describe_outcome(outcome: &ResumeOutcome) -> String {
    match outcome {
        ResumeOutcome::NoCallback => "No authorization code in that URL".to_string(),
        ResumeOutcome::Ignored(IgnoreReason::Unauthenticated) => {
            "Ignored the authorization code: log in first, then connect again".to_string()
        }
        ResumeOutcome::Ignored(IgnoreReason::NoPendingAuthorization) => {
            "Ignored the authorization code: no connection was being set up".to_string()
        }
        ResumeOutcome::AlreadyConsumed => "That authorization code was already used".to_string(),
        ResumeOutcome::Cancelled => "Authorization cancelled".to_string(),
        ResumeOutcome::Settled(Settlement::Connected(provider)) => {
            format!("{} account connected", provider.label())
        }
        ResumeOutcome::Settled(Settlement::Failed(message)) => {
            format!("Connection failed: {}", message)
        }
    }
}

fn format_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_connections(list: &ConnectionList) -> String {
    if list.loading {
        return "Loading...".to_string();
    }
    if let Some(error) = &list.error {
        return format!("Error: {}", error);
    }
    if list.is_empty() {
        return "No connected accounts".to_string();
    }
    list.connections
        .iter()
        .map(|c| {
            format!(
                "{:>5}  {:<10} {:<24} {:<8} expires {}",
                c.id,
                c.platform.label(),
                c.title(),
                c.status.to_string(),
                format_time(c.expires_at)
            )
        })
        .join("\n")
}

/// Shared list rendering: loading, inline error, empty state, rows plus paging summary
pub fn render_list<T, F>(
    list: &ListController<T, F>,
    empty: &str,
    row: impl Fn(&T) -> String,
) -> String
where
    F: Clone + PartialEq,
{
    let mut out = match list.view() {
        ListView::Loading => return "Loading...".to_string(),
        ListView::Error(message) => return format!("Error: {}", message),
        ListView::Empty => empty.to_string(),
        ListView::Loaded(records) => records.iter().map(row).join("\n"),
    };
    if let Some(info) = list.page_info() {
        let _ = write!(out, "\n\n{}", info);
    }
    out
}

fn campaign_row(campaign: &Campaign) -> String {
    format!(
        "{:>5}  {:<28} {:<10} {:<24} {}{}",
        campaign.id,
        campaign.name,
        campaign.status.to_string(),
        campaign.platforms.iter().map(|p| p.label()).join(", "),
        format_time(campaign.created_at),
        if campaign.accepts_items() { "" } else { "  (read-only)" }
    )
}

fn item_row(item: &CampaignItem) -> String {
    format!(
        "{:>5}  {:<10} {:<6} {:<42} {:<24} {:<9} {}",
        item.id,
        item.platform.label(),
        item.item_type.to_string(),
        caption_preview(item.caption.as_deref()),
        item.hashtags.iter().join(" "),
        item.status.as_deref().unwrap_or("-"),
        format_time(item.scheduled_upload_at)
    )
}

fn post_row(post: &Post) -> String {
    let tags = post
        .caption
        .as_deref()
        .map(|c| caption_hashtags(c).into_iter().join(" "))
        .unwrap_or_default();
    format!(
        "{:>5}  {:<42} {:<24} {:<20} {}",
        post.id,
        caption_preview(post.caption.as_deref()),
        tags,
        post.provider_post_id.as_deref().unwrap_or("-"),
        format_time(post.created_at)
    )
}

pub fn render_insights(rows: &[KpiRow]) -> String {
    if rows.is_empty() {
        return "No insights available".to_string();
    }
    rows.iter()
        .map(|row| match &row.description {
            Some(description) => format!("{:<28} {:>12}  {}", row.label, row.value, description),
            None => format!("{:<28} {:>12}", row.label, row.value),
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use socialbug_session::{MemorySessionStore, PendingAuthorization, Provider, SessionError};

    fn app(url: String, session: MemorySessionStore) -> App {
        let settings = Settings {
            api_base_url: url,
            ..Settings::default()
        };
        App::new(settings, Arc::new(session))
    }

    #[tokio::test]
    async fn login_stores_returned_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(r#"{"token": "fresh"}"#)
            .create_async()
            .await;

        let app = app(server.url(), MemorySessionStore::new());
        let out = app
            .run(Command::Login {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(out, "Logged in");
        assert_eq!(app.client().session().get().unwrap().expose(), "fresh");
    }

    #[tokio::test]
    async fn login_without_token_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let app = app(server.url(), MemorySessionStore::new());
        let err = app
            .run(Command::Login {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::MalformedResponse(_))
        ));
        assert!(!app.client().session().is_authenticated());
    }

    struct ReadOnlySession;

    impl SessionStore for ReadOnlySession {
        fn get(&self) -> Option<Credential> {
            None
        }

        fn set(&self, _: Credential) -> Result<(), SessionError> {
            Err(SessionError::Storage("disk full".to_string()))
        }

        fn clear(&self) -> Result<(), SessionError> {
            Ok(())
        }

        fn set_pending(&self, _: Provider) -> Result<(), SessionError> {
            Ok(())
        }

        fn get_pending(&self) -> Option<PendingAuthorization> {
            None
        }

        fn clear_pending(&self) -> Result<(), SessionError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn login_reports_session_save_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(r#"{"token": "fresh"}"#)
            .create_async()
            .await;

        let settings = Settings {
            api_base_url: server.url(),
            ..Settings::default()
        };
        let app = App::new(settings, Arc::new(ReadOnlySession));
        let err = app
            .run(Command::Login {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to save session");
        assert!(err.downcast_ref::<ApiError>().is_none());
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let app = app("http://127.0.0.1:9".to_string(), MemorySessionStore::with_credential("t"));
        app.run(Command::Logout).await.unwrap();
        assert!(!app.client().session().is_authenticated());
    }

    #[tokio::test]
    async fn connect_requires_login() {
        let app = app("http://127.0.0.1:9".to_string(), MemorySessionStore::new());
        let err = app
            .run(Command::Connect {
                provider: socialbug_session::Provider::Instagram,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthenticated)));
        assert!(app.client().session().get_pending().is_none());
    }

    #[test]
    fn renders_connection_states() {
        let mut list = ConnectionList::new();
        assert_eq!(render_connections(&list), "No connected accounts");
        list.error = Some("boom".to_string());
        assert_eq!(render_connections(&list), "Error: boom");
        list.loading = true;
        assert_eq!(render_connections(&list), "Loading...");
    }

    #[test]
    fn renders_insight_rows() {
        let rows = vec![KpiRow {
            label: "Reach".to_string(),
            value: "12".to_string(),
            description: None,
        }];
        assert!(render_insights(&rows).starts_with("Reach"));
        assert_eq!(render_insights(&[]), "No insights available");
    }
}
