use crate::endpoints::{
    CampaignId, ConnectionId,
    auth::{Login, Register},
    campaign_items::{CreateCampaignItem, ListCampaignItems, NewCampaignItem},
    campaigns::{CampaignStatus, CreateCampaign, ListCampaigns},
    connections::{
        AuthorizeConnection, CompleteConnection, DisconnectConnection, ListActiveConnections,
    },
    files::UploadFile,
    insights::GetInsights,
    posts::ListPosts,
};
use socialbug_session::Provider;

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) -> Login {
        Login::new(email, password)
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Register {
        Register::new(name, email, password)
    }
}

pub struct ConnectionRepository;

impl ConnectionRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn authorize(&self, provider: Provider, redirect_uri: impl Into<String>) -> AuthorizeConnection {
        AuthorizeConnection::new(provider, redirect_uri)
    }

    pub fn complete(
        &self,
        provider: Provider,
        code: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> CompleteConnection {
        CompleteConnection::new(provider, code, redirect_uri)
    }

    pub fn active(&self) -> ListActiveConnections {
        ListActiveConnections
    }

    pub fn disconnect(&self, id: ConnectionId) -> DisconnectConnection {
        DisconnectConnection::new(id)
    }
}

pub struct CampaignRepository;

impl CampaignRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self, status: CampaignStatus) -> ListCampaigns {
        ListCampaigns::new(status)
    }

    pub fn create(&self, name: impl Into<String>) -> CreateCampaign {
        CreateCampaign::new(name)
    }
}

pub struct CampaignItemRepository {
    campaign_id: CampaignId,
}

impl CampaignItemRepository {
    pub fn new(campaign_id: CampaignId) -> Self {
        Self { campaign_id }
    }

    pub fn list(&self) -> ListCampaignItems {
        ListCampaignItems::new(self.campaign_id)
    }

    pub fn create(&self, item: NewCampaignItem) -> CreateCampaignItem {
        CreateCampaignItem::new(self.campaign_id, item)
    }
}

pub struct FileRepository;

impl FileRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn upload(&self, file_name: impl Into<String>, bytes: Vec<u8>) -> UploadFile {
        UploadFile::new(file_name, bytes)
    }
}

pub struct PostRepository;

impl PostRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self) -> ListPosts {
        ListPosts::new()
    }
}

pub struct InsightRepository;

impl InsightRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn get(&self, provider_post_id: impl Into<String>) -> GetInsights {
        GetInsights::new(provider_post_id)
    }
}
