use super::{PageQuery, PageSource};
use async_trait::async_trait;
use socialbug_api::endpoints::campaign_items::CampaignItem;
use socialbug_api::endpoints::campaigns::{Campaign, CampaignStatus};
use socialbug_api::endpoints::posts::Post;
use socialbug_api::endpoints::{CampaignId, Page};
use socialbug_api::{ApiError, CancellationToken, Client, Request};
use std::sync::Arc;

/// Campaigns filtered by status tab
pub struct CampaignSource {
    client: Arc<Client>,
}

impl CampaignSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for CampaignSource {
    type Item = Campaign;
    type Filter = CampaignStatus;

    async fn fetch(
        &self,
        query: &PageQuery<CampaignStatus>,
        cancel: &CancellationToken,
    ) -> Result<Page<Campaign>, ApiError> {
        let request = Request::campaigns()
            .list(query.filter)
            .page(query.page)
            .size(query.size)
            .sort(query.sort.clone());
        self.client.send(request, cancel).await
    }
}

/// Items scheduled under one campaign
pub struct CampaignItemSource {
    client: Arc<Client>,
    campaign_id: CampaignId,
}

impl CampaignItemSource {
    pub fn new(client: Arc<Client>, campaign_id: CampaignId) -> Self {
        Self {
            client,
            campaign_id,
        }
    }
}

#[async_trait]
impl PageSource for CampaignItemSource {
    type Item = CampaignItem;
    type Filter = ();

    async fn fetch(
        &self,
        query: &PageQuery<()>,
        cancel: &CancellationToken,
    ) -> Result<Page<CampaignItem>, ApiError> {
        let request = Request::campaign_items(self.campaign_id)
            .list()
            .page(query.page)
            .size(query.size)
            .sort(query.sort.clone());
        self.client.send(request, cancel).await
    }
}

/// Published posts feed
pub struct PostSource {
    client: Arc<Client>,
}

impl PostSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for PostSource {
    type Item = Post;
    type Filter = ();

    async fn fetch(
        &self,
        query: &PageQuery<()>,
        cancel: &CancellationToken,
    ) -> Result<Page<Post>, ApiError> {
        let request = Request::posts()
            .list()
            .page(query.page)
            .size(query.size)
            .sort(query.sort.clone());
        self.client.send(request, cancel).await
    }
}
