mod draft;

pub use draft::{
    Asset, CampaignDraft, ItemDraft, ValidItem, combine_schedule, tokenize_hashtags,
};

use chrono::TimeZone;
use socialbug_api::endpoints::{CampaignId, ConnectionId};
use socialbug_api::{ApiError, CancellationToken, Client, Request};

// Callers reload their own lists after any of these succeed.

/// Create a campaign, trying the legacy route only if the primary one is missing
pub async fn create_campaign(
    client: &Client,
    draft: &CampaignDraft,
    cancel: &CancellationToken,
) -> Result<(), ApiError> {
    draft.validate()?;

    let request = Request::campaigns()
        .create(draft.name.clone())
        .description(draft.description.clone())
        .platforms(vec![draft.platform]);

    client.send_first_found(request.candidates(), cancel).await?;
    tracing::info!(name = %draft.name, "Campaign created");
    Ok(())
}

/// Upload the asset, then create the item that references it
///
/// Nothing is sent unless the whole draft is valid, and the item is never
/// created without a confirmed asset URL.
pub async fn create_campaign_item<Tz: TimeZone>(
    client: &Client,
    campaign_id: CampaignId,
    draft: &ItemDraft,
    tz: &Tz,
    cancel: &CancellationToken,
) -> Result<(), ApiError> {
    let item = draft.validate(tz)?;

    let upload = Request::files().upload(item.asset.file_name.clone(), item.asset.bytes.clone());
    let uploaded = client.send(upload, cancel).await?;
    let image_url = uploaded
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::MalformedResponse("No URL returned from upload".to_string()))?;
    tracing::debug!(%image_url, "Asset uploaded");

    let request = Request::campaign_items(campaign_id).create(item.into_payload(image_url));
    client.send_first_found(request.candidates(), cancel).await?;
    tracing::info!(campaign_id, "Campaign item created");
    Ok(())
}

pub async fn disconnect_connection(
    client: &Client,
    id: ConnectionId,
    cancel: &CancellationToken,
) -> Result<(), ApiError> {
    client
        .send(Request::connections().disconnect(id), cancel)
        .await?;
    tracing::info!(connection_id = id, "Connection disconnected");
    Ok(())
}
