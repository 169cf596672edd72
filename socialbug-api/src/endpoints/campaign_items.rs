use super::{CampaignId, ConnectionId, Page, PageParams, Route, timestamp};
use crate::macros::paged;
use crate::{Endpoint, RequestData};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize, Serializer};
use socialbug_session::Provider;
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignItem {
    pub id: i64,
    pub platform: Provider,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub scheduled_upload_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    Post,
    Story,
    Text,
}

impl ItemType {
    /// Item types the backend accepts for a platform, preferred first
    pub fn options_for(platform: Provider) -> &'static [ItemType] {
        match platform {
            Provider::Instagram => &[ItemType::Post, ItemType::Story],
            Provider::LinkedIn => &[ItemType::Text, ItemType::Post],
            Provider::Twitter => &[ItemType::Post],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Post => "POST",
            ItemType::Story => "STORY",
            ItemType::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [ItemType::Post, ItemType::Story, ItemType::Text]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown item type '{}'", s))
    }
}

/// Payload of a new scheduled item; always created as `PENDING`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaignItem {
    pub platform: Provider,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub image_url: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub status: &'static str,
    #[serde(serialize_with = "serialize_instant")]
    pub scheduled_upload_at: DateTime<Utc>,
    pub connection_id: ConnectionId,
}

pub const NEW_ITEM_STATUS: &str = "PENDING";

fn serialize_instant<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ListCampaignItems {
    #[serde(skip)]
    campaign_id: CampaignId,
    #[serde(flatten)]
    params: PageParams,
}

impl ListCampaignItems {
    pub fn new(campaign_id: CampaignId) -> Self {
        Self {
            campaign_id,
            params: PageParams::default(),
        }
    }

    paged!();
}

impl Endpoint for ListCampaignItems {
    type Data = Self;
    type Response = Page<CampaignItem>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/campaigns/{}/items", self.campaign_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCampaignItem {
    campaign_id: CampaignId,
    route: Route,
    item: NewCampaignItem,
}

impl CreateCampaignItem {
    pub fn new(campaign_id: CampaignId, item: NewCampaignItem) -> Self {
        Self {
            campaign_id,
            route: Route::Primary,
            item,
        }
    }

    pub fn via(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// Primary route followed by the legacy `/items/create` route
    pub fn candidates(self) -> [CreateCampaignItem; 2] {
        [self.clone(), self.via(Route::Fallback)]
    }
}

impl Endpoint for CreateCampaignItem {
    type Data = NewCampaignItem;
    type Response = serde_json::Value;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        match self.route {
            Route::Primary => format!("/campaigns/{}/items", self.campaign_id).into(),
            Route::Fallback => format!("/campaigns/{}/items/create", self.campaign_id).into(),
        }
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_item_serializes_backend_field_names() {
        let item = NewCampaignItem {
            platform: Provider::Instagram,
            item_type: ItemType::Story,
            image_url: "https://cdn.example.com/a.png".to_string(),
            caption: "hello".to_string(),
            hashtags: vec!["#a".to_string()],
            status: NEW_ITEM_STATUS,
            scheduled_upload_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            connection_id: 4,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "STORY");
        assert_eq!(json["imageUrl"], "https://cdn.example.com/a.png");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["scheduledUploadAt"], "2024-01-01T10:00:00.000Z");
        assert_eq!(json["connectionId"], 4);
    }

    #[test]
    fn type_options_follow_platform_rules() {
        assert_eq!(
            ItemType::options_for(Provider::LinkedIn),
            &[ItemType::Text, ItemType::Post]
        );
        assert_eq!(ItemType::options_for(Provider::Twitter), &[ItemType::Post]);
    }
}
