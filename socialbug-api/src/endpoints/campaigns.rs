use super::{CampaignId, DEFAULT_SORT, PageParams, Page, Route, timestamp};
use crate::macros::{paged, setter};
use crate::{Endpoint, RequestData};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use socialbug_session::Provider;
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub platforms: Vec<Provider>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Only running campaigns take new items
    pub fn accepts_items(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

/// Campaign lifecycle; doubles as the list tab filter
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CampaignStatus {
    #[default]
    Active,
    Completed,
    Canceled,
}

impl CampaignStatus {
    pub const TABS: [CampaignStatus; 3] = [
        CampaignStatus::Active,
        CampaignStatus::Completed,
        CampaignStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignStatus::TABS
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown campaign status '{}'", s))
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ListCampaigns {
    status: CampaignStatus,
    #[serde(flatten)]
    params: PageParams,
}

impl ListCampaigns {
    pub fn new(status: CampaignStatus) -> Self {
        Self {
            status,
            params: PageParams::default(),
        }
    }

    paged!();
}

impl Endpoint for ListCampaigns {
    type Data = Self;
    type Response = Page<Campaign>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/campaigns".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCampaign {
    #[serde(skip)]
    route: Route,
    name: String,
    description: String,
    platforms: Vec<Provider>,
}

impl CreateCampaign {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            route: Route::Primary,
            name: name.into(),
            description: String::new(),
            platforms: Vec::new(),
        }
    }

    setter!(description: String);
    setter!(platforms: Vec<Provider>);

    pub fn via(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// Primary route followed by the legacy `/create` route
    pub fn candidates(self) -> [CreateCampaign; 2] {
        [self.clone(), self.via(Route::Fallback)]
    }
}

impl Endpoint for CreateCampaign {
    type Data = Self;
    type Response = serde_json::Value;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        match self.route {
            Route::Primary => "/campaigns".into(),
            Route::Fallback => "/campaigns/create".into(),
        }
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

impl Default for ListCampaigns {
    fn default() -> Self {
        Self::new(CampaignStatus::default())
    }
}
