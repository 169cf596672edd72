use super::{Page, PageParams, timestamp};
use crate::macros::paged;
use crate::{Endpoint, RequestData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

/// A published post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Identifier of the post on the provider, used for insights
    #[serde(default)]
    pub provider_post_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListPosts {
    #[serde(flatten)]
    params: PageParams,
}

impl ListPosts {
    pub fn new() -> Self {
        Self::default()
    }

    paged!();
}

impl Endpoint for ListPosts {
    type Data = Self;
    type Response = Page<Post>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/posts".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}
