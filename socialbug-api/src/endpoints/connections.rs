use super::{ConnectionId, timestamp};
use crate::{Endpoint, RequestData};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use socialbug_session::Provider;
use std::borrow::Cow;

// Common

/// A linked third-party account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub platform: Provider,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    pub status: ConnectionStatus,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Connection {
    /// Display name, falling back to the username
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.username.as_deref())
            .unwrap_or("")
    }

    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    Active,
    Expired,
    Revoked,
    Disconnected,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConnectionStatus::Active => "ACTIVE",
            ConnectionStatus::Expired => "EXPIRED",
            ConnectionStatus::Revoked => "REVOKED",
            ConnectionStatus::Disconnected => "DISCONNECTED",
            ConnectionStatus::Unknown => "UNKNOWN",
        })
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeConnection {
    #[serde(skip)]
    provider: Provider,
    redirect_uri: String,
}

impl AuthorizeConnection {
    pub fn new(provider: Provider, redirect_uri: impl Into<String>) -> Self {
        Self {
            provider,
            redirect_uri: redirect_uri.into(),
        }
    }
}

impl Endpoint for AuthorizeConnection {
    type Data = Self;
    type Response = AuthorizationUrl;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/connections/{}/authorize", self.provider).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

/// Exchange of an authorization code returned by the provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteConnection {
    #[serde(skip)]
    provider: Provider,
    code: String,
    redirect_uri: String,
}

impl CompleteConnection {
    pub fn new(provider: Provider, code: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            provider,
            code: code.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

impl Endpoint for CompleteConnection {
    type Data = Self;
    type Response = serde_json::Value;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/connections/{}/callback", self.provider).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Default, Debug, Clone)]
pub struct ListActiveConnections;

impl Endpoint for ListActiveConnections {
    type Data = ();
    type Response = ConnectionsResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/connections/active".into()
    }
}

#[derive(Debug, Clone)]
pub struct DisconnectConnection {
    id: ConnectionId,
}

impl DisconnectConnection {
    pub fn new(id: ConnectionId) -> Self {
        Self { id }
    }
}

impl Endpoint for DisconnectConnection {
    type Data = ();
    type Response = serde_json::Value;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/connections/{}/disconnect", self.id).into()
    }
}

// Responses

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationUrl {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub content: Vec<Connection>,
}
