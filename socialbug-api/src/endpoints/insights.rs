use crate::Endpoint;
use crate::request::encode_segment;
use serde::Deserialize;
use std::borrow::Cow;

// Common

/// One KPI as reported by the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightMetric {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<InsightValue>,
    #[serde(default)]
    pub description: Option<String>,
}

impl InsightMetric {
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("-")
    }

    /// First reported value, rendered as text
    pub fn first_value(&self) -> Option<String> {
        self.values.first().map(|v| match &v.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightValue {
    #[serde(default)]
    pub value: serde_json::Value,
}

// Requests

#[derive(Debug, Clone)]
pub struct GetInsights {
    provider_post_id: String,
}

impl GetInsights {
    pub fn new(provider_post_id: impl Into<String>) -> Self {
        Self {
            provider_post_id: provider_post_id.into(),
        }
    }
}

impl Endpoint for GetInsights {
    type Data = ();
    type Response = InsightsResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/insights/{}", encode_segment(&self.provider_post_id)).into()
    }
}

// Responses

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub data: Vec<InsightMetric>,
}
