use regex::Regex;
use socialbug_api::endpoints::insights::InsightMetric;
use std::sync::LazyLock;
use socialbug_api::{ApiError, CancellationToken, Client, Request};

/// Longest caption shown in list rows before it is cut
pub const CAPTION_PREVIEW_CHARS: usize = 40;

/// One KPI line of the insights view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiRow {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
}

impl From<&InsightMetric> for KpiRow {
    fn from(metric: &InsightMetric) -> Self {
        Self {
            label: metric.label().to_string(),
            value: metric.first_value().unwrap_or_else(|| "-".to_string()),
            description: metric.description.clone().filter(|d| !d.is_empty()),
        }
    }
}

pub async fn load_insights(
    client: &Client,
    provider_post_id: &str,
    cancel: &CancellationToken,
) -> Result<Vec<KpiRow>, ApiError> {
    let response = client
        .send(Request::insights().get(provider_post_id), cancel)
        .await?;
    Ok(response.data.iter().map(KpiRow::from).collect())
}

/// `#` followed by at least one ASCII letter, digit or underscore
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("valid hashtag pattern"));

/// Every `#tag` in a caption, in order of appearance
pub fn caption_hashtags(caption: &str) -> Vec<&str> {
    HASHTAG.find_iter(caption).map(|m| m.as_str()).collect()
}

/// Caption cut to [`CAPTION_PREVIEW_CHARS`] characters, `-` when missing
pub fn caption_preview(caption: Option<&str>) -> String {
    let caption = caption.filter(|c| !c.is_empty()).unwrap_or("-");
    if caption.chars().count() > CAPTION_PREVIEW_CHARS {
        let cut: String = caption.chars().take(CAPTION_PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        caption.to_string()
    }
}
