pub mod auth;
pub mod campaign_items;
pub mod campaigns;
pub mod connections;
pub mod files;
pub mod insights;
pub mod posts;

use serde::{Deserialize, Serialize};

pub type CampaignId = i64;
pub type ConnectionId = i64;

/// Sort order used by every list screen
pub const DEFAULT_SORT: &str = "createdAt,desc";

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn info(&self) -> PageInfo {
        PageInfo {
            number: self.number,
            first: self.first,
            last: self.last,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        }
    }
}

/// Paging metadata without the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub number: u32,
    pub first: bool,
    pub last: bool,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl std::fmt::Display for PageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Page {} of {} · Total {}",
            self.number + 1,
            self.total_pages.max(1),
            self.total_elements
        )
    }
}

/// Paging query parameters shared by list requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageParams {
    pub page: u32,
    pub size: u32,
    pub sort: String,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

/// Which of the known creation paths a request targets
///
/// Some deployments only expose the older `/create` suffixed routes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    #[default]
    Primary,
    Fallback,
}

/// Lenient timestamp decoding: RFC 3339 or a zone-less ISO date-time read as UTC
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
        }
    }
}
