use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use socialbug_api::ApiError;
use socialbug_api::endpoints::ConnectionId;
use socialbug_api::endpoints::campaign_items::{ItemType, NEW_ITEM_STATUS, NewCampaignItem};
use socialbug_session::Provider;

/// Media file to upload with a new item
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Form input for a new campaign
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDraft {
    pub name: String,
    pub description: String,
    pub platform: Provider,
}

impl CampaignDraft {
    pub fn new(name: impl Into<String>, platform: Provider) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            platform,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("Campaign name is required"));
        }
        Ok(())
    }
}

/// Form input for a new campaign item, as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub platform: Option<Provider>,
    pub item_type: Option<ItemType>,
    pub asset: Option<Asset>,
    pub caption: String,
    /// Free text, e.g. `#launch #spring`
    pub hashtags: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub time: String,
    pub connection_id: Option<ConnectionId>,
}

/// An item draft that passed local validation; only the asset URL is missing
#[derive(Debug, Clone, PartialEq)]
pub struct ValidItem<'a> {
    pub platform: Provider,
    pub item_type: ItemType,
    pub asset: &'a Asset,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub scheduled_upload_at: DateTime<Utc>,
    pub connection_id: ConnectionId,
}

impl ValidItem<'_> {
    pub fn into_payload(self, image_url: String) -> NewCampaignItem {
        NewCampaignItem {
            platform: self.platform,
            item_type: self.item_type,
            image_url,
            caption: self.caption,
            hashtags: self.hashtags,
            status: NEW_ITEM_STATUS,
            scheduled_upload_at: self.scheduled_upload_at,
            connection_id: self.connection_id,
        }
    }
}

impl ItemDraft {
    /// Check every field before anything touches the network
    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<ValidItem<'_>, ApiError> {
        let (Some(platform), Some(item_type), Some(asset)) =
            (self.platform, self.item_type, self.asset.as_ref())
        else {
            return Err(ApiError::validation("All fields are required"));
        };
        if self.caption.is_empty()
            || self.hashtags.is_empty()
            || self.date.is_empty()
            || self.time.is_empty()
        {
            return Err(ApiError::validation("All fields are required"));
        }

        if !ItemType::options_for(platform).contains(&item_type) {
            return Err(ApiError::validation(format!(
                "{} items are not supported on {}",
                item_type,
                platform.label()
            )));
        }

        let scheduled_upload_at = combine_schedule(&self.date, &self.time, tz)?;
        let connection_id = self
            .connection_id
            .ok_or_else(|| ApiError::validation("Please select an account"))?;

        Ok(ValidItem {
            platform,
            item_type,
            asset,
            caption: self.caption.clone(),
            hashtags: tokenize_hashtags(&self.hashtags),
            scheduled_upload_at,
            connection_id,
        })
    }
}

/// Split free-text hashtag input on whitespace; blank input gives no tags
pub fn tokenize_hashtags(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// Join a date and a wall-clock time in `tz` into one instant
pub fn combine_schedule<Tz: TimeZone>(
    date: &str,
    time: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, ApiError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid date '{}'. Use YYYY-MM-DD", date)))?;

    let time = time.trim();
    let clock = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| ApiError::validation(format!("Invalid time '{}'. Use HH:MM", time)))?;

    tz.from_local_datetime(&day.and_time(clock))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ApiError::validation(format!("{} {} does not exist in the local time zone", date, time))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn complete_draft() -> ItemDraft {
        ItemDraft {
            platform: Some(Provider::Instagram),
            item_type: Some(ItemType::Story),
            asset: Some(Asset::new("cat.png", vec![1, 2, 3])),
            caption: "Hello".to_string(),
            hashtags: "#a  #b".to_string(),
            date: "2025-03-01".to_string(),
            time: "09:30".to_string(),
            connection_id: Some(7),
        }
    }

    fn validation_message(result: Result<ValidItem<'_>, ApiError>) -> String {
        match result {
            Err(ApiError::ValidationFailed(message)) => message,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_tokenize_hashtags() {
        assert_eq!(tokenize_hashtags(""), Vec::<String>::new());
        assert_eq!(tokenize_hashtags("   "), Vec::<String>::new());
        assert_eq!(tokenize_hashtags("#a"), vec!["#a"]);
        assert_eq!(tokenize_hashtags(" #a \t#b\n#c "), vec!["#a", "#b", "#c"]);
    }

    #[test]
    fn test_combine_schedule_in_fixed_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = combine_schedule("2025-03-01", "09:30", &tz).unwrap();
        assert_eq!(at.to_rfc3339(), "2025-03-01T07:30:00+00:00");

        let at = combine_schedule("2025-03-01", "09:30:15", &Utc).unwrap();
        assert_eq!(at.to_rfc3339(), "2025-03-01T09:30:15+00:00");
    }

    #[test]
    fn test_combine_schedule_rejects_garbage() {
        assert!(matches!(
            combine_schedule("03/01/2025", "09:30", &Utc),
            Err(ApiError::ValidationFailed(_))
        ));
        assert!(matches!(
            combine_schedule("2025-02-30", "09:30", &Utc),
            Err(ApiError::ValidationFailed(_))
        ));
        assert!(matches!(
            combine_schedule("2025-03-01", "25:00", &Utc),
            Err(ApiError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_valid_draft_builds_pending_payload() {
        let draft = complete_draft();
        let item = draft.validate(&Utc).unwrap();
        assert_eq!(item.hashtags, vec!["#a", "#b"]);

        let payload = item.into_payload("http://cdn/cat.png".to_string());
        assert_eq!(payload.status, "PENDING");
        assert_eq!(payload.connection_id, 7);
        assert_eq!(payload.image_url, "http://cdn/cat.png");
    }

    #[test]
    fn test_missing_fields_fail() {
        let mut draft = complete_draft();
        draft.asset = None;
        assert_eq!(validation_message(draft.validate(&Utc)), "All fields are required");

        let mut draft = complete_draft();
        draft.hashtags.clear();
        assert_eq!(validation_message(draft.validate(&Utc)), "All fields are required");

        let mut draft = complete_draft();
        draft.connection_id = None;
        assert_eq!(validation_message(draft.validate(&Utc)), "Please select an account");
    }

    #[test]
    fn test_item_type_must_match_platform() {
        let mut draft = complete_draft();
        draft.platform = Some(Provider::Twitter);
        let message = validation_message(draft.validate(&Utc));
        assert!(message.contains("STORY"), "{}", message);
    }

    #[test]
    fn test_campaign_name_required() {
        assert!(CampaignDraft::new("  ", Provider::LinkedIn).validate().is_err());
        assert!(CampaignDraft::new("Spring", Provider::LinkedIn).validate().is_ok());
    }
}
