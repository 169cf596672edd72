use config::{Config, File};

use crate::error::SessionError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Origin the app is served from; the OAuth redirect lands on `{app_origin}/connections`
    #[serde(default = "default_app_origin")]
    pub app_origin: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_campaign_page_size")]
    pub campaign_page_size: u32,
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "http://localhost:8081/api".to_string()
}

fn default_app_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_campaign_page_size() -> u32 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            app_origin: default_app_origin(),
            page_size: default_page_size(),
            campaign_page_size: default_campaign_page_size(),
            session_path: None,
        }
    }
}

impl Settings {
    /// Load from `$SOCIALBUG_CONFIG` (default `config.toml`) and `SOCIALBUG__*` variables
    pub fn new() -> Result<Self, SessionError> {
        let config_path =
            std::env::var("SOCIALBUG_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load(&config_path)
    }

    /// Load from an explicit file; a missing file just means defaults
    pub fn load(config_path: &str) -> Result<Self, SessionError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SOCIALBUG").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (key, value) in [
            ("api_base_url", &self.api_base_url),
            ("app_origin", &self.app_origin),
        ] {
            if value.is_empty() {
                return Err(format!("{} is required", key));
            }
            if !value.starts_with("http") {
                return Err(format!("{} must be a valid HTTP(S) URL", key));
            }
        }
        if self.page_size == 0 || self.campaign_page_size == 0 {
            return Err("page sizes must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Callback URL handed to the provider during authorization
    pub fn redirect_uri(&self) -> String {
        format!("{}/connections", self.app_origin.trim_end_matches('/'))
    }
}
