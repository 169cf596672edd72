use clap::{Parser, Subcommand};
use socialbug_api::endpoints::campaign_items::ItemType;
use socialbug_api::endpoints::campaigns::CampaignStatus;
use socialbug_api::endpoints::{CampaignId, ConnectionId};
use socialbug_session::Provider;
use std::path::PathBuf;

/// Schedule social media campaigns from the terminal
#[derive(Debug, Parser)]
#[command(name = "socialbug", version)]
pub struct Cli {
    /// Config file (TOML)
    #[arg(long, env = "SOCIALBUG_CONFIG", default_value = "config.toml", global = true)]
    pub config: String,

    /// Directory for log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        /// Read from SOCIALBUG_PASSWORD when omitted
        #[arg(short, long, env = "SOCIALBUG_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SOCIALBUG_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the session token and any unfinished authorization
    Logout,

    /// Link a social account (INSTAGRAM, LINKEDIN, TWITTER)
    Connect { provider: Provider },

    /// Finish linking with the URL the provider redirected to
    Resume { callback_url: String },

    /// List linked accounts
    Connections,

    /// Unlink an account
    Disconnect { id: ConnectionId },

    /// List campaigns by status
    Campaigns {
        /// ACTIVE, COMPLETED or CANCELED
        #[arg(short, long, default_value = "ACTIVE")]
        status: CampaignStatus,
        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// Create a campaign for one platform
    CreateCampaign {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, default_value = "INSTAGRAM")]
        platform: Provider,
    },

    /// List the items of a campaign
    Items {
        campaign_id: CampaignId,
        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// Schedule a new item in a campaign
    CreateItem {
        #[arg(long)]
        campaign_id: CampaignId,
        #[arg(long)]
        platform: Provider,
        /// Defaults to the first type the platform supports
        #[arg(long = "type")]
        item_type: Option<ItemType>,
        /// Image to upload
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        caption: String,
        /// Space separated, e.g. "#launch #spring"
        #[arg(long)]
        hashtags: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM, local time
        #[arg(long)]
        time: String,
        /// Defaults to the first active account on the platform
        #[arg(long)]
        account: Option<ConnectionId>,
    },

    /// Show published posts
    Posts {
        /// How many pages to scroll through
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Show provider metrics for a post
    Insights { provider_post_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_provider_case_insensitively() {
        let cli = Cli::try_parse_from(["socialbug", "connect", "linkedin"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Connect {
                provider: Provider::LinkedIn
            }
        ));
    }

    #[test]
    fn campaigns_default_to_active_first_page() {
        let cli = Cli::try_parse_from(["socialbug", "campaigns"]).unwrap();
        match cli.command {
            Command::Campaigns { status, page } => {
                assert_eq!(status, CampaignStatus::Active);
                assert_eq!(page, 0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["socialbug", "campaigns", "--status", "PAUSED"]).is_err());
    }
}
