use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use socialbug::cli::Cli;
use socialbug::logging::{default_logs_dir, init_logging};
use socialbug::App;
use socialbug_session::{FileSessionStore, SessionStore, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logs_dir = match cli.log_dir.clone() {
        Some(dir) => dir,
        None => default_logs_dir()?,
    };
    let log_path = init_logging(&logs_dir)?;
    tracing::info!(log = %log_path.display(), "socialbug starting");

    let settings = Settings::load(&cli.config).context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let session: Arc<dyn SessionStore> = match &settings.session_path {
        Some(path) => Arc::new(FileSessionStore::open(path)?),
        None => Arc::new(FileSessionStore::new()?),
    };

    let app = App::new(settings, session);
    match app.run(cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
