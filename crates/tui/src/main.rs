mod app;
mod client;
mod config;
mod error;
mod ui;

use std::{fs, path::Path, sync::Mutex};

use crate::{config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(
        base_url = %config.base_url,
        customer_id = config.customer_id,
        "starting bankdesk_tui"
    );

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let path = Path::new(&config.log_file);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;

    let level = config.log_level.trim();
    tracing_subscriber::fmt()
        .with_env_filter(format!("bankdesk_tui={level},history={level}"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
