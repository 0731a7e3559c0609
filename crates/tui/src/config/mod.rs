use std::num::NonZeroUsize;

use api_types::transaction::TransactionKind;
use chrono_tz::Tz;
use clap::Parser;
use history::{DEFAULT_PAGE_SIZE, DateRange, SortField, parse_kind_filter};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/bankdesk.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub customer_id: i64,
    pub token: Option<String>,
    pub timezone: String,
    pub page_size: usize,
    /// Initial kind filter; empty shows every kind.
    pub kind: String,
    /// Initial date filter, e.g. `last7days`.
    pub date_range: String,
    /// Initial sort field, e.g. `amount`.
    pub sort: String,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            customer_id: 1,
            token: None,
            timezone: "UTC".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            kind: String::new(),
            date_range: DateRange::All.as_str().to_string(),
            sort: SortField::OccurredAt.as_str().to_string(),
            log_level: "info".to_string(),
            log_file: "logs/bankdesk_tui.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|err| AppError::Setting(format!("timezone {:?}: {err}", self.timezone)))
    }

    pub fn page_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.page_size)
            .ok_or_else(|| AppError::Setting("page_size must be at least 1".to_string()))
    }

    pub fn kind_filter(&self) -> Result<Option<TransactionKind>> {
        Ok(parse_kind_filter(&self.kind)?)
    }

    pub fn date_range(&self) -> Result<DateRange> {
        Ok(self.date_range.trim().parse()?)
    }

    pub fn sort_field(&self) -> Result<SortField> {
        Ok(self.sort.trim().parse()?)
    }

    /// Bearer token, if one is configured and non-blank.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Parser)]
#[command(name = "bankdesk_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the customer whose history is shown.
    #[arg(long)]
    customer_id: Option<i64>,
    /// Bearer token sent with every request.
    #[arg(long)]
    token: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Rows per page.
    #[arg(long)]
    page_size: Option<usize>,
    /// Log level for the file log (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_with(Args::parse())
}

fn load_with(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BANKDESK_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(customer_id) = args.customer_id {
        settings.customer_id = customer_id;
    }
    if let Some(token) = args.token {
        settings.token = Some(token);
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["bankdesk_tui", "--config", "does/not/exist.toml"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cli_overrides_defaults() {
        let settings = load_with(args(&[
            "--base-url",
            "http://bank.local/api/",
            "--customer-id",
            "42",
            "--timezone",
            "Europe/Rome",
            "--page-size",
            "25",
        ]))
        .unwrap();

        assert_eq!(settings.base_url, "http://bank.local/api/");
        assert_eq!(settings.customer_id, 42);
        assert_eq!(settings.timezone().unwrap(), chrono_tz::Europe::Rome);
        assert_eq!(settings.page_size().unwrap().get(), 25);
        assert_eq!(settings.kind_filter().unwrap(), None);
        assert_eq!(settings.date_range().unwrap(), DateRange::All);
        assert_eq!(settings.sort_field().unwrap(), SortField::OccurredAt);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            page_size: 0,
            kind: "refund".to_string(),
            date_range: "yesterday".to_string(),
            sort: "notes".to_string(),
            ..AppConfig::default()
        };

        assert!(matches!(settings.timezone(), Err(AppError::Setting(_))));
        assert!(matches!(settings.page_size(), Err(AppError::Setting(_))));
        assert!(matches!(settings.kind_filter(), Err(AppError::History(_))));
        assert!(matches!(settings.date_range(), Err(AppError::History(_))));
        assert!(matches!(settings.sort_field(), Err(AppError::History(_))));
    }

    #[test]
    fn blank_token_is_ignored() {
        let mut settings = AppConfig {
            token: Some("  ".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(settings.token(), None);

        settings.token = Some("abc".to_string());
        assert_eq!(settings.token(), Some("abc"));
    }
}
