use anyhow::{Context, Result};

use crate::models::theme::ThemeColor;

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_sessions: usize,
    pub default_theme_color: ThemeColor,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let theme = lookup("DEFAULT_THEME_COLOR").unwrap_or_else(|| "#2563eb".to_string());

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_sessions: lookup("MAX_SESSIONS")
                .unwrap_or_else(|| "1000".to_string())
                .parse::<usize>()
                .context("MAX_SESSIONS must be a non-negative integer")?,
            default_theme_color: ThemeColor::parse(&theme)
                .with_context(|| format!("DEFAULT_THEME_COLOR '{theme}' is not a #rrggbb color"))?,
        })
    }
}
