//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Matcher tuning overrides; anything unset keeps the engine default.
#[derive(Debug, Default, Deserialize)]
pub struct Matcher {
    pub amount_tolerance_bps: Option<i64>,
    pub date_window_days: Option<i64>,
    pub amount_weight: Option<f64>,
    pub date_weight: Option<f64>,
    pub text_weight: Option<f64>,
    pub pattern_boost: Option<f64>,
    pub high_threshold: Option<f64>,
    pub medium_threshold: Option<f64>,
    pub low_threshold: Option<f64>,
}

impl Matcher {
    pub fn apply(&self, mut cfg: engine::MatcherConfig) -> engine::MatcherConfig {
        if let Some(value) = self.amount_tolerance_bps {
            cfg.amount_tolerance_bps = value;
        }
        if let Some(value) = self.date_window_days {
            cfg.date_window_days = value;
        }
        if let Some(value) = self.amount_weight {
            cfg.amount_weight = value;
        }
        if let Some(value) = self.date_weight {
            cfg.date_weight = value;
        }
        if let Some(value) = self.text_weight {
            cfg.text_weight = value;
        }
        if let Some(value) = self.pattern_boost {
            cfg.pattern_boost = value;
        }
        if let Some(value) = self.high_threshold {
            cfg.high_threshold = value;
        }
        if let Some(value) = self.medium_threshold {
            cfg.medium_threshold = value;
        }
        if let Some(value) = self.low_threshold {
            cfg.low_threshold = value;
        }
        cfg
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub matcher: Matcher,
    /// Minutes before an in-progress idempotency record may be reclaimed.
    pub idempotency_staleness_minutes: Option<i64>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
