use core::fmt::{Debug, Display};
use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "festival.toml";
pub const ENV_PREFIX: &str = "FESTIVAL_";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct FeedbackConfig {
    /// How long a successful submission blocks further submits.
    pub resubmit_cooldown_ms: u64,
    /// How long the success notice stays visible.
    pub notice_dismiss_ms: u64,
}

impl FeedbackConfig {
    #[must_use]
    pub const fn resubmit_cooldown(&self) -> Duration {
        Duration::from_millis(self.resubmit_cooldown_ms)
    }

    #[must_use]
    pub const fn notice_dismiss(&self) -> Duration {
        Duration::from_millis(self.notice_dismiss_ms)
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            resubmit_cooldown_ms: 1500,
            notice_dismiss_ms: 3000,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub listen_address: String,
    /// JSON file backing the search history and the stored feedback.
    pub store_path: PathBuf,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub feedback: FeedbackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:3000".to_owned(),
            store_path: PathBuf::from("festival-store.json"),
            log_filter: "info,hyper=info".to_owned(),
            feedback: FeedbackConfig::default(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Defaults, overridden by `festival.toml`, overridden by `FESTIVAL_*`
/// variables. Nested keys use `__`, e.g. `FESTIVAL_FEEDBACK__NOTICE_DISMISS_MS`.
#[must_use]
pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(figment().extract()?)
}
