use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::window::{DAYS_CAN_BOOK, DEFAULT_HOUR, DEFAULT_MINUTE, MAX_PLAYERS};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_QUEUE_PATH: &str = "flog.data";
pub const DEFAULT_CONFIG_PATH: &str = "flog.toml";
pub const DEFAULT_COURSE_ID: i64 = 17078;
pub const DEFAULT_BASE_URL: &str = "https://www.chronogolf.com";
pub const HTTP_TIMEOUT_SECS: u64 = 60;
pub const LOGIN_EVERY_HOURS: u64 = 24;

/// Top-level config (flog.toml + FLOG_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlogConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub golfer: GolferConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Reservation site account and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GolferConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Club identifier; also the organization an affiliation must belong to.
    #[serde(default = "default_course_id")]
    pub course_id: i64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Ceiling for every outbound call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a login session is trusted before logging in again.
    #[serde(default = "default_login_every_hours")]
    pub login_every_hours: u64,
}

impl Default for GolferConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            course_id: DEFAULT_COURSE_ID,
            base_url: default_base_url(),
            timeout_secs: HTTP_TIMEOUT_SECS,
            login_every_hours: LOGIN_EVERY_HOURS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_days_can_book")]
    pub days_can_book: i64,
    /// Tee time suggested by the reservation form.
    #[serde(default = "default_hour")]
    pub default_hour: u32,
    #[serde(default = "default_minute")]
    pub default_minute: u32,
    /// Requests for larger parties are refused.
    #[serde(default = "default_max_players")]
    pub max_players: u32,
    /// Local wall-clock time of the daily sweep.
    #[serde(default)]
    pub sweep_hour: u32,
    #[serde(default)]
    pub sweep_minute: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            days_can_book: DAYS_CAN_BOOK,
            default_hour: DEFAULT_HOUR,
            default_minute: DEFAULT_MINUTE,
            max_players: MAX_PLAYERS,
            sweep_hour: 0,
            sweep_minute: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_queue_path")]
    pub path: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            path: default_queue_path(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_course_id() -> i64 {
    DEFAULT_COURSE_ID
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    HTTP_TIMEOUT_SECS
}
fn default_login_every_hours() -> u64 {
    LOGIN_EVERY_HOURS
}
fn default_days_can_book() -> i64 {
    DAYS_CAN_BOOK
}
fn default_hour() -> u32 {
    DEFAULT_HOUR
}
fn default_minute() -> u32 {
    DEFAULT_MINUTE
}
fn default_max_players() -> u32 {
    MAX_PLAYERS
}
fn default_queue_path() -> String {
    DEFAULT_QUEUE_PATH.to_string()
}

impl FlogConfig {
    /// Load config from a TOML file with FLOG_* env var overrides.
    ///
    /// A missing file is fine; every field has a default except the
    /// account credentials, which the gateway checks at startup.
    /// Nested keys use a double underscore: `FLOG_GOLFER__USERNAME`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        tracing::debug!(%path, "loading config");

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path))
                .merge(Env::prefixed("FLOG_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        figment
            .extract()
            .map_err(|e| crate::error::FlogError::Config(e.to_string()))
    }
}
