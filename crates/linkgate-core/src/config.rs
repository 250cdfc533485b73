//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the bot's constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Invite link used when `INVITE_LINK` is not set.
pub const DEFAULT_INVITE_LINK: &str = "https://t.me/codecrew_entrybot";
/// Admin user ID used when `ADMIN_ID` is not set.
pub const DEFAULT_ADMIN_ID: i64 = 7_918_849_670;
/// Image attached to the /start card.
pub const DEFAULT_WELCOME_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1614680376408-81e91ffe3db7?w=800";
/// TinyURL endpoint that answers with a bare short URL.
pub const DEFAULT_SHORTENER_API_URL: &str = "https://tinyurl.com/api-create.php";
/// Every successful shortener payload starts with this prefix.
pub const SHORT_URL_PREFIX: &str = "https://tinyurl.com";
/// HTTP timeout for the shortener (seconds).
pub const DEFAULT_SHORTENER_TIMEOUT_SECS: u64 = 15;
/// Text starting with this character is a command, not a link.
pub const COMMAND_PREFIX: char = '/';
/// Accepted URL schemes for incoming links.
pub const ACCEPTED_URL_SCHEMES: &[&str] = &["http://", "https://"];

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GateSettings {
    /// Telegram Bot API token
    #[serde(default)]
    pub bot_token: String,

    /// Numeric chat ID of the channel users must be subscribed to
    #[serde(default)]
    pub channel_id: i64,

    /// Public link to the channel shown on the "subscribe" button
    #[serde(default = "default_invite_link")]
    pub invite_link: String,

    /// The only user allowed to see /admin
    #[serde(default = "default_admin_id")]
    pub admin_id: i64,

    /// Image sent with the /start caption
    #[serde(default = "default_welcome_image_url")]
    pub welcome_image_url: String,

    /// Shortener endpoint, called as `GET {url}?url={long_url}`
    #[serde(default = "default_shortener_api_url")]
    pub shortener_api_url: String,

    /// Shortener HTTP timeout in seconds
    #[serde(default = "default_shortener_timeout_secs")]
    pub shortener_timeout_secs: u64,
}

fn default_invite_link() -> String {
    DEFAULT_INVITE_LINK.to_string()
}

const fn default_admin_id() -> i64 {
    DEFAULT_ADMIN_ID
}

fn default_welcome_image_url() -> String {
    DEFAULT_WELCOME_IMAGE_URL.to_string()
}

fn default_shortener_api_url() -> String {
    DEFAULT_SHORTENER_API_URL.to_string()
}

const fn default_shortener_timeout_secs() -> u64 {
    DEFAULT_SHORTENER_TIMEOUT_SECS
}

/// Build the layered configuration source.
///
/// Order (later wins): `config/default`, `config/{RUN_MODE}`, `config/local`,
/// `APP__*` variables, then plain environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // BOT_TOKEN -> bot_token; empty values count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl GateSettings {
    /// Load and validate settings from files and the environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use linkgate_core::config::GateSettings;
    ///
    /// let settings = GateSettings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or a required key is missing.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(build_config()?)
    }

    /// Deserialize and validate settings from an already built `Config`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if deserialization or validation fails.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the keys the bot cannot run without.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` for a missing `BOT_TOKEN` or `CHANNEL_ID`,
    /// `ConfigError::Message` for a channel ID that is not a channel chat ID.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::NotFound("BOT_TOKEN".to_string()));
        }
        if self.channel_id == 0 {
            return Err(ConfigError::NotFound(
                "CHANNEL_ID (numeric channel ID, e.g. -1003593858012)".to_string(),
            ));
        }
        if self.channel_id > 0 {
            return Err(ConfigError::Message(format!(
                "CHANNEL_ID must be a negative channel chat ID, got {}",
                self.channel_id
            )));
        }
        Ok(())
    }

    /// Shortener timeout as a `Duration`
    #[must_use]
    pub const fn shortener_timeout(&self) -> Duration {
        Duration::from_secs(self.shortener_timeout_secs)
    }

    /// Whether `user_id` is the configured admin
    #[must_use]
    pub const fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id == user_id
    }
}
