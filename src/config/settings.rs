use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::timeouts::{
    DEFAULT_CALL_TIMEOUT_SECONDS, DEFAULT_GIVEAWAYS_FILE, DEFAULT_MAX_TRANSIENT_RETRIES,
    DEFAULT_STATUS_INTERVAL_SECONDS, DEFAULT_SWEEP_INTERVAL_SECONDS,
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    /// Application id, used to build the invite link
    pub client_id: String,
    pub official_server_invite: String,
    pub status_channel_id: u64,
    pub log_channel_id: u64,
    pub giveaways_file: PathBuf,
    pub guild_id: Option<u64>,
    /// How often due giveaways are swept
    pub sweep_interval: Duration,
    /// How often the status message is republished
    pub status_interval: Duration,
    /// Upper bound on every chat-surface call made by the scheduler
    pub call_timeout: Duration,
    /// Consecutive transient failures before a giveaway is given up on (0 = never)
    pub max_transient_retries: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let discord_token = var("DISCORD_BOT_TOKEN")
            .or_else(|| var("DISCORD_TOKEN"))
            .ok_or("DISCORD_BOT_TOKEN environment variable not set")?;

        let client_id =
            var("DISCORD_CLIENT_ID").ok_or("DISCORD_CLIENT_ID environment variable not set")?;

        let official_server_invite = var("OFFICIAL_SERVER_INVITE")
            .ok_or("OFFICIAL_SERVER_INVITE environment variable not set")?;

        let status_channel_id = parse_id("ONLINE_STATUS_CHANNEL_ID", var("ONLINE_STATUS_CHANNEL_ID"))?;
        let log_channel_id = parse_id("LOG_CHANNEL_ID", var("LOG_CHANNEL_ID"))?;

        let giveaways_file = var("GIVEAWAYS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GIVEAWAYS_FILE));

        let guild_id = var("GUILD_ID")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|id| *id != 0);

        let seconds = |key: &str, default: u64| {
            var(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(default)
        };

        let max_transient_retries = var("MAX_TRANSIENT_RETRIES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_TRANSIENT_RETRIES);

        Ok(Self {
            discord_token,
            client_id,
            official_server_invite,
            status_channel_id,
            log_channel_id,
            giveaways_file,
            guild_id,
            sweep_interval: Duration::from_secs(seconds(
                "SWEEP_INTERVAL_SECONDS",
                DEFAULT_SWEEP_INTERVAL_SECONDS,
            )),
            status_interval: Duration::from_secs(seconds(
                "STATUS_INTERVAL_SECONDS",
                DEFAULT_STATUS_INTERVAL_SECONDS,
            )),
            call_timeout: Duration::from_secs(seconds(
                "EXTERNAL_CALL_TIMEOUT_SECONDS",
                DEFAULT_CALL_TIMEOUT_SECONDS,
            )),
            max_transient_retries,
        })
    }
}

fn parse_id(key: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{} environment variable not set", key))?;
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| format!("{} is not a valid Discord id: {}", key, value))
}
