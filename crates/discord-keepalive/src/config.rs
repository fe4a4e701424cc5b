//! Configuration management for discord-keepalive

#[path = "config_tests.rs"]
mod config_tests;

use std::fs;

use anyhow::{Context, Result, bail};
use keepalive_cron::{CronSchedule, DEFAULT_CRONTAB};
use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_MESSAGE;
use crate::store::DEFAULT_STATE_FILE;

pub const BOT_SECRET_VAR: &str = "KEEPALIVE_BOT_SECRET";
pub const CRONTAB_VAR: &str = "KEEPALIVE_CRONTAB";
pub const STATE_FILE_VAR: &str = "KEEPALIVE_STATE_FILE";
pub const MESSAGE_VAR: &str = "KEEPALIVE_MESSAGE";

/// Environment lookup. Unset and non-unicode variables both read as `None`.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordBotConfig,
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepaliveConfig {
    /// Five-field crontab, or the six/seven-field `cron` form
    #[serde(default = "default_crontab")]
    pub crontab: String,
    /// JSON file holding the monitored thread ids
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Text posted and deleted in each thread
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            crontab: default_crontab(),
            state_file: default_state_file(),
            message: default_message(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(&SystemEnv)
    }

    pub fn from_env_with<E: ReadEnv>(env: &E) -> Result<Self> {
        let bot_token = non_empty(env, BOT_SECRET_VAR)
            .with_context(|| format!("{} not set", BOT_SECRET_VAR))?;

        Ok(Config {
            discord: DiscordBotConfig { bot_token },
            keepalive: KeepaliveConfig {
                crontab: non_empty(env, CRONTAB_VAR).unwrap_or_else(default_crontab),
                state_file: non_empty(env, STATE_FILE_VAR).unwrap_or_else(default_state_file),
                message: non_empty(env, MESSAGE_VAR).unwrap_or_else(default_message),
            },
        })
    }

    /// Reject configurations the bot cannot start with.
    pub fn validate(&self) -> Result<CronSchedule> {
        if self.discord.bot_token.trim().is_empty() {
            bail!("Discord bot token is empty (set {})", BOT_SECRET_VAR);
        }
        if self.keepalive.message.trim().is_empty() {
            bail!("Keepalive message must not be empty");
        }
        let schedule = CronSchedule::parse(&self.keepalive.crontab)
            .with_context(|| format!("Invalid {}", CRONTAB_VAR))?;
        Ok(schedule)
    }
}

/// Empty values count as unset.
fn non_empty<E: ReadEnv>(env: &E, key: &str) -> Option<String> {
    env.var(key).filter(|v| !v.trim().is_empty())
}

fn default_crontab() -> String {
    DEFAULT_CRONTAB.to_string()
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}
