//! The narrow slice of the Discord API the bot depends on.
//!
//! [`ThreadGateway`] is implemented by [`SerenityGateway`] in production and
//! by [`MockGateway`] in tests.

#[cfg(any(test, feature = "test-support"))]
mod mock;
mod serenity_gateway;

use std::future::Future;

use thiserror::Error;

pub use serenity_gateway::SerenityGateway;
#[cfg(any(test, feature = "test-support"))]
pub use mock::MockGateway;

/// A guild the bot is a member of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildHandle {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The channel, guild or message no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Not a usable Discord snowflake.
    #[error("Invalid Discord id: {0:?}")]
    InvalidId(String),

    #[error("Discord API error: {0}")]
    Discord(#[source] Box<serenity::Error>),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serenity::Error> for GatewayError {
    fn from(err: serenity::Error) -> Self {
        if crate::errors::is_not_found(&err) {
            Self::NotFound(err.to_string())
        } else {
            Self::Discord(Box::new(err))
        }
    }
}

/// Parse a user-supplied id. Discord ids are non-zero 64-bit integers.
pub fn parse_snowflake(raw: &str) -> Result<u64, GatewayError> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(GatewayError::InvalidId(raw.to_string())),
        Ok(id) => Ok(id),
    }
}

/// Platform operations used by the registry, the sweeper and the commands.
///
/// Ids are plain `u64`s; implementations reject `0` with
/// [`GatewayError::InvalidId`].
pub trait ThreadGateway: Send + Sync + 'static {
    /// Fetch the handle of a guild the bot has joined.
    fn fetch_guild(
        &self,
        guild_id: u64,
    ) -> impl Future<Output = Result<GuildHandle, GatewayError>> + Send;

    /// Ids of every active (non-archived) thread in the guild.
    fn list_active_threads(
        &self,
        guild: &GuildHandle,
    ) -> impl Future<Output = Result<Vec<u64>, GatewayError>> + Send;

    /// Confirm the channel exists and return its id.
    fn resolve_channel(
        &self,
        channel_id: u64,
    ) -> impl Future<Output = Result<u64, GatewayError>> + Send;

    /// Post `content` and return the new message id.
    fn send_message(
        &self,
        channel_id: u64,
        content: &str,
    ) -> impl Future<Output = Result<u64, GatewayError>> + Send;

    fn delete_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}
