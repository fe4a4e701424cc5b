//! [`ThreadGateway`] backed by serenity's HTTP client.

#[path = "serenity_gateway_tests.rs"]
mod serenity_gateway_tests;

use std::sync::Arc;

use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, MessageId};

use super::{GatewayError, GuildHandle, ThreadGateway};

#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn non_zero(id: u64) -> Result<u64, GatewayError> {
    if id == 0 {
        Err(GatewayError::InvalidId(id.to_string()))
    } else {
        Ok(id)
    }
}

impl ThreadGateway for SerenityGateway {
    async fn fetch_guild(&self, guild_id: u64) -> Result<GuildHandle, GatewayError> {
        let guild = self
            .http
            .get_guild(GuildId::new(non_zero(guild_id)?))
            .await?;

        Ok(GuildHandle {
            id: guild.id.get(),
            name: guild.name,
        })
    }

    async fn list_active_threads(&self, guild: &GuildHandle) -> Result<Vec<u64>, GatewayError> {
        let data = GuildId::new(non_zero(guild.id)?)
            .get_active_threads(&*self.http)
            .await?;

        Ok(data.threads.iter().map(|thread| thread.id.get()).collect())
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<u64, GatewayError> {
        let channel = self
            .http
            .get_channel(ChannelId::new(non_zero(channel_id)?))
            .await?;

        Ok(channel.id().get())
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError> {
        let message = ChannelId::new(non_zero(channel_id)?)
            .say(&*self.http, content)
            .await?;

        Ok(message.id.get())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        ChannelId::new(non_zero(channel_id)?)
            .delete_message(&*self.http, MessageId::new(non_zero(message_id)?))
            .await?;

        Ok(())
    }
}
