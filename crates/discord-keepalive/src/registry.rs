//! Guilds the bot is connected to, rebuilt on every gateway `ready`.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use crate::gateway::{GatewayError, GuildHandle, ThreadGateway};

#[derive(Default)]
pub struct GuildRegistry {
    guilds: RwLock<HashMap<u64, GuildHandle>>,
}

impl GuildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry with a fresh handle for each of `guild_ids`.
    ///
    /// The previous contents are dropped first. The first failed fetch aborts
    /// the refresh and is returned; guilds fetched before it stay registered.
    pub async fn refresh<G: ThreadGateway>(
        &self,
        gateway: &G,
        guild_ids: &[u64],
    ) -> Result<Vec<u64>, GatewayError> {
        self.guilds.write().await.clear();

        for &guild_id in guild_ids {
            let handle = gateway.fetch_guild(guild_id).await?;
            self.guilds.write().await.insert(guild_id, handle);
        }

        let ids = self.ids().await;
        info!("Connected guild ids: {:?}", ids);
        Ok(ids)
    }

    pub async fn get(&self, guild_id: u64) -> Option<GuildHandle> {
        self.guilds.read().await.get(&guild_id).cloned()
    }

    /// Registered guild ids, sorted.
    pub async fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.guilds.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
