//! Shared application state: the monitored thread ids and the guild registry.

use std::collections::BTreeSet;

use tokio::sync::RwLock;

use crate::fs::{ExistsFile, ReadFile, WriteFile};
use crate::gateway::ThreadGateway;
use crate::registry::GuildRegistry;
use crate::store::{StateStore, StoreError};

/// Text posted (and deleted again) in every kept-alive thread.
pub const DEFAULT_MESSAGE: &str = "ping";

/// Everything the command surface, the sweeper and the scheduler share.
///
/// Each mutation of the id set is a single write-lock section that never
/// spans an `.await`; sweeps iterate over a snapshot.
pub struct Keepalive<G> {
    pub(crate) gateway: G,
    pub(crate) threads: RwLock<BTreeSet<String>>,
    pub(crate) guilds: GuildRegistry,
    pub(crate) message: String,
}

impl<G: ThreadGateway> Keepalive<G> {
    pub fn new(gateway: G, threads: BTreeSet<String>) -> Self {
        Self {
            gateway,
            threads: RwLock::new(threads),
            guilds: GuildRegistry::new(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn guilds(&self) -> &GuildRegistry {
        &self.guilds
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Copy of the current id set.
    pub async fn snapshot(&self) -> BTreeSet<String> {
        self.threads.read().await.clone()
    }

    /// Write the current id set to `store` and return how many ids were saved.
    ///
    /// Takes a snapshot, so a sweep still running keeps going on its own copy.
    pub async fn persist<F>(&self, store: &StateStore<F>) -> Result<usize, StoreError>
    where
        F: ReadFile + WriteFile + ExistsFile,
    {
        let threads = self.snapshot().await;
        store.save(&threads)?;
        Ok(threads.len())
    }

    /// Rebuild the guild registry from the ids reported by `ready`.
    pub async fn refresh_guilds(
        &self,
        guild_ids: &[u64],
    ) -> Result<Vec<u64>, crate::gateway::GatewayError> {
        self.guilds.refresh(&self.gateway, guild_ids).await
    }
}
