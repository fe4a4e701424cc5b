//! In-memory [`ThreadGateway`] for unit tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{GatewayError, GuildHandle, ThreadGateway};

#[derive(Default)]
struct Inner {
    guilds: BTreeMap<u64, (GuildHandle, Vec<u64>)>,
    channels: BTreeSet<u64>,
    failing_channels: BTreeSet<u64>,
    /// Message ids currently posted, per channel.
    live_messages: HashMap<u64, Vec<u64>>,
    sent: Vec<(u64, String)>,
    deleted: Vec<(u64, u64)>,
    resolved: Vec<u64>,
}

/// Records every call; channels and guilds must be registered up front.
///
/// Unknown ids answer [`GatewayError::NotFound`], ids marked with
/// [`fail_channel`](Self::fail_channel) answer a generic Discord error.
#[derive(Clone)]
pub struct MockGateway {
    inner: Arc<Mutex<Inner>>,
    next_message_id: Arc<AtomicU64>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            inner: Arc::default(),
            next_message_id: Arc::new(AtomicU64::new(9000)),
        }
    }

    pub fn with_guild(self, id: u64, name: &str, active_threads: &[u64]) -> Self {
        self.inner.lock().unwrap().guilds.insert(
            id,
            (
                GuildHandle {
                    id,
                    name: name.to_string(),
                },
                active_threads.to_vec(),
            ),
        );
        self
    }

    pub fn with_channel(self, id: u64) -> Self {
        self.inner.lock().unwrap().channels.insert(id);
        self
    }

    /// Make every call touching `id` fail with a non-"not found" error.
    pub fn fail_channel(self, id: u64) -> Self {
        self.inner.lock().unwrap().failing_channels.insert(id);
        self
    }

    /// Remove a channel, as if the thread had been deleted.
    pub fn delete_channel(&self, id: u64) {
        self.inner.lock().unwrap().channels.remove(&id);
    }

    pub fn sent(&self) -> Vec<(u64, String)> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn deleted(&self) -> Vec<(u64, u64)> {
        self.inner.lock().unwrap().deleted.clone()
    }

    pub fn resolved(&self) -> Vec<u64> {
        self.inner.lock().unwrap().resolved.clone()
    }

    /// Messages posted and not yet deleted.
    pub fn live_message_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .live_messages
            .values()
            .map(Vec::len)
            .sum()
    }

    fn check_channel(inner: &Inner, channel_id: u64) -> Result<(), GatewayError> {
        if inner.failing_channels.contains(&channel_id) {
            return Err(GatewayError::Discord(Box::new(serenity::Error::Other(
                "Missing Access",
            ))));
        }
        if !inner.channels.contains(&channel_id) {
            return Err(GatewayError::NotFound(format!(
                "Unknown Channel {channel_id}"
            )));
        }
        Ok(())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadGateway for MockGateway {
    async fn fetch_guild(&self, guild_id: u64) -> Result<GuildHandle, GatewayError> {
        self.inner
            .lock()
            .unwrap()
            .guilds
            .get(&guild_id)
            .map(|(handle, _)| handle.clone())
            .ok_or_else(|| GatewayError::NotFound(format!("Unknown Guild {guild_id}")))
    }

    async fn list_active_threads(&self, guild: &GuildHandle) -> Result<Vec<u64>, GatewayError> {
        self.inner
            .lock()
            .unwrap()
            .guilds
            .get(&guild.id)
            .map(|(_, threads)| threads.clone())
            .ok_or_else(|| GatewayError::NotFound(format!("Unknown Guild {}", guild.id)))
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<u64, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.resolved.push(channel_id);
        Self::check_channel(&inner, channel_id)?;
        Ok(channel_id)
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_channel(&inner, channel_id)?;

        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        inner.sent.push((channel_id, content.to_string()));
        inner
            .live_messages
            .entry(channel_id)
            .or_default()
            .push(message_id);
        Ok(message_id)
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_channel(&inner, channel_id)?;

        let live = inner.live_messages.entry(channel_id).or_default();
        let Some(pos) = live.iter().position(|id| *id == message_id) else {
            return Err(GatewayError::NotFound(format!(
                "Unknown Message {message_id}"
            )));
        };
        live.remove(pos);
        inner.deleted.push((channel_id, message_id));
        Ok(())
    }
}
