//! Serenity event handler implementation

use std::sync::Arc;

use serenity::async_trait;
use serenity::model::application::{Command, Interaction};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::commands;
use crate::errors::log_error;
use crate::gateway::SerenityGateway;
use crate::state::Keepalive;

/// Client data key for the shared keepalive state.
pub struct KeepaliveService;

impl TypeMapKey for KeepaliveService {
    type Value = Arc<Keepalive<SerenityGateway>>;
}

pub struct Handler;

async fn keepalive(ctx: &Context) -> Option<Arc<Keepalive<SerenityGateway>>> {
    let data = ctx.data.read().await;
    let keepalive = data.get::<KeepaliveService>().cloned();
    if keepalive.is_none() {
        error!("KeepaliveService not found in context data");
    }
    keepalive
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator.map_or(0, |d| d.get())
        );

        let Some(keepalive) = keepalive(&ctx).await else {
            return;
        };

        let guild_ids: Vec<u64> = ready.guilds.iter().map(|g| g.id.get()).collect();
        if let Err(e) = keepalive.refresh_guilds(&guild_ids).await {
            error!("Failed to refresh guild registry: {}", e);
        }

        match Command::set_global_commands(&ctx.http, commands::register()).await {
            Ok(registered) => {
                let names: Vec<&str> = registered.iter().map(|c| c.name.as_str()).collect();
                info!("Registered slash commands: {:?}", names);
            }
            Err(e) => log_error("Failed to register slash commands", &e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let Some(keepalive) = keepalive(&ctx).await else {
            return;
        };

        commands::run_slash(&ctx, &command, &keepalive).await;
    }
}
