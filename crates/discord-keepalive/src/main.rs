//! Thread keepalive bot for Discord
//!
//! Keeps the configured threads active by posting and deleting a message in
//! each of them on a cron schedule.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use discord_keepalive::config::Config;
use discord_keepalive::gateway::SerenityGateway;
use discord_keepalive::handlers::{Handler, KeepaliveService};
use discord_keepalive::shutdown::cancel_on_signal;
use discord_keepalive::state::Keepalive;
use discord_keepalive::store::StateStore;
use discord_keepalive::sweeper::ScheduledSweep;
use keepalive_cron::Scheduler;

/// Discord thread keepalive bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/keepalive.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "KEEPALIVE_BOT_SECRET", hide_env_values = true)]
    bot_token: Option<String>,

    /// Crontab for the scheduled sweep (overrides config file)
    #[arg(long, env = "KEEPALIVE_CRONTAB")]
    crontab: Option<String>,

    /// Thread id file (overrides config file)
    #[arg(long, env = "KEEPALIVE_STATE_FILE")]
    state_file: Option<String>,

    /// Message posted in each thread (overrides config file)
    #[arg(long, env = "KEEPALIVE_MESSAGE")]
    message: Option<String>,
}

impl Args {
    /// Apply non-empty overrides on top of `config`.
    fn apply(self, config: &mut Config) {
        if let Some(bot_token) = set(self.bot_token) {
            config.discord.bot_token = bot_token;
        }
        if let Some(crontab) = set(self.crontab) {
            config.keepalive.crontab = crontab;
        }
        if let Some(state_file) = set(self.state_file) {
            config.keepalive.state_file = state_file;
        }
        if let Some(message) = set(self.message) {
            config.keepalive.message = message;
        }
    }
}

fn set(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discord_keepalive=debug,keepalive_cron=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting thread keepalive bot");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        match Config::from_env() {
            Ok(config) => config,
            // The token may still come from --bot-token.
            Err(_) if args.bot_token.is_some() => Config::default(),
            Err(e) => return Err(e),
        }
    };
    args.apply(&mut config);

    let schedule = config.validate()?;
    info!("Keepalive schedule: {}", schedule);

    let store = StateStore::new(&config.keepalive.state_file);
    let threads = store
        .load()
        .with_context(|| format!("Failed to load state from {}", store.path().display()))?;
    info!(
        "Loaded {} thread id(s) from {}",
        threads.len(),
        store.path().display()
    );

    let mut client = Client::builder(&config.discord.bot_token, GatewayIntents::GUILDS)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let keepalive = Arc::new(
        Keepalive::new(SerenityGateway::new(client.http.clone()), threads)
            .with_message(config.keepalive.message.clone()),
    );

    {
        let mut data = client.data.write().await;
        data.insert::<KeepaliveService>(keepalive.clone());
    }

    let shutdown = CancellationToken::new();

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if cancel_on_signal(signal_token).await {
            info!("Shutdown signal received, stopping Discord client...");
            shard_manager.shutdown_all().await;
        }
    });

    let scheduler = tokio::spawn(
        Scheduler::new("keepalive", schedule, ScheduledSweep(keepalive.clone()))
            .run(shutdown.clone()),
    );

    info!("Starting Discord gateway connection...");

    // Blocks until all shards are stopped.
    let result = client.start().await;

    shutdown.cancel();

    // Save before waiting out a sweep that may still be running.
    match keepalive.persist(&store).await {
        Ok(count) => info!("Saved {} thread id(s) to {}", count, store.path().display()),
        Err(e) => error!("Failed to save state: {}", e),
    }

    if let Err(e) = scheduler.await {
        error!("Scheduler task failed: {}", e);
    }

    result.map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Discord bot stopped");
    Ok(())
}
