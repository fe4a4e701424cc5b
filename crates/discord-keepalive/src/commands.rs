//! Slash commands: `/addthread`, `/rmthread`, `/lsthread` and `/keepalive`.
//!
//! Each command produces a short plain-text answer. The serenity plumbing
//! lives in [`run_slash`]; everything else works against any
//! [`ThreadGateway`] so it can be tested with the mock.

#[path = "commands_tests.rs"]
mod commands_tests;

use std::collections::BTreeSet;

use serenity::builder::{CreateCommand, CreateCommandOption, EditInteractionResponse};
use serenity::model::application::{CommandInteraction, CommandOptionType, ResolvedValue};
use serenity::prelude::*;
use tracing::{error, warn};

use crate::errors::log_error;
use crate::gateway::{GatewayError, SerenityGateway, ThreadGateway};
use crate::state::Keepalive;

pub const ADD_THREAD: &str = "addthread";
pub const REMOVE_THREAD: &str = "rmthread";
pub const LIST_THREADS: &str = "lsthread";
pub const KEEPALIVE: &str = "keepalive";

pub const THREAD_ID_OPTION: &str = "thread_id";

/// Keyword for `/addthread` that tracks every active thread of the server.
const ALL_THREADS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepaliveCommand {
    AddThread(String),
    RemoveThread(String),
    ListThreads,
    Keepalive,
}

impl KeepaliveCommand {
    /// Build a command from its slash name and `thread_id` option.
    ///
    /// Returns `None` for unknown names or a missing required option.
    pub fn parse(name: &str, thread_id: Option<&str>) -> Option<Self> {
        let thread_id = thread_id.map(|s| s.trim().to_string());
        match name {
            ADD_THREAD => thread_id.map(Self::AddThread),
            REMOVE_THREAD => thread_id.map(Self::RemoveThread),
            LIST_THREADS => Some(Self::ListThreads),
            KEEPALIVE => Some(Self::Keepalive),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddThread(_) => ADD_THREAD,
            Self::RemoveThread(_) => REMOVE_THREAD,
            Self::ListThreads => LIST_THREADS,
            Self::Keepalive => KEEPALIVE,
        }
    }
}

/// Slash command definitions, registered globally on `ready`.
pub fn register() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(ADD_THREAD)
            .description("Keep the given thread ID alive (all: all threads)")
            .add_option(thread_id_option("Thread ID to keep alive, or `all`")),
        CreateCommand::new(REMOVE_THREAD)
            .description("Do not keep the given thread ID alive anymore")
            .add_option(thread_id_option("Thread ID to stop keeping alive")),
        CreateCommand::new(LIST_THREADS).description("List all monitored threads"),
        CreateCommand::new(KEEPALIVE).description("Manually execute keepalive"),
    ]
}

fn thread_id_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, THREAD_ID_OPTION, description)
        .required(true)
}

/// Render ids as `{a, b}`.
pub fn format_ids<'a>(ids: impl IntoIterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = ids.into_iter().map(String::as_str).collect();
    format!("{{{}}}", joined.join(", "))
}

impl<G: ThreadGateway> Keepalive<G> {
    /// Run a command on behalf of a user in `guild_id` (`None` in DMs).
    pub async fn execute(
        &self,
        command: KeepaliveCommand,
        guild_id: Option<u64>,
    ) -> Result<String, GatewayError> {
        match command {
            KeepaliveCommand::AddThread(thread_id) if thread_id.eq_ignore_ascii_case(ALL_THREADS) => {
                self.add_all_threads(guild_id).await
            }
            KeepaliveCommand::AddThread(thread_id) => Ok(self.add_thread(&thread_id).await),
            KeepaliveCommand::RemoveThread(thread_id) => Ok(self.remove_thread(&thread_id).await),
            KeepaliveCommand::ListThreads => Ok(self.list_threads().await),
            KeepaliveCommand::Keepalive => self.keepalive_now().await,
        }
    }

    pub async fn add_thread(&self, thread_id: &str) -> String {
        if !self.threads.write().await.insert(thread_id.to_string()) {
            return format!("{thread_id} is already being kept alive");
        }
        format!("Thread {thread_id} is being kept alive now")
    }

    /// Track every active thread of the caller's guild.
    ///
    /// Ids already tracked are merged silently.
    pub async fn add_all_threads(&self, guild_id: Option<u64>) -> Result<String, GatewayError> {
        let Some(guild_id) = guild_id else {
            return Ok("This command can only be used inside a server".to_string());
        };
        let Some(guild) = self.guilds.get(guild_id).await else {
            return Ok(format!(
                "Looks like you are not connected to this guild: {guild_id}"
            ));
        };

        let added: BTreeSet<String> = self
            .gateway
            .list_active_threads(&guild)
            .await?
            .into_iter()
            .map(|id| id.to_string())
            .collect();

        self.threads.write().await.extend(added.iter().cloned());
        Ok(format!("Threads {} are being kept alive.", format_ids(&added)))
    }

    pub async fn remove_thread(&self, thread_id: &str) -> String {
        if !self.threads.write().await.remove(thread_id) {
            return format!("{thread_id} was not being kept alive anyway");
        }
        format!("Thread {thread_id} not being kept alive anymore")
    }

    pub async fn list_threads(&self) -> String {
        let threads = self.threads.read().await;
        format!("Keeping these thread IDs alive: {}", format_ids(threads.iter()))
    }

    /// Sweep right now, then report what is tracked.
    pub async fn keepalive_now(&self) -> Result<String, GatewayError> {
        self.sweep().await?;
        let threads = self.threads.read().await;
        Ok(format!("Kept these thread IDs alive: {}", format_ids(threads.iter())))
    }
}

/// Answer a slash command interaction.
///
/// The interaction is deferred first: a sweep easily outlasts Discord's
/// three-second acknowledgement window.
pub async fn run_slash(
    ctx: &Context,
    command: &CommandInteraction,
    keepalive: &Keepalive<SerenityGateway>,
) {
    let thread_id = command
        .data
        .options()
        .into_iter()
        .find(|option| option.name == THREAD_ID_OPTION)
        .and_then(|option| match option.value {
            ResolvedValue::String(value) => Some(value.to_string()),
            _ => None,
        });

    let Some(parsed) = KeepaliveCommand::parse(&command.data.name, thread_id.as_deref()) else {
        warn!("Ignoring unknown or incomplete command /{}", command.data.name);
        return;
    };
    let name = parsed.name();

    if let Err(e) = command.defer(ctx).await {
        log_error(&format!("Failed to defer /{name}"), &e);
        return;
    }

    let guild_id = command.guild_id.map(|id| id.get());
    let reply = match keepalive.execute(parsed, guild_id).await {
        Ok(text) => text,
        Err(e) => {
            error!("/{} failed: {}", name, e);
            format!("Something went wrong while running /{name}.")
        }
    };

    if let Err(e) = command
        .edit_response(ctx, EditInteractionResponse::new().content(reply))
        .await
    {
        log_error(&format!("Failed to answer /{name}"), &e);
    }
}
