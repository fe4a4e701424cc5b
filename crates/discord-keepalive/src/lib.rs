//! Discord bot that keeps chat threads from being auto-archived.
//!
//! The bot remembers a set of thread ids, persisted as a JSON array. On a
//! cron schedule, or on `/keepalive`, it posts a short message in every
//! tracked thread and deletes it right away, which resets Discord's
//! inactivity timer.

pub mod commands;
pub mod config;
pub mod errors;
pub mod fs;
pub mod gateway;
pub mod handlers;
pub mod registry;
pub mod shutdown;
pub mod state;
pub mod store;
pub mod sweeper;
