//! The keepalive sweep: post a message in each thread and delete it again.
//!
//! Posting resets Discord's inactivity timer, so the thread is not
//! auto-archived. Threads that no longer exist are reported but stay in the
//! set until someone runs `/rmthread`.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::gateway::{GatewayError, ThreadGateway, parse_snowflake};
use crate::state::Keepalive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepaliveOutcome {
    KeptAlive,
    NotFound,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub kept_alive: Vec<String>,
    pub not_found: Vec<String>,
}

impl SweepReport {
    pub fn visited(&self) -> usize {
        self.kept_alive.len() + self.not_found.len()
    }
}

/// Register activity in a single thread.
///
/// "Not found" from any step is swallowed and logged. Every other failure,
/// including an id that is not a Discord snowflake, is returned.
pub async fn keep_alive<G: ThreadGateway>(
    gateway: &G,
    thread_id: &str,
    content: &str,
) -> Result<KeepaliveOutcome, GatewayError> {
    info!("Keeping thread {} alive", thread_id);

    match ping(gateway, thread_id, content).await {
        Ok(()) => Ok(KeepaliveOutcome::KeptAlive),
        Err(e) if e.is_not_found() => {
            warn!(
                "{} was not found. Consider removing it from the list ({})",
                thread_id, e
            );
            Ok(KeepaliveOutcome::NotFound)
        }
        Err(e) => Err(e),
    }
}

async fn ping<G: ThreadGateway>(
    gateway: &G,
    thread_id: &str,
    content: &str,
) -> Result<(), GatewayError> {
    let channel_id = gateway.resolve_channel(parse_snowflake(thread_id)?).await?;
    let message_id = gateway.send_message(channel_id, content).await?;
    gateway.delete_message(channel_id, message_id).await
}

/// Visit every id once, in sorted order. Stops at the first error that is
/// not "not found".
pub async fn sweep_all<G: ThreadGateway>(
    gateway: &G,
    thread_ids: &BTreeSet<String>,
    content: &str,
) -> Result<SweepReport, GatewayError> {
    let mut report = SweepReport::default();

    for thread_id in thread_ids {
        match keep_alive(gateway, thread_id, content).await? {
            KeepaliveOutcome::KeptAlive => report.kept_alive.push(thread_id.clone()),
            KeepaliveOutcome::NotFound => report.not_found.push(thread_id.clone()),
        }
    }

    Ok(report)
}

impl<G: ThreadGateway> Keepalive<G> {
    /// Sweep a snapshot of the currently tracked ids.
    pub async fn sweep(&self) -> Result<SweepReport, GatewayError> {
        let thread_ids = self.snapshot().await;
        let report = sweep_all(&self.gateway, &thread_ids, &self.message).await?;

        info!(
            "Keepalive sweep done: {} kept alive, {} not found",
            report.kept_alive.len(),
            report.not_found.len()
        );
        Ok(report)
    }
}

/// Scheduler job running [`Keepalive::sweep`].
pub struct ScheduledSweep<G>(pub Arc<Keepalive<G>>);

impl<G: ThreadGateway> keepalive_cron::Job for ScheduledSweep<G> {
    type Error = GatewayError;

    async fn run(&self) -> Result<(), GatewayError> {
        self.0.sweep().await.map(|_| ())
    }
}
