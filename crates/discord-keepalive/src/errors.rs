//! Discord-specific error classification for the bot.
//!
//! Maps serenity errors onto the handful of categories the keepalive logic
//! cares about, most importantly "the thread is gone".

use serenity::http::HttpError;
use tracing::{debug, error, warn};

/// High-level category of a Discord API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Target resource (channel, guild, message) not found.
    NotFound,
    /// Insufficient bot permissions for the requested action.
    PermissionDenied,
    /// Rate limit hit.
    RateLimit,
    /// Network or I/O error (transient).
    Network,
    /// Unknown or uncategorised error.
    Unknown,
}

/// Classify a serenity `Error`.
pub fn classify(err: &serenity::Error) -> ErrorCategory {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            classify_response(resp.status_code.as_u16(), resp.error.code as u32)
        }
        serenity::Error::Http(HttpError::Request(_)) => ErrorCategory::Network,
        serenity::Error::Io(_) => ErrorCategory::Network,
        _ => ErrorCategory::Unknown,
    }
}

/// Classify an unsuccessful HTTP response from its status and Discord JSON code.
///
/// The JSON code wins over the status when both are known.
pub fn classify_response(http_status: u16, discord_code: u32) -> ErrorCategory {
    match discord_code {
        // Unknown channel / guild / message
        10003 | 10004 | 10008 => ErrorCategory::NotFound,
        // Missing access / missing permissions
        50001 | 50013 => ErrorCategory::PermissionDenied,
        // Slowmode / channel write rate limit
        20016 | 20028 => ErrorCategory::RateLimit,
        _ => match http_status {
            404 => ErrorCategory::NotFound,
            403 => ErrorCategory::PermissionDenied,
            429 => ErrorCategory::RateLimit,
            _ => ErrorCategory::Unknown,
        },
    }
}

pub fn is_not_found(err: &serenity::Error) -> bool {
    classify(err) == ErrorCategory::NotFound
}

/// Log a serenity error at the level matching its category.
pub fn log_error(context: &str, err: &serenity::Error) {
    match classify(err) {
        ErrorCategory::NotFound => debug!("{} [NotFound]: {}", context, err),
        ErrorCategory::Network | ErrorCategory::RateLimit => {
            warn!("{} [{:?}]: {}", context, classify(err), err)
        }
        category => error!("{} [{:?}]: {}", context, category, err),
    }
}
