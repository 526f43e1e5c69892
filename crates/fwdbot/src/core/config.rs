//! Configuration for the bot.
//! Every value is read once from the environment (a `.env` file is loaded at
//! startup) and never changes while the process runs.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Port the webhook server listens on
/// Read from PORT environment variable
/// Default: 10000
pub static PORT: Lazy<u16> = Lazy::new(|| env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(10000));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Public URL Telegram delivers updates to, e.g. https://my-app.onrender.com/webhook
/// Read from WEBHOOK_URL environment variable
pub static WEBHOOK_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("WEBHOOK_URL").ok().filter(|url| !url.trim().is_empty()));

/// Route the ingestion endpoint is mounted on
/// Read from WEBHOOK_PATH environment variable
/// Default: /webhook
pub static WEBHOOK_PATH: Lazy<String> = Lazy::new(|| {
    let path = env::var("WEBHOOK_PATH").unwrap_or_else(|_| "/webhook".to_string());
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
});

/// Store document path
/// Read from DB_FILE environment variable
/// Default: db.json
pub static DB_FILE: Lazy<String> = Lazy::new(|| env::var("DB_FILE").unwrap_or_else(|_| "db.json".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Owner configuration
pub mod owner {
    use once_cell::sync::Lazy;
    use std::env;

    /// Telegram user ID of the owner who approves access requests
    /// Read from OWNER_ID environment variable (0 = not configured)
    pub static OWNER_ID: Lazy<u64> = Lazy::new(|| {
        env::var("OWNER_ID")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    });

    /// Owner's username, shown by the "contact" menu button
    /// Read from OWNER_USERNAME environment variable
    pub static OWNER_USERNAME: Lazy<String> = Lazy::new(|| {
        let username = env::var("OWNER_USERNAME").unwrap_or_else(|_| "owner".to_string());
        if username.starts_with('@') {
            username
        } else {
            format!("@{}", username)
        }
    });
}

/// Update queue configuration
pub mod queue {
    /// Updates buffered between the transport and the worker before the
    /// transport waits
    pub const CAPACITY: usize = 256;

    /// Outgoing batches buffered between the worker and the delivery task
    pub const OUTBOX_CAPACITY: usize = 256;
}

/// Long polling configuration
pub mod polling {
    use super::Duration;

    /// Seconds Telegram holds a getUpdates request open
    pub const TIMEOUT_SECS: u64 = 30;

    /// Long polling timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Must stay above the long polling timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
