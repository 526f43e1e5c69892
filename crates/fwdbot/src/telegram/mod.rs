//! Telegram bot integration and handlers

pub mod bot;
pub mod dispatcher;
pub mod menu;
pub mod messenger;
pub mod polling;
pub mod queue;
pub mod webhook;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use dispatcher::Dispatcher;
pub use messenger::{deliver, Messenger, Outgoing};
pub use polling::run_polling;
pub use queue::{spawn_pipeline, UpdateQueue};
pub use webhook::{router, run_webhook};

/// Resolves on Ctrl+C.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down gracefully...");
}
