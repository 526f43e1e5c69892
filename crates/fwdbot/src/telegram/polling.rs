//! Long polling transport, used when no public URL is available.

use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use teloxide::update_listeners::{AsUpdateStream, Polling, UpdateListener};
use teloxide::types::Update;
use teloxide::Bot;

use super::queue::UpdateQueue;
use super::shutdown_signal;
use crate::core::config;

/// Feeds updates from the teloxide polling listener into the queue until
/// Ctrl+C.
///
/// Any registered webhook is removed first; Telegram refuses `getUpdates`
/// while one is set.
pub async fn run_polling(bot: Bot, queue: UpdateQueue) -> anyhow::Result<()> {
    let mut listener = Polling::builder(bot)
        .timeout(config::polling::timeout())
        .delete_webhook()
        .await
        .build();
    log::info!("Starting bot in long polling mode");

    let stop_token = listener.stop_token();
    let stopper = tokio::spawn(async move {
        shutdown_signal().await;
        stop_token.stop();
    });

    forward_updates(listener.as_stream(), &queue).await;

    stopper.abort();
    Ok(())
}

/// Submits every update of `updates` in order.
///
/// Listener errors are logged and skipped. Stops when the stream ends or the
/// worker is gone.
pub async fn forward_updates<S, E>(updates: S, queue: &UpdateQueue)
where
    S: Stream<Item = Result<Update, E>>,
    E: Display,
{
    tokio::pin!(updates);
    while let Some(result) = updates.next().await {
        match result {
            Ok(update) => {
                if !queue.submit(update).await {
                    break;
                }
            }
            Err(e) => log::warn!("An error from the update listener: {}", e),
        }
    }
}
