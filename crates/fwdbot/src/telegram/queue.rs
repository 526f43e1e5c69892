//! Update pipeline
//!
//! ```text
//! transport ──UpdateQueue──▶ worker (Dispatcher) ──outbox──▶ delivery (Messenger)
//! ```
//!
//! The worker handles updates one at a time in arrival order, so transitions
//! on the store never interleave. Delivery runs on its own task: a slow Bot API
//! call delays later notifications but never a state transition.

use std::sync::Arc;

use teloxide::types::Update;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::dispatcher::Dispatcher;
use super::messenger::{deliver, Messenger, Outgoing};
use crate::core::config;

/// Sending half of the update queue, shared by the transports.
#[derive(Clone)]
pub struct UpdateQueue {
    tx: mpsc::Sender<Update>,
}

impl UpdateQueue {
    /// Bounded queue and its receiving end.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Update>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueues an update, waiting while the queue is full.
    ///
    /// Returns false when the worker has stopped and the update was dropped.
    pub async fn submit(&self, update: Update) -> bool {
        match self.tx.send(update).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Update worker is gone, dropping update {:?}", e.0.id);
                false
            }
        }
    }
}

/// Spawns the worker and delivery tasks.
///
/// The returned handle completes once every `UpdateQueue` clone is dropped and
/// all queued updates have been handled and delivered.
pub fn spawn_pipeline(dispatcher: Arc<Dispatcher>, messenger: Arc<dyn Messenger>) -> (UpdateQueue, JoinHandle<()>) {
    let (queue, mut updates) = UpdateQueue::new(config::queue::CAPACITY);
    let (outbox, mut batches) = mpsc::channel::<Vec<Outgoing>>(config::queue::OUTBOX_CAPACITY);

    let delivery = tokio::spawn(async move {
        while let Some(batch) = batches.recv().await {
            deliver(messenger.as_ref(), batch).await;
        }
    });

    let worker = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            let outgoing = dispatcher.process(update).await;
            if outgoing.is_empty() {
                continue;
            }
            if outbox.send(outgoing).await.is_err() {
                log::error!("Delivery task is gone, stopping update worker");
                break;
            }
        }

        drop(outbox);
        if let Err(e) = delivery.await {
            log::error!("Delivery task failed: {}", e);
        }
        log::info!("Update worker stopped");
    });

    (queue, worker)
}
