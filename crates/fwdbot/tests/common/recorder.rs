//! Messenger that records Bot API calls instead of performing them

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fwdgate::telegram::Messenger;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardMarkup, MessageId};
use teloxide::RequestError;

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Answer,
    Send {
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Edit {
        chat: ChatId,
        message: MessageId,
        text: String,
    },
}

#[derive(Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<Call>>,
    fail_answers: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes callback acknowledgements fail (after being recorded).
    pub fn fail_answers(&self) {
        self.fail_answers.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        self.record(Call::Send {
            chat,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<(), RequestError> {
        self.record(Call::Edit {
            chat,
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn answer_callback(&self, _id: CallbackQueryId) -> Result<(), RequestError> {
        self.record(Call::Answer);
        if self.fail_answers.load(Ordering::SeqCst) {
            return Err(RequestError::from(Arc::new(std::io::Error::other("ack failed"))));
        }
        Ok(())
    }
}
