//! Outbound messaging seam.
//!
//! The dispatcher never talks to Telegram directly; it produces [`Outgoing`]
//! values that are delivered through a [`Messenger`]. `Bot` is the production
//! implementation, tests use a recording one.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardMarkup, MessageId};
use teloxide::RequestError;

/// One Bot API call produced while handling an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    /// Stop the client-side loading indicator of a button press
    AnswerCallback(CallbackQueryId),
    Send {
        chat: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    /// Replace the text of an earlier message (drops its keyboard)
    Edit {
        chat: ChatId,
        message: MessageId,
        text: String,
    },
}

impl Outgoing {
    pub fn text(chat: ChatId, text: impl Into<String>) -> Self {
        Outgoing::Send {
            chat,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(chat: ChatId, text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Outgoing::Send {
            chat,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError>;

    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<(), RequestError>;

    async fn answer_callback(&self, id: CallbackQueryId) -> Result<(), RequestError>;
}

#[async_trait]
impl Messenger for Bot {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        let request = self.send_message(chat, text);
        match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<(), RequestError> {
        self.edit_message_text(chat, message, text).await?;
        Ok(())
    }

    async fn answer_callback(&self, id: CallbackQueryId) -> Result<(), RequestError> {
        self.answer_callback_query(id).await?;
        Ok(())
    }
}

/// Delivers outgoing calls in order.
///
/// Failures are logged and never stop the remaining calls: a failed
/// acknowledgement must not swallow the reply that follows it.
pub async fn deliver(messenger: &dyn Messenger, outgoing: Vec<Outgoing>) {
    for item in outgoing {
        match item {
            Outgoing::AnswerCallback(id) => {
                if let Err(e) = messenger.answer_callback(id).await {
                    log::warn!("Failed to answer callback query: {}", e);
                }
            }
            Outgoing::Send { chat, text, keyboard } => {
                if let Err(e) = messenger.send_text(chat, &text, keyboard).await {
                    log::error!("Failed to send message to {}: {}", chat, e);
                }
            }
            Outgoing::Edit { chat, message, text } => {
                if let Err(e) = messenger.edit_text(chat, message, &text).await {
                    log::warn!("Failed to edit message {} in {}: {}", message.0, chat, e);
                }
            }
        }
    }
}
