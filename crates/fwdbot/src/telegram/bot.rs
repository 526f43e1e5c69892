//! Bot initialization and command parsing
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Startup registration calls (commands, webhook)

use fwdcore::{ActorId, Profile};
use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::{ChatId, User};
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "request access or show the main menu")]
    Start,
}

impl Command {
    /// Parses the command at the start of a message.
    ///
    /// Only the first token is considered, so `/start <payload>` and
    /// `/start@botname` are both recognized.
    pub fn from_text(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        Command::parse(token, bot_username.unwrap_or("")).ok()
    }
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token or invalid BOT_API_URL
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN environment variable not set"));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    // Check if local Bot API server is configured
    let bot = if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        bot.set_api_url(url)
    } else {
        bot
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Registers the public ingestion URL with Telegram.
///
/// `setWebhook` is idempotent, so calling it on every start is safe.
pub async fn register_webhook(bot: &Bot, webhook_url: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(webhook_url).map_err(|e| anyhow::anyhow!("Invalid WEBHOOK_URL: {}", e))?;
    bot.set_webhook(url).await?;
    log::info!("✅ Webhook set successfully: {}", webhook_url);
    Ok(())
}

/// Actor id and stored profile for a Telegram user.
pub fn actor_of(user: &User) -> (ActorId, Profile) {
    (ActorId(user.id.0), Profile::new(user.full_name(), user.username.clone()))
}

/// Private chat with an actor.
pub fn actor_chat(actor: ActorId) -> ChatId {
    ChatId(actor.0 as i64)
}
