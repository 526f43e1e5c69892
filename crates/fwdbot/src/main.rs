use std::sync::Arc;

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use teloxide::prelude::*;

use fwdcore::{ActorId, Gatekeeper, JsonFileStore, Store};
use fwdgate::cli::{Cli, Commands};
use fwdgate::core::config;
use fwdgate::core::init_logger;
use fwdgate::core::logging::install_panic_logger;
use fwdgate::telegram::{create_bot, run_polling, run_webhook, setup_bot_commands, spawn_pipeline, Dispatcher, Messenger};

/// Main entry point for the bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
/// Without a subcommand the bot runs in webhook mode when WEBHOOK_URL is set,
/// otherwise in long polling mode.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    install_panic_logger();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        Some(Commands::Pending) => list_pending().await,
        None => {
            let webhook = config::WEBHOOK_URL.is_some();
            log::info!("No command given, running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
    }
}

fn configured_owner() -> Result<ActorId> {
    match *config::owner::OWNER_ID {
        0 => Err(anyhow!("OWNER_ID environment variable not set or invalid")),
        id => Ok(ActorId(id)),
    }
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");

    let owner = configured_owner()?;
    let store = JsonFileStore::new(config::DB_FILE.as_str());
    let gatekeeper = Arc::new(Gatekeeper::new(owner, store));

    // Creates the document on first start and fails fast on a corrupt one
    let state = gatekeeper
        .snapshot()
        .await
        .map_err(|e| anyhow!("Failed to open store {}: {}", config::DB_FILE.as_str(), e))?;
    log::info!(
        "Store {} loaded: {} members, {} pending requests",
        config::DB_FILE.as_str(),
        state.users.len(),
        state.pending_users.len()
    );

    let bot = create_bot()?;

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            let username = me.user.username.clone();
            log::info!("Bot username: @{}", username.as_deref().unwrap_or("unknown"));
            username
        }
        Err(e) => {
            log::warn!("Failed to get bot info: {}. Commands addressed to @bot will be ignored", e);
            None
        }
    };

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let dispatcher = Arc::new(Dispatcher::new(
        gatekeeper,
        config::owner::OWNER_USERNAME.as_str(),
        bot_username,
    ));
    let messenger: Arc<dyn Messenger> = Arc::new(bot.clone());
    let (queue, worker) = spawn_pipeline(dispatcher, messenger);

    let result = if use_webhook {
        let url = config::WEBHOOK_URL
            .clone()
            .ok_or_else(|| anyhow!("WEBHOOK_URL must be set in webhook mode"))?;
        run_webhook(&bot, queue, &url).await
    } else {
        run_polling(bot, queue).await
    };

    // Transports dropped their queue handles; finish what was accepted
    if let Err(e) = worker.await {
        log::error!("Update worker failed: {}", e);
    }
    log::info!("Bot stopped");

    result
}

/// Prints pending access requests.
async fn list_pending() -> Result<()> {
    let store = JsonFileStore::new(config::DB_FILE.as_str());
    let state = store.load().await?;

    let pending = state.pending_requests();
    if pending.is_empty() {
        println!("No pending access requests in {}", store.path().display());
        return Ok(());
    }

    println!("Pending access requests ({}):", pending.len());
    for (actor, profile) in pending {
        println!("  {:>12}  {}  {}", actor, profile.name, profile.handle());
    }
    Ok(())
}
