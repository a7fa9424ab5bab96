//! Telegram metadata inspector bot
//!
//! Replies to every message with a structured breakdown of its metadata
//! and, for stickers, offers to export the whole sticker pack as
//! Sticker Maker archives.

mod config;
mod errors;
mod exporter;
mod format;
mod handlers;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Inspector bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/inspector-bot.toml")]
    config: String,

    /// Telegram bot token (overrides config file)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Chat that receives operator alerts (overrides config file)
    #[arg(long, env = "OPERATOR_CHAT_ID")]
    operator_chat_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inspector_bot=debug,sticker_export=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting inspector bot");

    let args = Args::parse();

    // Load configuration
    let config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        let mut config = Config::from_file(&args.config)?;

        // Override with CLI arguments
        if let Some(bot_token) = args.bot_token {
            config.telegram.bot_token = bot_token;
        }
        if let Some(chat_id) = args.operator_chat_id {
            config.telegram.operator_chat_id = Some(chat_id);
        }

        config
    } else {
        info!("Config file not found, using environment variables");
        Config::from_env()?
    };

    info!("Configuration loaded successfully");
    if config.telegram.operator_chat_id.is_some() {
        info!("Operator alerts enabled");
    }

    // Create Telegram bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram.bot_token);

    // Verify bot token
    let me = match bot.get_me().await {
        Ok(me) => {
            info!("Bot authenticated as: @{}", me.username());
            me
        }
        Err(e) => {
            error!("Failed to authenticate bot: {}", e);
            return Err(e.into());
        }
    };

    let config = Arc::new(config);

    // Setup dispatcher with proper handler tree
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback_query))
        .branch(Update::filter_inline_query().endpoint(handlers::handle_inline_query));

    info!("Bot initialized, starting message dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![config, me])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Inspector bot stopped");
    Ok(())
}
