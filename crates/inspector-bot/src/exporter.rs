//! Telegram-side adapters for the sticker export pipeline, plus the
//! export job boundary driven from the "Download pack" callback.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatAction, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, Me,
    Message, ParseMode, Sticker,
};
use teloxide::utils::html::escape;
use teloxide::{DownloadError, RequestError};
use tracing::{debug, error, info, warn};

use sticker_export::{
    Archive, AssetTransfer, CollectionLookup, DeliveryChannel, DeliveryError, ExportError,
    ExportPipeline, LookupError, OperatorNotifier, StickerCollection, StickerRef, TransferError,
};

use crate::config::Config;
use crate::errors;

/// Fixed instructional caption sent with every archive part.
const DELIVERY_CAPTION: &str = "1. Install Sticker Maker to transfer the stickers to WhatsApp.\n\
    Links: [App Store](https://apps.apple.com/ru/app/sticker-maker-studio/id1443326857) \
    or [Google Play](https://play.google.com/store/apps/details?id=com.marsvard.stickermakerforwhatsapp).";

/// Sticker set lookup and file download over the Telegram Bot API.
pub struct TelegramStickerSource {
    bot: Bot,
    bot_username: String,
}

impl TelegramStickerSource {
    pub fn new(bot: Bot, bot_username: String) -> Self {
        Self { bot, bot_username }
    }
}

#[async_trait]
impl CollectionLookup for TelegramStickerSource {
    async fn resolve(&self, name: &str) -> Result<StickerCollection, LookupError> {
        let set = self
            .bot
            .get_sticker_set(name.to_string())
            .await
            .map_err(lookup_error)?;

        debug!(name = %set.name, stickers = set.stickers.len(), "Resolved sticker set");

        Ok(StickerCollection {
            name: set.name.clone(),
            title: set.title.clone(),
            owner_handle: format!("@{}", self.bot_username),
            stickers: set
                .stickers
                .iter()
                .map(|s| StickerRef {
                    file_id: s.file.id.to_string(),
                    file_size: s.file.size,
                    animated: s.is_animated(),
                })
                .collect(),
        })
    }
}

#[async_trait]
impl AssetTransfer for TelegramStickerSource {
    async fn fetch(&self, item: &StickerRef) -> Result<Bytes, TransferError> {
        let file = self
            .bot
            .get_file(item.file_id.clone())
            .await
            .map_err(transfer_error)?;

        let mut buf = Vec::with_capacity(file.size as usize);
        self.bot
            .download_file(&file.path, &mut buf)
            .await
            .map_err(download_error)?;

        Ok(Bytes::from(buf))
    }
}

/// Sends finished archives back into the requesting chat.
pub struct TelegramDelivery {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramDelivery {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl DeliveryChannel for TelegramDelivery {
    async fn deliver(&self, archive: &Archive) -> Result<(), DeliveryError> {
        if let Err(e) = self
            .bot
            .send_chat_action(self.chat_id, ChatAction::UploadDocument)
            .await
        {
            debug!("Failed to send chat action: {}", e);
        }

        info!(archive = %archive.filename, "Sending archive part");

        let document = InputFile::memory(archive.bytes.clone()).file_name(archive.filename.clone());
        let mut req = self.bot.send_document(self.chat_id, document);
        req.caption = Some(DELIVERY_CAPTION.to_string());
        req.parse_mode = Some(ParseMode::Markdown);
        req.await.map_err(delivery_error)?;

        Ok(())
    }
}

/// Relays alerts to the configured operator chat.
pub struct TelegramOperator {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramOperator {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl OperatorNotifier for TelegramOperator {
    async fn unsupported_asset(&self, item: &StickerRef, payload: &[u8], detail: &str) {
        let text = format!(
            "🚫 Sticker rejected while exporting: {}\nfile_id: {}\ndeclared size: {} bytes",
            detail, item.file_id, item.file_size
        );
        if let Err(e) = self.bot.send_message(self.chat_id, text).await {
            warn!("Failed to notify operator: {}", e);
        }

        // Ship the raw payload so the format can be inspected.
        let dump = InputFile::memory(payload.to_vec()).file_name("rejected_payload.bin");
        if let Err(e) = self.bot.send_document(self.chat_id, dump).await {
            warn!("Failed to send rejected payload to operator: {}", e);
        }
    }

    async fn job_failure(&self, context: &str, error: &anyhow::Error) {
        let text = format!(
            "⚠️ An exception was raised while handling an update\n\n\
             <pre>context = {}</pre>\n\n<pre>{}</pre>",
            escape(context),
            escape(&format!("{:?}", error)),
        );

        let mut req = self.bot.send_message(self.chat_id, text);
        req.parse_mode = Some(ParseMode::Html);
        if let Err(e) = req.await {
            warn!("Failed to relay job failure to operator: {}", e);
        }
    }
}

/// Download the full-size image behind a sticker message.
pub async fn download_sticker_image(bot: &Bot, sticker: &Sticker) -> anyhow::Result<Bytes> {
    let file = bot
        .get_file(sticker.file.id.to_string())
        .await
        .context("requesting sticker file info")?;

    let mut buf = Vec::with_capacity(file.size as usize);
    bot.download_file(&file.path, &mut buf)
        .await
        .context("downloading sticker file")?;

    Ok(Bytes::from(buf))
}

/// Run the export job for `set_name`, requested through `query`.
///
/// This is the job boundary: recoverable pipeline failures never reach
/// here, a fetch timeout becomes a user-visible error reply and anything
/// unhandled is logged and relayed to the operator chat.
pub async fn run_export(
    bot: &Bot,
    query: &CallbackQuery,
    set_name: &str,
    config: &Config,
    me: &Me,
) -> ResponseResult<()> {
    bot.answer_callback_query(&query.id).await?;

    let Some(message) = query.message.as_ref().and_then(|m| m.regular_message()) else {
        warn!("Export requested from an inaccessible message");
        return Ok(());
    };
    let chat_id = message.chat.id;

    info!(set_name, chat_id = chat_id.0, "Sticker pack export requested");

    bot.send_chat_action(chat_id, ChatAction::ChooseSticker)
        .await?;

    let source = TelegramStickerSource::new(bot.clone(), me.username().to_string());
    let delivery = TelegramDelivery::new(bot.clone(), chat_id);
    let operator: Option<Arc<dyn OperatorNotifier>> = config
        .telegram
        .operator_chat_id
        .map(|id| Arc::new(TelegramOperator::new(bot.clone(), ChatId(id))) as Arc<dyn OperatorNotifier>);

    let mut pipeline =
        ExportPipeline::new(source, delivery).with_options(config.export_options());
    if let Some(op) = operator.clone() {
        pipeline = pipeline.with_operator(op);
    }

    set_busy_indicator(bot, message).await;

    let result = pipeline.run(set_name).await;

    clear_indicator(bot, message).await;

    match result {
        Ok(report) => {
            info!(
                set_name,
                delivered = report.parts_delivered,
                lost = report.parts_lost,
                exported = report.assets_exported,
                "Sticker pack export finished"
            );
        }
        Err(ExportError::CollectionFetchTimeout { .. }) => {
            error!(set_name, "Timed out while getting the sticker set");
            bot.send_message(chat_id, "❌ Error while getting the sticker set")
                .await?;
        }
        Err(ExportError::Unhandled(err)) => {
            error!(set_name, "Sticker pack export failed: {:#}", err);
            if let Some(op) = operator {
                op.job_failure(
                    &format!("exporting sticker pack '{}' for chat {}", set_name, chat_id),
                    &err,
                )
                .await;
            }
        }
    }

    Ok(())
}

/// Swap the download button for a busy indicator while the job runs.
async fn set_busy_indicator(bot: &Bot, message: &Message) {
    let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(
        "⏳ Downloading...",
        "wait",
    )]]);

    let mut req = bot.edit_message_reply_markup(message.chat.id, message.id);
    req.reply_markup = Some(keyboard);
    if let Err(e) = req.await {
        warn!("Failed to set busy indicator: {}", e);
    }
}

async fn clear_indicator(bot: &Bot, message: &Message) {
    if let Err(e) = bot
        .edit_message_reply_markup(message.chat.id, message.id)
        .await
    {
        warn!("Failed to clear busy indicator: {}", e);
    }
}

fn lookup_error(err: RequestError) -> LookupError {
    if errors::is_timeout(&err) {
        LookupError::Timeout
    } else {
        LookupError::Other(err.into())
    }
}

fn transfer_error(err: RequestError) -> TransferError {
    if errors::is_timeout(&err) {
        TransferError::Timeout
    } else {
        TransferError::Other(err.into())
    }
}

fn download_error(err: DownloadError) -> TransferError {
    let timed_out = match &err {
        DownloadError::Network(e) => e.is_timeout(),
        DownloadError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
    };

    if timed_out {
        TransferError::Timeout
    } else {
        TransferError::Other(err.into())
    }
}

fn delivery_error(err: RequestError) -> DeliveryError {
    if errors::is_timeout(&err) {
        DeliveryError::Timeout
    } else {
        DeliveryError::Other(err.into())
    }
}
