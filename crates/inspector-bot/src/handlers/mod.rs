//! Update handlers for the inspector bot

pub mod kinds;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{
    Animation, Audio, CallbackQuery, ChatAction, Dice, DiceEmoji, Document, InlineKeyboardButton,
    InlineKeyboardMarkup, InlineQuery, InlineQueryResult, InlineQueryResultArticle, InputFile,
    InputMessageContent, InputMessageContentText, Me, Message, MessageOrigin, ParseMode, PhotoSize,
    Poll, PollType, ReplyMarkup, Sticker, Video, Voice,
};
use teloxide::utils::html::escape;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::exporter;
use crate::format::{duration, file_size, text_tree};
use kinds::MessageKind;

/// Sticker sent along with the `/start` greeting.
const GREETING_STICKER_ID: &str =
    "CAACAgEAAxkBAAIBdWERw-axEySQ7ofMjO_YXEnObBThAAL3BwAC43gEAAHKoBGRYVqPJCAE";

/// Rating channel linked from the greeting keyboard.
const RATE_URL: &str = "https://t.me/BotsArchive/2158";

const INFO_TEXT: &str = "<b>ℹ️ Information</b>\n\n\
    Send me any message and I will reply with its metadata.\n\
    Send a sticker and I can export its whole pack as Sticker Maker archives.";

/// Handle every inbound message
pub async fn handle_message(bot: Bot, msg: Message) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return handle_command(&bot, &msg, text).await;
        }
    }

    match MessageKind::classify(&msg) {
        MessageKind::Text(_) => handle_text(&bot, &msg).await,
        MessageKind::Sticker(sticker) => handle_sticker(&bot, &msg, sticker).await,
        MessageKind::Photo(photos) => handle_photo(&bot, &msg, photos).await,
        MessageKind::Animation(animation) => handle_animation(&bot, &msg, animation).await,
        MessageKind::Audio(audio) => handle_audio(&bot, &msg, audio).await,
        MessageKind::Document(document) => handle_document(&bot, &msg, document).await,
        MessageKind::Video(video) => handle_video(&bot, &msg, video).await,
        MessageKind::Voice(voice) => handle_voice(&bot, &msg, voice).await,
        MessageKind::Dice(dice) => handle_dice(&bot, &msg, dice).await,
        MessageKind::Poll(poll) => handle_poll(&bot, &msg, poll).await,
        MessageKind::Unsupported => {
            debug!("Ignoring unsupported message kind");
            Ok(())
        }
    }
}

/// Handle commands
async fn handle_command(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<()> {
    let command = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    info!("Received command: {}", command);

    match command.as_str() {
        "start" => start_command(bot, msg).await,
        _ => {
            debug!("Ignoring unknown command: {}", command);
            Ok(())
        }
    }
}

async fn start_command(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    bot.send_sticker(msg.chat.id, InputFile::file_id(GREETING_STICKER_ID.to_string()))
        .await?;

    let first_name = msg
        .from
        .as_ref()
        .map(|u| u.first_name.clone())
        .unwrap_or_default();

    let mut top_row = Vec::new();
    match Url::parse(RATE_URL) {
        Ok(url) => top_row.push(InlineKeyboardButton::url("⭐️ Rate me", url)),
        Err(e) => warn!("Invalid rate URL: {}", e),
    }
    top_row.push(InlineKeyboardButton::switch_inline_query("Your info", "i"));

    let keyboard = InlineKeyboardMarkup::new([
        top_row,
        vec![InlineKeyboardButton::callback("ℹ", "info")],
    ]);

    let mut req = bot.send_message(
        msg.chat.id,
        format!("<b>I am ready {}, send the message.</b>", escape(&first_name)),
    );
    req.parse_mode = Some(ParseMode::Html);
    req.reply_markup = Some(ReplyMarkup::InlineKeyboard(keyboard));
    req.await?;

    Ok(())
}

/// Handle text messages
async fn handle_text(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let rows = match msg.from.as_ref() {
        Some(user) => vec![
            ("👤Name", Some(user.first_name.clone())),
            ("Username", user.username.clone()),
            ("ID", Some(user.id.0.to_string())),
            ("Lang", user.language_code.clone()),
        ],
        None => vec![("👤Name", None)],
    };

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle sticker messages
async fn handle_sticker(bot: &Bot, msg: &Message, sticker: &Sticker) -> ResponseResult<()> {
    debug!("Received sticker message");

    if !sticker.is_animated() {
        bot.send_chat_action(msg.chat.id, ChatAction::UploadPhoto)
            .await?;

        // Echo the sticker image back as a regular photo.
        match exporter::download_sticker_image(bot, sticker).await {
            Ok(bytes) => {
                bot.send_photo(msg.chat.id, InputFile::memory(bytes)).await?;
            }
            Err(e) => warn!("Failed to download sticker image: {:#}", e),
        }
    } else {
        bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;
    }

    let set_name = sticker.set_name.clone();
    let rows = [
        ("🎨Sticker ID", Some(sticker.file.id.to_string())),
        ("Emoji", sticker.emoji.clone()),
        ("Set Name", set_name.clone()),
        (
            "Link Set",
            set_name
                .as_ref()
                .map(|name| format!("https://t.me/addstickers/{}", name)),
        ),
        ("Size", Some(file_size(sticker.file.size as u64))),
    ];

    let mut req = bot.send_message(msg.chat.id, with_forwarded(msg, text_tree(&rows)));
    req.parse_mode = Some(ParseMode::Html);
    if let Some(name) = set_name {
        req.reply_markup = Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new([[
            InlineKeyboardButton::callback("⬇️ Download pack", format!("ds:{}", name)),
        ]])));
    }
    req.await?;

    Ok(())
}

/// Handle photo messages
async fn handle_photo(bot: &Bot, msg: &Message, photos: &[PhotoSize]) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let Some(photo) = photos.last() else {
        return Ok(());
    };

    let rows = [
        ("🖼Photo", None),
        ("Height", Some(photo.height.to_string())),
        ("Width", Some(photo.width.to_string())),
        ("Size", Some(file_size(photo.file.size as u64))),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle animation (GIF) messages
async fn handle_animation(bot: &Bot, msg: &Message, animation: &Animation) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let rows = [
        ("🎬Animation", None),
        ("Duration", Some(duration(animation.duration.seconds()))),
        ("Size", Some(file_size(animation.file.size as u64))),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle audio messages
async fn handle_audio(bot: &Bot, msg: &Message, audio: &Audio) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let rows = [
        ("🎧Audio", None),
        ("FileName", audio.file_name.clone()),
        ("Duration", Some(duration(audio.duration.seconds()))),
        ("Size", Some(file_size(audio.file.size as u64))),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle document messages
async fn handle_document(bot: &Bot, msg: &Message, document: &Document) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let rows = [
        ("📄Document", None),
        ("Doc. Name", document.file_name.clone()),
        ("Size", Some(file_size(document.file.size as u64))),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle video messages
async fn handle_video(bot: &Bot, msg: &Message, video: &Video) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let rows = [
        ("📼Video", None),
        ("Duration", Some(duration(video.duration.seconds()))),
        ("Size", Some(file_size(video.file.size as u64))),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle voice messages
async fn handle_voice(bot: &Bot, msg: &Message, voice: &Voice) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let rows = [
        ("🎤Voice", None),
        ("Duration", Some(duration(voice.duration.seconds()))),
        ("Size", Some(file_size(voice.file.size as u64))),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle dice messages
async fn handle_dice(bot: &Bot, msg: &Message, dice: &Dice) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let emoji = match dice.emoji {
        DiceEmoji::Dice => "🎲",
        DiceEmoji::Darts => "🎯",
        DiceEmoji::Basketball => "🏀",
        DiceEmoji::Football => "⚽",
        DiceEmoji::Bowling => "🎳",
        DiceEmoji::SlotMachine => "🎰",
    };

    let rows = [
        ("🎲Dice", None),
        ("Emoji", Some(emoji.to_string())),
        ("Value", Some(dice.value.to_string())),
    ];

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle poll messages
async fn handle_poll(bot: &Bot, msg: &Message, poll: &Poll) -> ResponseResult<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let poll_type = match poll.poll_type {
        PollType::Quiz => "quiz",
        PollType::Regular => "regular",
    };

    let mut rows = vec![
        ("📊Poll", None),
        ("Type", Some(poll_type.to_string())),
        ("Question", Some(poll.question.clone())),
        (
            "Anonymous",
            Some(if poll.is_anonymous { "Yes" } else { "No" }.to_string()),
        ),
        (
            "Mult. Answers",
            Some(
                if poll.allows_multiple_answers {
                    "Yes"
                } else {
                    "No"
                }
                .to_string(),
            ),
        ),
        ("Options", Some(poll.options.len().to_string())),
    ];

    for option in &poll.options {
        rows.push((option.text.as_str(), Some(option.voter_count.to_string())));
    }

    reply_html(bot, msg, with_forwarded(msg, text_tree(&rows))).await
}

/// Handle callback queries (button clicks)
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    config: Arc<Config>,
    me: Me,
) -> ResponseResult<()> {
    let Some(data) = query.data.clone() else {
        return Ok(());
    };

    debug!("Received callback query: {}", data);

    if data == "info" {
        return info_callback(&bot, &query).await;
    }

    if let Some(set_name) = data.strip_prefix("ds:") {
        return exporter::run_export(&bot, &query, set_name, &config, &me).await;
    }

    // Taps on the busy indicator and anything unknown just get dismissed.
    bot.answer_callback_query(&query.id).await?;
    Ok(())
}

async fn info_callback(bot: &Bot, query: &CallbackQuery) -> ResponseResult<()> {
    bot.answer_callback_query(&query.id).await?;

    let Some(message) = query.message.as_ref().and_then(|m| m.regular_message()) else {
        return Ok(());
    };

    let mut req = bot.edit_message_text(message.chat.id, message.id, INFO_TEXT);
    req.parse_mode = Some(ParseMode::Html);
    req.await?;

    Ok(())
}

/// Handle inline queries (@bot query)
pub async fn handle_inline_query(bot: Bot, query: InlineQuery) -> ResponseResult<()> {
    if query.query.is_empty() {
        return Ok(());
    }

    debug!("Received inline query: {}", query.query);

    let user = &query.from;
    let mut rows = vec![("👤Name", Some(user.first_name.clone()))];
    if let Some(username) = &user.username {
        rows.push(("Username", Some(username.clone())));
    }
    rows.push(("ID", Some(user.id.0.to_string())));

    let mut content = InputMessageContentText::new(text_tree(&rows));
    content.parse_mode = Some(ParseMode::Html);

    let article = InlineQueryResultArticle::new(
        Uuid::new_v4().to_string(),
        "Tap to share your user information",
        InputMessageContent::Text(content),
    );

    let mut req = bot.answer_inline_query(
        &query.id,
        vec![InlineQueryResult::Article(article)],
    );
    req.is_personal = Some(true);
    req.cache_time = Some(0);
    req.await?;

    Ok(())
}

/// Origin details prefixed to replies for forwarded messages.
fn forwarded_origin(msg: &Message) -> Option<String> {
    let origin = msg.forward_origin()?;

    debug!("Forwarded message: {:?}", origin);

    match origin {
        MessageOrigin::Channel {
            chat, message_id, ..
        } => Some(text_tree(&[
            ("🔊Channel", chat.title().map(|s| s.to_string())),
            ("Username", chat.username().map(|s| s.to_string())),
            ("ID", Some(chat.id.to_string())),
            ("Message ID", Some(message_id.0.to_string())),
        ])),
        MessageOrigin::User { sender_user, .. } => {
            let label = if sender_user.is_bot { "🤖Name" } else { "👤Name" };
            Some(text_tree(&[
                (label, Some(sender_user.first_name.clone())),
                (
                    "Username",
                    Some(
                        sender_user
                            .username
                            .as_ref()
                            .map(|u| format!("@{}", u))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ),
                ("ID", Some(sender_user.id.0.to_string())),
            ]))
        }
        MessageOrigin::HiddenUser {
            sender_user_name, ..
        } => Some(text_tree(&[("👤Name", Some(sender_user_name.clone()))])),
        MessageOrigin::Chat { sender_chat, .. } => Some(text_tree(&[
            ("💬Chat", sender_chat.title().map(|s| s.to_string())),
            ("ID", Some(sender_chat.id.to_string())),
        ])),
    }
}

fn with_forwarded(msg: &Message, text: String) -> String {
    match forwarded_origin(msg) {
        Some(info) => format!("{}\n\n{}", info, text),
        None => text,
    }
}

async fn reply_html(bot: &Bot, msg: &Message, text: String) -> ResponseResult<()> {
    let mut req = bot.send_message(msg.chat.id, text);
    req.parse_mode = Some(ParseMode::Html);
    req.await?;
    Ok(())
}
