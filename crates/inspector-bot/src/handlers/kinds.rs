//! Tagged classification of inbound messages.

use teloxide::types::{
    Animation, Audio, Dice, Document, Message, PhotoSize, Poll, Sticker, Video, Voice,
};

/// Every message shape the bot replies to, as one exhaustive sum type.
///
/// Classification order matters: animation messages also carry a document
/// payload, so animations are matched first.
pub enum MessageKind<'a> {
    Text(&'a str),
    Sticker(&'a Sticker),
    Photo(&'a [PhotoSize]),
    Animation(&'a Animation),
    Audio(&'a Audio),
    Document(&'a Document),
    Video(&'a Video),
    Voice(&'a Voice),
    Dice(&'a Dice),
    Poll(&'a Poll),
    /// Anything else (service messages, contacts, locations, ...).
    Unsupported,
}

impl<'a> MessageKind<'a> {
    pub fn classify(msg: &'a Message) -> Self {
        if let Some(text) = msg.text() {
            MessageKind::Text(text)
        } else if let Some(sticker) = msg.sticker() {
            MessageKind::Sticker(sticker)
        } else if let Some(photos) = msg.photo() {
            MessageKind::Photo(photos)
        } else if let Some(animation) = msg.animation() {
            MessageKind::Animation(animation)
        } else if let Some(audio) = msg.audio() {
            MessageKind::Audio(audio)
        } else if let Some(document) = msg.document() {
            MessageKind::Document(document)
        } else if let Some(video) = msg.video() {
            MessageKind::Video(video)
        } else if let Some(voice) = msg.voice() {
            MessageKind::Voice(voice)
        } else if let Some(dice) = msg.dice() {
            MessageKind::Dice(dice)
        } else if let Some(poll) = msg.poll() {
            MessageKind::Poll(poll)
        } else {
            MessageKind::Unsupported
        }
    }
}
