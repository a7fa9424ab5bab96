//! Data model of the export pipeline.
//!
//! Every entity is owned by the stage that creates it and handed to the
//! next stage by value; nothing is shared across batches.

use bytes::Bytes;

/// Entry name of the per-part thumbnail inside an archive.
pub const THUMBNAIL_FILENAME: &str = "thumbnail.png";

/// File extension of the produced archives, understood by the Sticker
/// Maker import application.
pub const EXPORT_EXTENSION: &str = "wastickers";

/// A named sticker collection as resolved by the platform lookup.
///
/// Immutable once fetched; every export job fetches it fresh.
#[derive(Debug, Clone)]
pub struct StickerCollection {
    /// Platform-assigned short identifier.
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Handle written into each archive's `author.txt`.
    pub owner_handle: String,
    /// Stickers in collection order.
    pub stickers: Vec<StickerRef>,
}

/// One sticker of a collection, as declared by the platform.
#[derive(Debug, Clone)]
pub struct StickerRef {
    /// Opaque platform file identifier.
    pub file_id: String,
    /// Declared size in bytes.
    pub file_size: u32,
    /// Declared animated flag.
    pub animated: bool,
}

/// A sticker image re-encoded into the canonical export form.
#[derive(Debug, Clone)]
pub struct NormalizedAsset {
    /// `sticker_<n>.<ext>`, unique within its batch.
    pub filename: String,
    /// 512x512 PNG bytes.
    pub bytes: Bytes,
}

/// Representative preview for one archive part. At most 96x96 PNG.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub bytes: Bytes,
}

/// One batch worth of export content, consumed by the archive builder.
#[derive(Debug, Clone)]
pub struct ExportPart {
    /// 1-based, monotonically increasing per job.
    pub ordinal: u32,
    pub author: String,
    pub title: String,
    pub assets: Vec<NormalizedAsset>,
    pub thumbnail: Option<Thumbnail>,
}

/// A finished archive ready for delivery. Held in memory, never persisted.
#[derive(Debug, Clone)]
pub struct Archive {
    /// `<collection-name>.part<N>.wastickers`.
    pub filename: String,
    pub bytes: Bytes,
}

/// Terminal status of an export job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub collection: String,
    pub parts_total: u32,
    pub parts_delivered: u32,
    /// Parts whose transmission timed out; their archives are lost.
    pub parts_lost: u32,
    /// Parts shipped without a thumbnail after derivation kept failing.
    pub parts_degraded: u32,
    pub assets_exported: u32,
    pub skipped_download_timeout: u32,
    pub skipped_unsupported: u32,
}
