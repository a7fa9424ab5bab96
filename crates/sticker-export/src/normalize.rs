//! Classification and canonical re-encoding of a downloaded sticker.

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod normalize_tests;

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{GenericImageView, ImageOutputFormat};
use tracing::debug;

use crate::error::NormalizeError;
use crate::types::NormalizedAsset;

/// Canonical square edge of an exported sticker.
pub const STICKER_DIMENSION: u32 = 512;

/// Classify `payload` by sniffing its content and re-encode it as a
/// `STICKER_DIMENSION`-square PNG named after `position`, the item's
/// 1-based place within its batch.
///
/// Declared extensions and MIME hints from the source metadata are never
/// consulted; only the magic bytes count. Anything that does not sniff
/// and decode as a raster image is rejected as unsupported. The image is
/// stretched, not cropped, so nothing of the artwork is lost.
///
/// CPU-bound; callers on an async runtime should run this under
/// `spawn_blocking`.
pub fn normalize(payload: &[u8], position: usize) -> Result<NormalizedAsset, NormalizeError> {
    let format = image::guess_format(payload).map_err(|_| NormalizeError::UnsupportedFormat)?;
    let extension = format.extensions_str().first().copied().unwrap_or("bin");

    let img = image::load_from_memory_with_format(payload, format)
        .map_err(|_| NormalizeError::UnsupportedFormat)?;

    debug!(
        ?format,
        width = img.width(),
        height = img.height(),
        "normalizing sticker image"
    );

    let resized = img.resize_exact(STICKER_DIMENSION, STICKER_DIMENSION, FilterType::Lanczos3);

    let mut buf = Vec::new();
    resized.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;

    Ok(NormalizedAsset {
        filename: format!("sticker_{}.{}", position, extension),
        bytes: Bytes::from(buf),
    })
}
