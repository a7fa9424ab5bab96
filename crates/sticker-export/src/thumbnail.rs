//! Representative thumbnail derivation for one archive part.

#[cfg(test)]
#[path = "thumbnail_tests.rs"]
mod thumbnail_tests;

use std::io::Cursor;

use bytes::Bytes;
use image::ImageOutputFormat;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::types::{NormalizedAsset, Thumbnail};

/// Maximum edge of a part thumbnail.
pub const THUMBNAIL_DIMENSION: u32 = 96;

/// Derivation attempts before a part ships without a thumbnail.
pub const DEFAULT_THUMBNAIL_ATTEMPTS: usize = 3;

/// Derive a PNG thumbnail of at most `THUMBNAIL_DIMENSION` per edge,
/// keeping the source's aspect ratio.
pub fn derive(source: &[u8]) -> Result<Thumbnail, image::ImageError> {
    let img = image::load_from_memory(source)?;
    let small = img.thumbnail(THUMBNAIL_DIMENSION, THUMBNAIL_DIMENSION);

    let mut buf = Vec::new();
    small.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;

    Ok(Thumbnail {
        bytes: Bytes::from(buf),
    })
}

/// Pick one normalized asset uniformly at random and derive the part
/// thumbnail from it, re-picking on failure up to `attempts` times.
///
/// Returns `None` for an empty batch, or when every attempt failed to
/// decode; the caller records the latter as a degraded part instead of
/// retrying forever.
pub fn select(assets: &[NormalizedAsset], attempts: usize) -> Option<Thumbnail> {
    if assets.is_empty() {
        return None;
    }

    let mut rng = rand::thread_rng();
    for attempt in 1..=attempts.max(1) {
        let source = assets.choose(&mut rng)?;
        match derive(&source.bytes) {
            Ok(thumbnail) => return Some(thumbnail),
            Err(err) => warn!(
                attempt,
                source = %source.filename,
                %err,
                "thumbnail derivation failed"
            ),
        }
    }
    None
}
