//! Archive assembly for one export part.

#[cfg(test)]
#[path = "archive_tests.rs"]
mod archive_tests;

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::types::{Archive, ExportPart, EXPORT_EXTENSION, THUMBNAIL_FILENAME};

/// Bundle one part into a deflate-compressed archive held in memory.
///
/// The archive contains `author.txt`, `title.txt`
/// (`"<title> - (<ordinal>)"`), every normalized asset under its own
/// filename and, when present, the thumbnail under `thumbnail.png`.
/// A part without any assets still yields a valid archive carrying the
/// two metadata entries. No network or disk is touched.
pub fn build(collection_name: &str, part: &ExportPart) -> Result<Archive, zip::result::ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("author.txt", options)?;
    writer.write_all(part.author.as_bytes())?;

    writer.start_file("title.txt", options)?;
    writer.write_all(format!("{} - ({})", part.title, part.ordinal).as_bytes())?;

    for asset in &part.assets {
        writer.start_file(asset.filename.as_str(), options)?;
        writer.write_all(&asset.bytes)?;
    }

    if let Some(thumbnail) = &part.thumbnail {
        writer.start_file(THUMBNAIL_FILENAME, options)?;
        writer.write_all(&thumbnail.bytes)?;
    }

    let cursor = writer.finish()?;

    Ok(Archive {
        filename: format!(
            "{}.part{}.{}",
            collection_name, part.ordinal, EXPORT_EXTENSION
        ),
        bytes: Bytes::from(cursor.into_inner()),
    })
}
