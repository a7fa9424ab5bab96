//! Failure taxonomy of the export pipeline.
//!
//! The collaborator errors separate `Timeout`, recoverable at item or
//! part granularity, from everything else, which terminates the job and
//! surfaces at the job boundary.

use thiserror::Error;

/// Collection lookup failures.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("collection lookup timed out")]
    Timeout,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Per-item asset download failures.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("asset download timed out")]
    Timeout,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Archive delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("archive delivery timed out")]
    Timeout,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of the classify/resize/re-encode step.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The payload does not sniff and decode as a static raster image.
    #[error("unsupported asset format")]
    UnsupportedFormat,
    /// The decoded image could not be re-encoded.
    #[error("failed to re-encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Job-terminating failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The collection could not be resolved in time; no batch work ran.
    #[error("timed out resolving sticker collection '{collection}'")]
    CollectionFetchTimeout { collection: String },
    /// Any failure outside the recoverable taxonomy.
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}
