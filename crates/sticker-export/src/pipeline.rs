//! The export orchestrator.
//!
//! Drives one job end to end: resolve the collection, walk its stickers
//! batch by batch through download, normalization, thumbnailing and
//! archiving, and hand each finished archive to the delivery channel
//! before starting the next batch.

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod pipeline_tests;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::archive;
use crate::batch::{self, DEFAULT_BATCH_SIZE};
use crate::error::{DeliveryError, ExportError, LookupError, NormalizeError, TransferError};
use crate::normalize;
use crate::service::{AssetTransfer, CollectionLookup, DeliveryChannel, OperatorNotifier};
use crate::thumbnail::{self, DEFAULT_THUMBNAIL_ATTEMPTS};
use crate::types::{ExportPart, ExportReport};

/// Tunables of an export job.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Stickers per archive part.
    pub batch_size: usize,
    /// Thumbnail derivation attempts before a part ships without one.
    pub thumbnail_attempts: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            thumbnail_attempts: DEFAULT_THUMBNAIL_ATTEMPTS,
        }
    }
}

/// One export job's worth of collaborators and tunables.
///
/// Batches run strictly one after another; all state is job-local and
/// dropped when `run` returns. Per-item and per-part failures are
/// contained where they happen. Only a collection lookup failure or a
/// collaborator error outside the timeout taxonomy ends the job.
pub struct ExportPipeline<S, D>
where
    S: CollectionLookup + AssetTransfer,
    D: DeliveryChannel,
{
    source: S,
    delivery: D,
    operator: Option<Arc<dyn OperatorNotifier>>,
    options: ExportOptions,
}

impl<S, D> ExportPipeline<S, D>
where
    S: CollectionLookup + AssetTransfer,
    D: DeliveryChannel,
{
    pub fn new(source: S, delivery: D) -> Self {
        Self {
            source,
            delivery,
            operator: None,
            options: ExportOptions::default(),
        }
    }

    pub fn with_operator(mut self, operator: Arc<dyn OperatorNotifier>) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the export job for the collection called `name`.
    pub async fn run(&self, name: &str) -> Result<ExportReport, ExportError> {
        info!(collection = name, "starting sticker pack export");

        let collection = match self.source.resolve(name).await {
            Ok(collection) => collection,
            Err(LookupError::Timeout) => {
                error!(collection = name, "timed out resolving the sticker collection");
                return Err(ExportError::CollectionFetchTimeout {
                    collection: name.to_string(),
                });
            }
            Err(LookupError::Other(err)) => {
                return Err(ExportError::Unhandled(
                    err.context("resolving sticker collection"),
                ));
            }
        };

        let mut report = ExportReport {
            collection: collection.name.clone(),
            ..ExportReport::default()
        };

        for (index, items) in
            batch::partition(&collection.stickers, self.options.batch_size).enumerate()
        {
            let ordinal = index as u32 + 1;
            let mut assets = Vec::with_capacity(items.len());

            for (position, item) in items.iter().enumerate() {
                let position = position + 1;

                let payload = match self.source.fetch(item).await {
                    Ok(payload) => payload,
                    Err(TransferError::Timeout) => {
                        warn!(
                            ordinal,
                            position,
                            file_id = %item.file_id,
                            "sticker download timed out, skipping item"
                        );
                        report.skipped_download_timeout += 1;
                        continue;
                    }
                    Err(TransferError::Other(err)) => {
                        return Err(ExportError::Unhandled(err.context("downloading sticker")));
                    }
                };

                let worker_payload = payload.clone();
                let normalized =
                    tokio::task::spawn_blocking(move || normalize::normalize(&worker_payload, position))
                        .await
                        .context("normalization task failed")?;

                match normalized {
                    Ok(asset) => assets.push(asset),
                    Err(NormalizeError::UnsupportedFormat) => {
                        warn!(
                            ordinal,
                            position,
                            file_id = %item.file_id,
                            declared_size = item.file_size,
                            animated = item.animated,
                            "sticker is not a static raster image, skipping item"
                        );
                        report.skipped_unsupported += 1;
                        if let Some(operator) = &self.operator {
                            operator
                                .unsupported_asset(item, &payload, "not a static raster image")
                                .await;
                        }
                    }
                    Err(NormalizeError::Encode(err)) => {
                        return Err(ExportError::Unhandled(
                            anyhow::Error::new(err).context("re-encoding sticker"),
                        ));
                    }
                }
            }

            let thumbnail = thumbnail::select(&assets, self.options.thumbnail_attempts);
            if thumbnail.is_none() && !assets.is_empty() {
                warn!(ordinal, "no thumbnail could be derived, part ships degraded");
                report.parts_degraded += 1;
            }

            report.assets_exported += assets.len() as u32;

            let part = ExportPart {
                ordinal,
                author: collection.owner_handle.clone(),
                title: collection.title.clone(),
                assets,
                thumbnail,
            };

            let archive = archive::build(&collection.name, &part).context("building archive part")?;
            report.parts_total += 1;

            match self.delivery.deliver(&archive).await {
                Ok(()) => {
                    info!(ordinal, archive = %archive.filename, "archive part delivered");
                    report.parts_delivered += 1;
                }
                Err(DeliveryError::Timeout) => {
                    // The part is lost for good: no retry, no redelivery.
                    error!(
                        ordinal,
                        archive = %archive.filename,
                        "archive delivery timed out, part lost"
                    );
                    report.parts_lost += 1;
                }
                Err(DeliveryError::Other(err)) => {
                    return Err(ExportError::Unhandled(err.context("delivering archive part")));
                }
            }
        }

        info!(
            collection = %report.collection,
            parts = report.parts_total,
            delivered = report.parts_delivered,
            exported = report.assets_exported,
            skipped = report.skipped_download_timeout + report.skipped_unsupported,
            "sticker pack export finished"
        );

        Ok(report)
    }
}
