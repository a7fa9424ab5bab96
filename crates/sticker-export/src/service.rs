//! Collaborator boundaries of the export pipeline.
//!
//! The pipeline never talks to the messaging platform directly; it goes
//! through these traits so that the bot can plug in its client and the
//! tests can plug in scripted fakes.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{DeliveryError, LookupError, TransferError};
use crate::types::{Archive, StickerCollection, StickerRef};

/// Resolves a collection name to its sticker list.
#[async_trait]
pub trait CollectionLookup: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<StickerCollection, LookupError>;
}

/// Fetches one sticker's raw bytes.
#[async_trait]
pub trait AssetTransfer: Send + Sync {
    async fn fetch(&self, item: &StickerRef) -> Result<Bytes, TransferError>;
}

/// Transmits a finished archive back to the requester.
///
/// Implementations own the fixed instructional caption that accompanies
/// each archive.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, archive: &Archive) -> Result<(), DeliveryError>;
}

/// Optional alert channel towards an operator.
///
/// Both methods are fire-and-forget: a notification failure must never
/// influence the job, so implementations log and swallow their own errors.
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// An item was rejected as unsupported; `payload` is the raw download.
    async fn unsupported_asset(&self, item: &StickerRef, payload: &[u8], detail: &str);

    /// The job died outside the recoverable taxonomy.
    async fn job_failure(&self, context: &str, error: &anyhow::Error);
}

#[async_trait]
impl<T> CollectionLookup for Arc<T>
where
    T: CollectionLookup + ?Sized,
{
    async fn resolve(&self, name: &str) -> Result<StickerCollection, LookupError> {
        (**self).resolve(name).await
    }
}

#[async_trait]
impl<T> AssetTransfer for Arc<T>
where
    T: AssetTransfer + ?Sized,
{
    async fn fetch(&self, item: &StickerRef) -> Result<Bytes, TransferError> {
        (**self).fetch(item).await
    }
}

#[async_trait]
impl<T> DeliveryChannel for Arc<T>
where
    T: DeliveryChannel + ?Sized,
{
    async fn deliver(&self, archive: &Archive) -> Result<(), DeliveryError> {
        (**self).deliver(archive).await
    }
}
