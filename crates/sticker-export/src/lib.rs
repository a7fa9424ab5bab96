//! Sticker pack export pipeline
//!
//! Given the name of a sticker collection, fetches every sticker through
//! platform adapters, normalizes each into a canonical 512x512 PNG,
//! bundles size-bounded batches into `.wastickers` archives and hands
//! them to a delivery channel one part at a time.
//!
//! Failure containment is the defining property of the pipeline: a
//! sticker that times out or turns out not to be an image only removes
//! itself from its batch, and a part whose delivery times out is lost
//! without touching the rest of the job. Only a failed collection lookup
//! aborts the whole export.

pub mod archive;
pub mod batch;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod service;
pub mod thumbnail;
pub mod types;

pub use error::{DeliveryError, ExportError, LookupError, NormalizeError, TransferError};
pub use pipeline::{ExportOptions, ExportPipeline};
pub use service::{AssetTransfer, CollectionLookup, DeliveryChannel, OperatorNotifier};
pub use types::{
    Archive, ExportPart, ExportReport, NormalizedAsset, StickerCollection, StickerRef, Thumbnail,
};
