#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::Mutex;
    use zip::ZipArchive;

    use crate::error::{DeliveryError, ExportError, LookupError, TransferError};
    use crate::pipeline::{ExportOptions, ExportPipeline};
    use crate::service::{AssetTransfer, CollectionLookup, DeliveryChannel, OperatorNotifier};
    use crate::types::{Archive, StickerCollection, StickerRef};

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            64,
            64,
            image::Rgba([10, 200, 30, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    fn collection(count: usize) -> StickerCollection {
        StickerCollection {
            name: "cats".to_string(),
            title: "Cats".to_string(),
            owner_handle: "@exporter_bot".to_string(),
            stickers: (1..=count)
                .map(|i| StickerRef {
                    file_id: format!("file-{}", i),
                    file_size: 64,
                    animated: false,
                })
                .collect(),
        }
    }

    /// Scripted platform side: lookup plus per-file download behavior.
    #[derive(Default)]
    struct FakeSource {
        /// `None` makes the lookup time out.
        collection: Option<StickerCollection>,
        /// File ids whose download times out.
        timeouts: Vec<String>,
        /// File ids that return bytes which are not an image.
        garbage: Vec<String>,
    }

    #[async_trait]
    impl CollectionLookup for FakeSource {
        async fn resolve(&self, _name: &str) -> Result<StickerCollection, LookupError> {
            match &self.collection {
                Some(collection) => Ok(collection.clone()),
                None => Err(LookupError::Timeout),
            }
        }
    }

    #[async_trait]
    impl AssetTransfer for FakeSource {
        async fn fetch(&self, item: &StickerRef) -> Result<Bytes, TransferError> {
            if self.timeouts.contains(&item.file_id) {
                return Err(TransferError::Timeout);
            }
            if self.garbage.contains(&item.file_id) {
                return Ok(Bytes::from_static(b"certainly not an image"));
            }
            Ok(Bytes::from(png_bytes()))
        }
    }

    /// Records delivered archives; can be scripted to time out on given
    /// delivery attempts (1-based call order).
    #[derive(Default)]
    struct RecordingDelivery {
        archives: Mutex<Vec<Archive>>,
        timeout_calls: Vec<u32>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl DeliveryChannel for RecordingDelivery {
        async fn deliver(&self, archive: &Archive) -> Result<(), DeliveryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.timeout_calls.contains(&call) {
                return Err(DeliveryError::Timeout);
            }
            self.archives.lock().await.push(archive.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingOperator {
        unsupported: Mutex<Vec<(String, usize)>>,
        failures: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OperatorNotifier for RecordingOperator {
        async fn unsupported_asset(&self, item: &StickerRef, payload: &[u8], _detail: &str) {
            self.unsupported
                .lock()
                .await
                .push((item.file_id.clone(), payload.len()));
        }

        async fn job_failure(&self, context: &str, _error: &anyhow::Error) {
            self.failures.lock().await.push(context.to_string());
        }
    }

    fn entry_names(archive: &Archive) -> Vec<String> {
        let mut zip = ZipArchive::new(Cursor::new(archive.bytes.to_vec())).unwrap();
        let mut names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_lookup_timeout_aborts_before_any_transmission() {
        let source = Arc::new(FakeSource::default());
        let delivery = Arc::new(RecordingDelivery::default());

        let pipeline = ExportPipeline::new(source, delivery.clone());
        let err = pipeline.run("cats").await.unwrap_err();

        assert!(matches!(
            err,
            ExportError::CollectionFetchTimeout { ref collection } if collection == "cats"
        ));
        assert_eq!(delivery.calls.load(Ordering::SeqCst), 0);
        assert!(delivery.archives.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_download_timeout_skips_item_but_keeps_the_rest() {
        let source = Arc::new(FakeSource {
            collection: Some(collection(5)),
            timeouts: vec!["file-2".to_string()],
            ..FakeSource::default()
        });
        let delivery = Arc::new(RecordingDelivery::default());

        let pipeline = ExportPipeline::new(source, delivery.clone());
        let report = pipeline.run("cats").await.unwrap();

        assert_eq!(report.skipped_download_timeout, 1);
        assert_eq!(report.assets_exported, 4);
        assert_eq!(report.parts_delivered, 1);

        let archives = delivery.archives.lock().await;
        assert_eq!(
            entry_names(&archives[0]),
            vec![
                "author.txt",
                "sticker_1.png",
                "sticker_3.png",
                "sticker_4.png",
                "sticker_5.png",
                "thumbnail.png",
                "title.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_unsupported_format_notifies_operator_with_payload() {
        let source = Arc::new(FakeSource {
            collection: Some(collection(3)),
            garbage: vec!["file-1".to_string()],
            ..FakeSource::default()
        });
        let delivery = Arc::new(RecordingDelivery::default());
        let operator = Arc::new(RecordingOperator::default());

        let pipeline = ExportPipeline::new(source, delivery.clone())
            .with_operator(operator.clone());
        let report = pipeline.run("cats").await.unwrap();

        assert_eq!(report.skipped_unsupported, 1);
        assert_eq!(report.assets_exported, 2);

        let unsupported = operator.unsupported.lock().await;
        assert_eq!(unsupported.len(), 1);
        assert_eq!(unsupported[0].0, "file-1");
        assert!(unsupported[0].1 > 0);
    }

    #[tokio::test]
    async fn test_fully_failed_batch_ships_metadata_only_archive() {
        let source = Arc::new(FakeSource {
            collection: Some(collection(3)),
            garbage: vec![
                "file-1".to_string(),
                "file-2".to_string(),
                "file-3".to_string(),
            ],
            ..FakeSource::default()
        });
        let delivery = Arc::new(RecordingDelivery::default());

        let pipeline = ExportPipeline::new(source, delivery.clone());
        let report = pipeline.run("cats").await.unwrap();

        assert_eq!(report.assets_exported, 0);
        assert_eq!(report.parts_delivered, 1);
        // No assets means no thumbnail, which is not a degraded part.
        assert_eq!(report.parts_degraded, 0);

        let archives = delivery.archives.lock().await;
        assert_eq!(entry_names(&archives[0]), vec!["author.txt", "title.txt"]);
    }

    #[tokio::test]
    async fn test_archive_names_follow_collection_and_ordinal() {
        let source = Arc::new(FakeSource {
            collection: Some(collection(3)),
            ..FakeSource::default()
        });
        let delivery = Arc::new(RecordingDelivery::default());

        let pipeline = ExportPipeline::new(source, delivery.clone()).with_options(ExportOptions {
            batch_size: 2,
            ..ExportOptions::default()
        });
        let report = pipeline.run("cats").await.unwrap();

        assert_eq!(report.parts_total, 2);

        let archives = delivery.archives.lock().await;
        let names: Vec<&str> = archives.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["cats.part1.wastickers", "cats.part2.wastickers"]);
    }

    #[tokio::test]
    async fn test_delivery_timeout_loses_part_and_continues() {
        let source = Arc::new(FakeSource {
            collection: Some(collection(4)),
            ..FakeSource::default()
        });
        let delivery = Arc::new(RecordingDelivery {
            timeout_calls: vec![1],
            ..RecordingDelivery::default()
        });

        let pipeline = ExportPipeline::new(source, delivery.clone()).with_options(ExportOptions {
            batch_size: 2,
            ..ExportOptions::default()
        });
        let report = pipeline.run("cats").await.unwrap();

        assert_eq!(report.parts_total, 2);
        assert_eq!(report.parts_lost, 1);
        assert_eq!(report.parts_delivered, 1);

        let archives = delivery.archives.lock().await;
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].filename, "cats.part2.wastickers");
    }

    #[tokio::test]
    async fn test_positions_restart_for_every_batch() {
        let source = Arc::new(FakeSource {
            collection: Some(collection(3)),
            ..FakeSource::default()
        });
        let delivery = Arc::new(RecordingDelivery::default());

        let pipeline = ExportPipeline::new(source, delivery.clone()).with_options(ExportOptions {
            batch_size: 2,
            ..ExportOptions::default()
        });
        pipeline.run("cats").await.unwrap();

        let archives = delivery.archives.lock().await;
        assert_eq!(
            entry_names(&archives[1]),
            vec!["author.txt", "sticker_1.png", "thumbnail.png", "title.txt"]
        );
    }
}
