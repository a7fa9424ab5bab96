#[cfg(test)]
mod tests {
    use crate::batch::partition;

    #[test]
    fn test_partition_covers_input_in_order() {
        let items: Vec<u32> = (0..95).collect();

        let rebuilt: Vec<u32> = partition(&items, 30).flatten().copied().collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_partition_batch_sizes() {
        let items: Vec<u32> = (0..95).collect();

        let sizes: Vec<usize> = partition(&items, 30).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![30, 30, 30, 5]);
    }

    #[test]
    fn test_partition_exact_multiple_has_no_trailing_batch() {
        let items: Vec<u32> = (0..60).collect();

        let sizes: Vec<usize> = partition(&items, 30).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![30, 30]);
    }

    #[test]
    fn test_partition_empty_input_yields_no_batches() {
        let items: Vec<u32> = Vec::new();

        assert_eq!(partition(&items, 30).count(), 0);
    }

    #[test]
    fn test_partition_is_restartable() {
        let items: Vec<u32> = (0..10).collect();

        let first: Vec<Vec<u32>> = partition(&items, 3).map(|b| b.to_vec()).collect();
        let second: Vec<Vec<u32>> = partition(&items, 3).map(|b| b.to_vec()).collect();
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "batch size must be non-zero")]
    fn test_partition_rejects_zero_batch_size() {
        let items = [1u32, 2, 3];
        let _ = partition(&items, 0);
    }
}
