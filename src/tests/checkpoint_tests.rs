#[cfg(test)]
mod tests {
    use crate::checkpoint::{CheckpointStore, FileCheckpointStore};
    use crate::models::Checkpoint;
    use crate::tests::date;

    fn sample(height: u64, total: u64) -> Checkpoint {
        Checkpoint {
            date: date(2016, 3, 1),
            current_height: height,
            total_transactions: total,
            start_height: Some(990_000),
            start_timestamp: Some(1_456_790_000),
        }
    }

    #[tokio::test]
    async fn test_missing_file_means_no_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("checkpoint.json"));

        assert_eq!(store.load().await, None);
        // Clearing nothing is fine.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_overwrites_single_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("checkpoint.json"));

        store.save(&sample(990_001, 12)).await.unwrap();
        store.save(&sample(990_002, 20)).await.unwrap();

        assert_eq!(store.load().await, Some(sample(990_002, 20)));
    }

    #[tokio::test]
    async fn test_clear_removes_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("checkpoint.json"));

        store.save(&sample(990_001, 12)).await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.load().await, None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_document_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("checkpoint.json"));

        store.save(&sample(990_001, 12)).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();

        assert_eq!(raw["date"], "2016-03-01");
        assert_eq!(raw["currentHeight"], 990_001);
        assert_eq!(raw["totalTransactions"], 12);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        std::fs::write(&path, b"{\"date\": \"not a date\"").unwrap();
        let store = FileCheckpointStore::new(path);

        assert_eq!(store.load().await, None);
    }
}
