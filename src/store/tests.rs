//! Tests for the record store.

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::store::{Error, Filter, Record, RecordStore};

    fn filter_first(first: &str) -> Filter {
        Filter {
            first: Some(first.to_string()),
            ..Filter::default()
        }
    }

    #[tokio::test]
    async fn test_append_assigns_ids_from_one() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("db.json"));

        let a = store.append("Mick", "Jagger").await.unwrap();
        let b = store.append("Keith", "Richards").await.unwrap();
        let c = store.append("Charlie", "Watts").await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_append_then_query_round_trip() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("db.json"));

        let appended = store.append("Mick", "Jagger").await.unwrap();
        let records = store.query(&Filter::default()).await.unwrap();

        assert_eq!(records, vec![appended]);
        assert_eq!(records[0].first, "Mick");
        assert_eq!(records[0].last, "Jagger");
    }

    #[tokio::test]
    async fn test_query_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nope.json"));
        let records = store.query(&Filter::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_query_empty_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"").unwrap();

        let store = RecordStore::new(&path);
        let records = store.query(&Filter::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_surfaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = RecordStore::new(&path);
        let result = store.query(&Filter::default()).await;
        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_query_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("db.json"));
        store.append("Mick", "Jagger").await.unwrap();
        store.append("Mick", "Taylor").await.unwrap();

        let filter = filter_first("Mick");
        let once = store.query(&filter).await.unwrap();
        let twice = store.query(&filter).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_filter_matches_conjunctively() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("db.json"));
        store.append("Mick", "Jagger").await.unwrap();
        store.append("Mick", "Taylor").await.unwrap();
        store.append("Keith", "Richards").await.unwrap();

        let micks = store.query(&filter_first("Mick")).await.unwrap();
        assert_eq!(micks.len(), 2);
        assert!(micks.iter().all(|r| r.first == "Mick"));

        let one = store
            .query(&Filter {
                first: Some("Mick".to_string()),
                last: Some("Taylor".to_string()),
                ..Filter::default()
            })
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, 2);

        let by_id = store
            .query(&Filter {
                id: Some(3),
                ..Filter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].first, "Keith");
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = RecordStore::new(&path);
        store.append("Mick", "Jagger").await.unwrap();
        drop(store);

        let reopened = RecordStore::new(&path);
        let records = reopened.query(&Filter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        let next = reopened.append("Keith", "Richards").await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_snapshot_uses_wire_field_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = RecordStore::new(&path);
        store.append("Mick", "Jagger").await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"number\":1"));
        assert!(!raw.contains("\"id\""));

        let decoded: Vec<Record> = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded[0].id, 1);
    }

    #[tokio::test]
    async fn test_append_surfaces_write_failure() {
        let dir = tempdir().unwrap();
        // Parent directory of the snapshot does not exist, so the temp-file
        // write fails.
        let store = RecordStore::new(dir.path().join("absent/db.json"));
        let result = store.append("Mick", "Jagger").await;
        assert!(matches!(result, Err(Error::Write(_))));
    }

    #[tokio::test]
    async fn test_append_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = RecordStore::new(&path);
        store.append("Mick", "Jagger").await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
