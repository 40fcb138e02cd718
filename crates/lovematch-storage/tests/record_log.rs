use std::time::Duration;

use lovematch_storage::{CompatibilityRecord, LazyRecordSink, StoreTarget, connect};

#[test]
fn every_backend_appends_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let targets = [
        StoreTarget::JsonLines(dir.path().join("checks.jsonl")),
        StoreTarget::Sqlite(dir.path().join("checks.db")),
        StoreTarget::SqliteMemory,
    ];

    for target in targets {
        let sink = connect(&target, Duration::from_secs(1)).expect("connect");
        for (i, (a, b)) in [("John", "Mary"), ("Romeo", "Juliet"), ("Luke", "Leia")]
            .into_iter()
            .enumerate()
        {
            sink.append(&CompatibilityRecord::new(a, b, i as u16))
                .expect("append");
        }

        assert_eq!(sink.count().expect("count"), 3, "{}", target.backend());
        let recent = sink.recent(2).expect("recent");
        let names: Vec<_> = recent.iter().map(|r| r.name1.as_str()).collect();
        assert_eq!(names, ["Luke", "Romeo"], "{}", target.backend());
        assert_eq!(sink.stats()["backend"], target.backend());
    }
}

#[tokio::test]
async fn lazy_sink_opens_jsonl_file_on_first_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lazy").join("checks.jsonl");
    let url = format!("jsonl://{}", path.display());
    let sink = LazyRecordSink::from_url(&url, Duration::from_secs(2));

    assert!(!sink.is_connected());
    assert!(!path.exists());

    sink.store(CompatibilityRecord::new("Anna", "Anna", 100))
        .await
        .expect("store");
    assert!(sink.is_connected());
    assert!(path.exists());

    let recent = sink.recent(5).await.expect("recent");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].compatibility, 100);
}
