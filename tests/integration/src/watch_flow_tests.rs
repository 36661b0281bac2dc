//! Change-triggered uploads with a real filesystem watcher

use std::time::Duration;

use hubsync_core::{
    Direction, FileWatcher, ManifestResolver, NormalizedPath, SyncEngine, WatchLoop,
    watch::EVENT_BUFFER,
};
use hubsync_remote::HubClient;
use hubsync_test_utils::TestPackage;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Initial upload, then a save to a tracked file triggers exactly the same
/// upload path; edits to untracked files trigger nothing.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn saving_a_tracked_file_uploads_it() {
    let pkg = TestPackage::new();
    let tracked = pkg.write_app("Scenes", "v1");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/list/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 7, "name": "FLO Scenes"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/ajax/code"))
        .and(query_param("id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "FLO Scenes", "version": 1, "source": "v1",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/app/ajax/update"))
        .and(body_string_contains("source=v2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "version": 2})),
        )
        .expect(1..)
        .mount(&server)
        .await;

    let client = HubClient::new(&server.uri()).unwrap();
    let root = NormalizedPath::new(pkg.root());
    let mut manifest = ManifestResolver::new(&client, "FLO ", "groovy")
        .build_manifest(&root)
        .await
        .unwrap();

    let engine = SyncEngine::new(&client);
    let initial = engine.sync_all(&mut manifest, Direction::Upload).await;
    assert_eq!(initial.skipped(), 1);

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let watcher = FileWatcher::start(&root, tx).unwrap();

    let scratch = pkg.root().join("apps/notes.txt");
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::fs::write(&scratch, "scratch").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tokio::fs::write(&tracked, "v2").await.unwrap();
    });

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut stop_tx = Some(stop_tx);
    let shutdown = async move {
        let _ = stop_rx.await;
    };

    let outcomes = tokio::time::timeout(
        Duration::from_secs(10),
        WatchLoop::new(engine, &mut manifest).run(rx, shutdown, |outcome| {
            if outcome.is_updated() {
                if let Some(stop) = stop_tx.take() {
                    let _ = stop.send(());
                }
            }
        }),
    )
    .await
    .expect("no upload within 10s of saving");

    writer.await.unwrap();
    drop(watcher);

    assert!(outcomes.iter().any(|o| o.is_updated()));
    assert!(
        outcomes
            .iter()
            .all(|o| o.path.as_str().ends_with("apps/Scenes.groovy")),
        "only the tracked file may be synced: {:?}",
        outcomes
    );
}

/// Closing the event channel ends the loop.
#[tokio::test]
async fn loop_ends_when_watcher_goes_away() {
    let pkg = TestPackage::new();
    pkg.write_app("Scenes", "v1");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/list/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = HubClient::new(&server.uri()).unwrap();
    let root = NormalizedPath::new(pkg.root());
    let mut manifest = ManifestResolver::new(&client, "FLO ", "groovy")
        .build_manifest(&root)
        .await
        .unwrap();

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let watcher = FileWatcher::start(&root, tx).unwrap();
    watcher.stop().unwrap();

    let outcomes = tokio::time::timeout(
        Duration::from_secs(5),
        WatchLoop::new(SyncEngine::new(&client), &mut manifest).run(
            rx,
            std::future::pending(),
            |_| {},
        ),
    )
    .await
    .expect("loop did not end after the watcher stopped");

    assert!(outcomes.is_empty());
}
