//! End-to-end sync runs: real HTTP client, resolver and engine against a
//! mocked hub.
//!
//! Each test builds a package on disk, mounts the hub endpoints it needs,
//! resolves the manifest through the listings and runs a bulk sync.

use hubsync_core::{
    Direction, FailureKind, Manifest, ManifestResolver, NormalizedPath, OutcomeStatus,
    ResourceId, ResourceKind, SkipReason, SyncEngine,
};
use hubsync_remote::HubClient;
use hubsync_test_utils::TestPackage;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn mount_listing(server: &MockServer, kind: &str, entries: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{kind}/list/data")))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_info(server: &MockServer, kind: &str, id: u64, name: &str, version: u64, source: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{kind}/ajax/code")))
        .and(query_param("id", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": name,
            "version": version,
            "source": source,
            "status": "active",
        })))
        .mount(server)
        .await;
}

async fn manifest_for(client: &HubClient, pkg: &TestPackage) -> Manifest {
    ManifestResolver::new(client, "FLO ", "groovy")
        .build_manifest(&NormalizedPath::new(pkg.root()))
        .await
        .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

/// A file the hub has never seen is created and its new id recorded.
#[tokio::test]
async fn scenario_create_on_upload() {
    let pkg = TestPackage::new();
    pkg.write_app("Scenes", "X");
    let server = MockServer::start().await;
    mount_listing(&server, "app", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/app/save"))
        .and(body_string_contains("source=X"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/app/editor/100"))
        .expect(1)
        .mount(&server)
        .await;
    mount_info(&server, "app", 100, "FLO Scenes", 1, "X").await;

    let client = HubClient::new(&server.uri()).unwrap();
    let mut manifest = manifest_for(&client, &pkg).await;
    assert_eq!(manifest.records().next().unwrap().remote_id, None);

    let report = SyncEngine::new(&client)
        .sync_all(&mut manifest, Direction::Upload)
        .await;

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::Updated);
    assert!(outcome.created);
    assert_eq!(outcome.name.as_deref(), Some("FLO Scenes"));
    assert_eq!(outcome.version, Some(1));
    assert_eq!(
        manifest.records().next().unwrap().remote_id,
        Some(ResourceId::from("100"))
    );
}

/// Identical content on both sides means no write request at all.
#[tokio::test]
async fn scenario_identical_driver_is_skipped() {
    let pkg = TestPackage::new();
    pkg.write_driver("Sensor", "X");
    let server = MockServer::start().await;
    mount_listing(&server, "driver", json!([{"id": 42, "name": "FLO Sensor"}])).await;
    mount_info(&server, "driver", 42, "FLO Sensor", 5, "X").await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = HubClient::new(&server.uri()).unwrap();
    let mut manifest = manifest_for(&client, &pkg).await;
    let report = SyncEngine::new(&client)
        .sync_all(&mut manifest, Direction::Upload)
        .await;

    assert_eq!(
        report.outcomes[0].status,
        OutcomeStatus::Skipped {
            reason: SkipReason::Unchanged
        }
    );
    assert_eq!(report.outcomes[0].kind, ResourceKind::Driver);
}

/// A hub-side rejection fails one record and the run moves on.
#[tokio::test]
async fn scenario_rejection_does_not_stop_the_run() {
    let pkg = TestPackage::new();
    pkg.write_app("Alpha", "alpha(");
    pkg.write_app("Beta", "beta()");
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "app",
        json!([{"id": 1, "name": "FLO Alpha"}, {"id": 2, "name": "FLO Beta"}]),
    )
    .await;
    mount_info(&server, "app", 1, "FLO Alpha", 3, "alpha()").await;
    mount_info(&server, "app", 2, "FLO Beta", 8, "beta_old()").await;
    Mock::given(method("POST"))
        .and(path("/app/ajax/update"))
        .and(body_string_contains("id=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "errorMessage": "syntax error",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/app/ajax/update"))
        .and(body_string_contains("id=2"))
        .and(body_string_contains("version=8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "version": 9})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HubClient::new(&server.uri()).unwrap();
    let mut manifest = manifest_for(&client, &pkg).await;
    let report = SyncEngine::new(&client)
        .sync_all(&mut manifest, Direction::Upload)
        .await;

    assert_eq!(report.outcomes.len(), 2);
    match &report.outcomes[0].status {
        OutcomeStatus::Failed { failure, message } => {
            assert_eq!(*failure, FailureKind::RemoteReportedError);
            assert!(message.contains("syntax error"));
        }
        other => panic!("expected Alpha to fail, got {:?}", other),
    }
    assert!(report.outcomes[1].is_updated());
    assert_eq!(report.outcomes[1].previous_version, Some(8));
    assert_eq!(report.outcomes[1].version, Some(9));
}

/// Retrieve rewrites stale files and leaves files the hub lacks alone.
#[tokio::test]
async fn retrieve_pulls_hub_sources() {
    let pkg = TestPackage::new();
    pkg.write_app("Scenes", "stale");
    pkg.write_app("Draft", "local draft");
    pkg.write_driver("Dimmer", "same");
    let server = MockServer::start().await;
    mount_listing(&server, "app", json!([{"id": 10, "name": "FLO Scenes"}])).await;
    mount_listing(&server, "driver", json!([{"id": "20", "name": "FLO Dimmer"}])).await;
    mount_info(&server, "app", 10, "FLO Scenes", 4, "fresh").await;
    mount_info(&server, "driver", 20, "FLO Dimmer", 2, "same").await;

    let client = HubClient::new(&server.uri()).unwrap();
    let mut manifest = manifest_for(&client, &pkg).await;
    let report = SyncEngine::new(&client)
        .sync_all(&mut manifest, Direction::Retrieve)
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.updated(), 1);
    assert_eq!(report.skipped(), 2);
    assert!(report.success());
    assert_eq!(pkg.read_app("Scenes"), "fresh");
    assert_eq!(pkg.read_app("Draft"), "local draft");
    assert_eq!(pkg.read_driver("Dimmer"), "same");
}

/// A hub that goes away mid-run fails each remaining record individually.
#[tokio::test]
async fn unavailable_hub_fails_records_not_the_run() {
    let pkg = TestPackage::new();
    pkg.write_app("Alpha", "a");
    pkg.write_app("Beta", "b");
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "app",
        json!([{"id": 1, "name": "FLO Alpha"}, {"id": 2, "name": "FLO Beta"}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/app/ajax/code"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HubClient::new(&server.uri()).unwrap();
    let mut manifest = manifest_for(&client, &pkg).await;
    let report = SyncEngine::new(&client)
        .sync_all(&mut manifest, Direction::Upload)
        .await;

    assert_eq!(report.failed(), 2);
    for outcome in &report.outcomes {
        match &outcome.status {
            OutcomeStatus::Failed { failure, .. } => {
                assert_eq!(*failure, FailureKind::RemoteUnavailable)
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

/// The serialized report carries everything needed to identify a failure.
#[tokio::test]
async fn report_serializes_for_scripting() {
    let pkg = TestPackage::new();
    pkg.write_app("Alpha", "alpha(");
    let server = MockServer::start().await;
    mount_listing(&server, "app", json!([{"id": 1, "name": "FLO Alpha"}])).await;
    mount_info(&server, "app", 1, "FLO Alpha", 3, "alpha()").await;
    Mock::given(method("POST"))
        .and(path("/app/ajax/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "errorMessage": "syntax error",
        })))
        .mount(&server)
        .await;

    let client = HubClient::new(&server.uri()).unwrap();
    let mut manifest = manifest_for(&client, &pkg).await;
    let report = SyncEngine::new(&client)
        .sync_all(&mut manifest, Direction::Upload)
        .await;

    let value = serde_json::to_value(&report).unwrap();
    let outcome = &value["outcomes"][0];
    assert_eq!(value["direction"], "upload");
    assert_eq!(outcome["status"], "failed");
    assert_eq!(outcome["failure"], "remote_reported_error");
    assert_eq!(outcome["message"], "syntax error");
    assert_eq!(outcome["kind"], "app");
    assert_eq!(outcome["remote_id"], "1");
    assert_eq!(outcome["previous_version"], 3);
    assert!(outcome["path"].as_str().unwrap().ends_with("apps/Alpha.groovy"));
}
