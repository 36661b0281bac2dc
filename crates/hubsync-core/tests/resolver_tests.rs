//! Manifest resolution from a package tree

use hubsync_core::{Error, ManifestResolver, NormalizedPath, ResourceId, ResourceKind};
use hubsync_test_utils::{FakeFailure, FakeRemote, TestPackage};
use pretty_assertions::assert_eq;

fn root(pkg: &TestPackage) -> NormalizedPath {
    NormalizedPath::new(pkg.root())
}

#[tokio::test]
async fn resolves_ids_by_normalized_name() {
    let pkg = TestPackage::new();
    pkg.write_app("MotionLighting", "app");
    pkg.write_driver("ZoneSensor", "driver");
    pkg.write_driver("Unpublished", "driver");
    let remote = FakeRemote::new();
    remote.insert(ResourceKind::App, "11", "FLO Motion Lighting", "app");
    remote.insert(ResourceKind::Driver, "22", "FLO Zone Sensor", "driver");

    let mut resolver = ManifestResolver::new(&remote, "FLO ", "groovy");
    let manifest = resolver.build_manifest(&root(&pkg)).await.unwrap();

    let apps = manifest.records_of(ResourceKind::App);
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].relative_path.as_str(), "apps/MotionLighting.groovy");
    assert_eq!(apps[0].remote_id, Some(ResourceId::from("11")));

    let drivers = manifest.records_of(ResourceKind::Driver);
    let ids: Vec<_> = drivers
        .iter()
        .map(|r| (r.relative_path.file_stem().unwrap(), r.remote_id.clone()))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("Unpublished", None),
            ("ZoneSensor", Some(ResourceId::from("22"))),
        ]
    );
}

#[tokio::test]
async fn listing_is_fetched_once_per_kind() {
    let pkg = TestPackage::new();
    for name in ["A", "B", "C"] {
        pkg.write_app(name, name);
    }
    pkg.write_driver("D", "D");
    let remote = FakeRemote::new();

    let mut resolver = ManifestResolver::new(&remote, "FLO ", "groovy");
    let manifest = resolver.build_manifest(&root(&pkg)).await.unwrap();

    assert_eq!(manifest.len(), 4);
    assert_eq!(remote.list_calls(ResourceKind::App), 1);
    assert_eq!(remote.list_calls(ResourceKind::Driver), 1);
}

#[tokio::test]
async fn ignores_other_extensions_and_hidden_directories() {
    let pkg = TestPackage::new();
    pkg.write_app("Real", "x");
    pkg.write("apps/notes.txt", "not tracked");
    pkg.write(".git/objects/abc", "hidden");
    let remote = FakeRemote::new();

    let mut resolver = ManifestResolver::new(&remote, "FLO ", "groovy");
    let manifest = resolver.build_manifest(&root(&pkg)).await.unwrap();

    assert_eq!(manifest.len(), 1);
    assert_eq!(
        manifest.records().next().unwrap().relative_path.as_str(),
        "apps/Real.groovy"
    );
}

#[tokio::test]
async fn unknown_bucket_is_a_configuration_error() {
    let pkg = TestPackage::new();
    pkg.write("libraries/Helper.groovy", "lib");
    let remote = FakeRemote::new();

    let mut resolver = ManifestResolver::new(&remote, "FLO ", "groovy");
    let err = resolver.build_manifest(&root(&pkg)).await.unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "got {:?}", err);
    assert!(err.to_string().contains("libraries"));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn listing_failure_aborts_resolution() {
    let pkg = TestPackage::new();
    pkg.write_app("A", "a");
    let remote = FakeRemote::new();
    remote.fail_all(Some(FakeFailure::Unavailable));

    let mut resolver = ManifestResolver::new(&remote, "FLO ", "groovy");
    let err = resolver.build_manifest(&root(&pkg)).await.unwrap_err();

    assert!(
        matches!(err, Error::RemoteUnavailable { .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn nested_buckets_are_found() {
    let pkg = TestPackage::bare();
    pkg.write("lighting/apps/Scenes.groovy", "s");
    pkg.write("lighting/drivers/Dimmer.groovy", "d");
    let remote = FakeRemote::new();

    let mut resolver = ManifestResolver::new(&remote, "FLO ", "groovy");
    let manifest = resolver.build_manifest(&root(&pkg)).await.unwrap();

    assert_eq!(manifest.records_of(ResourceKind::App).len(), 1);
    assert_eq!(manifest.records_of(ResourceKind::Driver).len(), 1);
    assert_eq!(
        manifest.records_of(ResourceKind::App)[0].relative_path.as_str(),
        "lighting/apps/Scenes.groovy"
    );
}
