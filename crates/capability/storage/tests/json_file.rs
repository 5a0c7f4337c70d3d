use chrono::{DateTime, Utc};
use domain::{DeviceInstance, DeviceTypeTemplate, FieldValue, Point, PointKind, PointSource};
use hmc_storage::{
    DeviceInstanceStore, DeviceTypeStore, JsonDeviceInstanceStore, JsonDeviceTypeStore,
    StorageError,
};
use serde_json::Value;

fn timestamp() -> DateTime<Utc> {
    "2024-05-01T08:00:00Z".parse().expect("timestamp")
}

fn template(id: &str, name: &str) -> DeviceTypeTemplate {
    DeviceTypeTemplate {
        id: id.to_string(),
        name: name.to_string(),
        code: name.to_uppercase(),
        status: true,
        points: vec![Point::new("p1", PointKind::Di, "run")],
    }
}

fn device(id: &str, name: &str) -> DeviceInstance {
    DeviceInstance {
        id: id.to_string(),
        name: name.to_string(),
        device_type_id: "t1".to_string(),
        conaddr: Some(FieldValue::from("1")),
        retadd: Some(FieldValue::Number(4.0)),
        source: PointSource::independent(vec![Point::new("p1", PointKind::Do, "stop")]),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

#[tokio::test]
async fn missing_file_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonDeviceTypeStore::new(dir.path().join("device-types.json"));
    assert!(store.list_device_types().await.expect("list").is_empty());
    assert!(store.find_device_type("t1").await.expect("find").is_none());
    assert!(!store.delete_device_type("t1").await.expect("delete"));
}

#[tokio::test]
async fn device_type_crud_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("device-types.json");
    let store = JsonDeviceTypeStore::new(&path);

    store
        .create_device_type(template("t1", "pump"))
        .await
        .expect("create");
    store
        .create_device_type(template("t2", "fan"))
        .await
        .expect("create");
    let err = store
        .create_device_type(template("t1", "again"))
        .await
        .expect_err("duplicate id");
    assert!(matches!(err, StorageError::Conflict(_)));

    let mut changed = template("t1", "pump");
    changed.status = false;
    let updated = store
        .update_device_type(changed.clone())
        .await
        .expect("update");
    assert_eq!(updated, Some(changed.clone()));
    assert!(
        store
            .update_device_type(template("t9", "ghost"))
            .await
            .expect("update")
            .is_none()
    );

    let reopened = JsonDeviceTypeStore::new(&path);
    let items = reopened.list_device_types().await.expect("list");
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
    assert_eq!(items[0], changed);

    assert!(reopened.delete_device_type("t1").await.expect("delete"));
    assert_eq!(reopened.list_device_types().await.expect("list").len(), 1);
}

#[tokio::test]
async fn written_file_has_envelope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("devices.json");
    let store = JsonDeviceInstanceStore::new(&path);
    store.create_device(device("d1", "pump-1")).await.expect("create");

    let raw = tokio::fs::read_to_string(&path).await.expect("read");
    let value: Value = serde_json::from_str(&raw).expect("json");
    assert!(value["lastUpdated"].is_string());
    assert_eq!(value["devices"][0]["deviceTypeId"], "t1");
    assert_eq!(value["devices"][0]["independentPoints"][0]["type"], "DO");
    assert_eq!(value["devices"][0]["createdAt"], "2024-05-01T08:00:00Z");
}

#[tokio::test]
async fn device_round_trips_through_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonDeviceInstanceStore::new(dir.path().join("devices.json"));
    let original = device("d1", "pump-1");
    store.create_device(original.clone()).await.expect("create");
    let loaded = store
        .find_device("d1")
        .await
        .expect("find")
        .expect("device");
    assert_eq!(loaded, original);
}

#[tokio::test]
async fn legacy_overlay_file_is_readable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("devices.json");
    let raw = r#"{
        "devices": [{
            "id": "d1",
            "name": "old",
            "deviceTypeId": "t1",
            "customPoints": [{"type": "DI", "code": "extra"}],
            "channelOverrides": {"DI::run": "DI5"}
        }]
    }"#;
    tokio::fs::write(&path, raw).await.expect("seed");
    let store = JsonDeviceInstanceStore::new(&path);
    let devices = store.list_devices().await.expect("list");
    assert!(!devices[0].source.is_independent());
}

#[tokio::test]
async fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("devices.json");
    tokio::fs::write(&path, "{not json").await.expect("seed");
    let err = JsonDeviceInstanceStore::new(&path)
        .list_devices()
        .await
        .expect_err("corrupt");
    assert!(matches!(err, StorageError::Json { .. }));
}
