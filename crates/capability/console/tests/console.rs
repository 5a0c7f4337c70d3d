use chrono::Utc;
use domain::{
    ChannelId, ChannelKind, ChannelOverride, ChannelRecord, DeviceInstance, DeviceTypeTemplate,
    FieldValue, NetworkConfig, Point, PointKey, PointKind, PointSource,
};
use hmc_auth::ChangePassword;
use hmc_config::{AppConfig, DataPaths, SyncMode};
use hmc_console::{
    ConsoleError, ConsoleService, DeviceTypeInput, DeviceUpdate, NewDevice, ValidationError,
};
use hmc_storage::{InMemoryDeviceInstanceStore, InMemoryDeviceTypeStore};
use std::sync::Arc;
use tempfile::TempDir;

fn service(dir: &TempDir) -> ConsoleService {
    ConsoleService::from_config(&AppConfig {
        paths: DataPaths::in_dir(dir.path()),
        mirror_json: true,
        sync_mode: SyncMode::Export,
    })
}

fn pump_type() -> DeviceTypeInput {
    DeviceTypeInput {
        name: "Pump".to_string(),
        code: "PUMP".to_string(),
        status: true,
        points: vec![
            Point::new("", PointKind::Di, "run"),
            Point::new("", PointKind::Do, "start"),
            Point::new("", PointKind::Ao, "speed"),
        ],
    }
}

fn new_device(name: &str, device_type_id: &str) -> NewDevice {
    NewDevice {
        name: name.to_string(),
        device_type_id: device_type_id.to_string(),
        conaddr: Some(FieldValue::Number(1.0)),
        retadd: None,
        points: None,
    }
}

fn network() -> NetworkConfig {
    NetworkConfig {
        mac: "00:1A:2B:3C:4D:5E".to_string(),
        ip: "192.168.1.10".to_string(),
        mask: "255.255.255.0".to_string(),
        gateway: "192.168.1.1".to_string(),
    }
}

async fn read(path: &std::path::Path) -> String {
    tokio::fs::read_to_string(path).await.expect("read")
}

#[tokio::test]
async fn create_device_forks_template_and_regenerates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    assert!(pump.points.iter().all(|point| !point.id.is_empty()));

    let device = console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");
    assert!(device.source.is_independent());

    let text = read(&console.paths().data_txt).await;
    assert!(text.contains("<dev>[name=pump-1;type=PUMP;DINum=1;DONum=1;AINum=1;conaddr=1;]</dev>"));
    assert!(text.contains("<DI0>[dev=pump-1;]</DI0>"));
    assert!(text.contains("<DO0>[dev=pump-1;]</DO0>"));
    assert!(text.contains("<AI0>[dev=pump-1;]</AI0>"));

    let mirror = read(&console.paths().data_json).await;
    let doc = file_contract::document_from_json(&mirror).expect("mirror");
    assert_eq!(doc.devices.len(), 1);
    assert_eq!(doc.analog_inputs.len(), 1);
}

#[tokio::test]
async fn second_device_gets_next_global_channels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("first");
    console
        .create_device(new_device("pump-2", &pump.id))
        .await
        .expect("second");

    let doc = console.load_document().await.expect("doc");
    let channels: Vec<String> = doc
        .digital_inputs
        .iter()
        .map(|record| format!("{}@{}", record.channel, record.dev))
        .collect();
    assert_eq!(channels, vec!["DI0@pump-1", "DI1@pump-2"]);
}

#[tokio::test]
async fn duplicate_names_are_rejected_before_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    let err = console
        .create_device_type(pump_type())
        .await
        .expect_err("duplicate type");
    assert!(err.is_validation());

    console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");
    let before = read(&console.paths().data_txt).await;
    let err = console
        .create_device(new_device(" pump-1 ", &pump.id))
        .await
        .expect_err("duplicate device");
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::DuplicateName { .. })
    ));
    assert_eq!(console.list_devices().await.expect("list").len(), 1);
    assert_eq!(read(&console.paths().data_txt).await, before);
}

#[tokio::test]
async fn unsafe_or_unknown_inputs_are_validation_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");

    let err = console
        .create_device(new_device("pump;1", &pump.id))
        .await
        .expect_err("unsafe name");
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::FormatUnsafe { field: "name" })
    ));

    let err = console
        .create_device(new_device("pump-1", "missing"))
        .await
        .expect_err("unknown type");
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::UnknownDeviceType(_))
    ));
    assert!(!console.paths().data_txt.exists());
}

#[tokio::test]
async fn network_is_validated_and_preserved_on_regenerate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);

    let mut bad = network();
    bad.gateway = "192.168.1.256".to_string();
    let err = console.save_network(bad).await.expect_err("bad gateway");
    assert!(err.is_validation());
    assert!(!console.paths().data_txt.exists());

    console.save_network(network()).await.expect("save");
    let pump = console.create_device_type(pump_type()).await.expect("type");
    console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");

    let doc = console.load_document().await.expect("doc");
    assert_eq!(doc.network, Some(network()));
    assert_eq!(doc.devices.len(), 1);
}

#[tokio::test]
async fn change_password_updates_user_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    tokio::fs::write(
        &console.paths().data_txt,
        "<u>[username=admin;password=0123;]</u>\n",
    )
    .await
    .expect("seed");

    assert!(console.verify_login("admin", "0123").await.expect("login"));
    console
        .change_password(ChangePassword {
            username: "admin".to_string(),
            old_password: "0123".to_string(),
            new_password: "4567".to_string(),
        })
        .await
        .expect("change");
    assert!(!console.verify_login("admin", "0123").await.expect("login"));
    assert!(console.verify_login("admin", "4567").await.expect("login"));
    assert!(
        read(&console.paths().data_txt)
            .await
            .starts_with("<u>[username=admin;password=4567;]</u>")
    );

    let err = console
        .change_password(ChangePassword {
            username: "admin".to_string(),
            old_password: "wrong".to_string(),
            new_password: "8910".to_string(),
        })
        .await
        .expect_err("wrong password");
    assert!(matches!(err, ConsoleError::Auth(_)));
}

fn di(index: u32, dev: &str) -> ChannelRecord {
    ChannelRecord {
        channel: ChannelId::new(ChannelKind::Di, index),
        dev: dev.to_string(),
        value: Some(FieldValue::Number(0.0)),
        bit: None,
    }
}

#[tokio::test]
async fn digital_input_maintenance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);

    console.add_digital_input(di(0, "pump-1")).await.expect("add");
    console.add_digital_input(di(1, "pump-1")).await.expect("add");
    let err = console
        .add_digital_input(di(1, "pump-2"))
        .await
        .expect_err("duplicate");
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::DuplicateChannel(_))
    ));

    let wrong_kind = ChannelRecord {
        channel: ChannelId::new(ChannelKind::Do, 0),
        ..di(0, "pump-1")
    };
    assert!(
        console
            .add_digital_input(wrong_kind)
            .await
            .expect_err("not DI")
            .is_validation()
    );

    console
        .update_digital_input(ChannelId::new(ChannelKind::Di, 1), di(5, "pump-9"))
        .await
        .expect("update");
    console
        .delete_digital_input(ChannelId::new(ChannelKind::Di, 0))
        .await
        .expect("delete");
    let err = console
        .delete_digital_input(ChannelId::new(ChannelKind::Di, 0))
        .await
        .expect_err("gone");
    assert!(matches!(err, ConsoleError::NotFound { .. }));

    let inputs = console.list_digital_inputs().await.expect("list");
    assert_eq!(inputs, vec![di(5, "pump-9")]);
    assert!(read(&console.paths().data_json).await.contains("\"DI5\""));
}

#[tokio::test]
async fn reimport_template_adds_only_missing_points() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    let device = console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");

    assert_eq!(console.reimport_template(&device.id).await.expect("noop"), 0);

    let mut extended = pump_type();
    extended.points.push(Point::new("", PointKind::Di, "fault"));
    console
        .update_device_type(&pump.id, extended)
        .await
        .expect("update type");
    assert_eq!(console.reimport_template(&device.id).await.expect("import"), 1);
    assert_eq!(console.reimport_template(&device.id).await.expect("again"), 0);

    let doc = console.load_document().await.expect("doc");
    assert_eq!(doc.devices[0].di_num, 2);
}

#[tokio::test]
async fn update_and_delete_device() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    let device = console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");

    let updated = console
        .update_device(
            &device.id,
            DeviceUpdate {
                name: Some("pump-east".to_string()),
                retadd: Some(FieldValue::Number(9.0)),
                points: Some(vec![Point::new("", PointKind::Do, "stop")]),
                ..DeviceUpdate::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.name, "pump-east");
    assert!(updated.updated_at >= device.updated_at);

    let doc = console.load_document().await.expect("doc");
    assert_eq!(doc.devices[0].name, "pump-east");
    assert_eq!(doc.devices[0].do_num, 1);
    assert_eq!(doc.devices[0].di_num, 0);
    assert!(doc.digital_inputs.is_empty());

    console.delete_device(&device.id).await.expect("delete");
    assert!(console.load_document().await.expect("doc").devices.is_empty());
    let err = console.delete_device(&device.id).await.expect_err("gone");
    assert!(matches!(err, ConsoleError::NotFound { .. }));
}

#[tokio::test]
async fn deleted_type_skips_its_devices() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");
    console.delete_device_type(&pump.id).await.expect("delete");

    let report = console.regenerate().await.expect("regenerate");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].device_name, "pump-1");
    assert!(report.document.devices.is_empty());
}

#[tokio::test]
async fn import_writes_mirror_from_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    tokio::fs::write(
        &console.paths().data_txt,
        "<u>[username=admin;password=007;]</u>\n<DI2>[dev=fan;sta=1;]</DI2>\n<DI3>[dev=fan;sta]</DI3>\n",
    )
    .await
    .expect("seed");

    let report = console.import_text_to_mirror().await.expect("import");
    assert_eq!(report.skipped_count(), 1);
    let mirror = read(&console.paths().data_json).await;
    let doc = file_contract::document_from_json(&mirror).expect("mirror");
    assert_eq!(doc.user.expect("user").password, "007");
    assert_eq!(doc.digital_inputs.len(), 1);
}

#[tokio::test]
async fn import_without_text_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = service(&dir)
        .import_text_to_mirror()
        .await
        .expect_err("missing");
    assert!(matches!(err, ConsoleError::Codec(_)));
}

#[tokio::test]
async fn reimport_keeps_channel_edited_on_device() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let pump = console.create_device_type(pump_type()).await.expect("type");
    let device = console
        .create_device(new_device("pump-1", &pump.id))
        .await
        .expect("device");

    let mut points = pump_type().points;
    points[0].channel = Some("DI7".to_string());
    console
        .update_device(
            &device.id,
            DeviceUpdate {
                points: Some(points),
                ..DeviceUpdate::default()
            },
        )
        .await
        .expect("edit channel");

    let mut extended = pump_type();
    extended.points.push(Point::new("", PointKind::Di, "fault"));
    console
        .update_device_type(&pump.id, extended)
        .await
        .expect("update type");
    assert_eq!(console.reimport_template(&device.id).await.expect("import"), 1);

    let stored = console.get_device(&device.id).await.expect("device");
    let PointSource::Independent { points } = &stored.source else {
        panic!("device should hold its own points");
    };
    let run = points.iter().find(|point| point.code == "run").expect("run");
    assert_eq!(run.channel.as_deref(), Some("DI7"));
    assert!(points.iter().any(|point| point.code == "fault"));
    assert!(read(&console.paths().data_txt).await.contains("<DI7>[dev=pump-1;]</DI7>"));
}

#[tokio::test]
async fn reimport_carries_overlay_channel_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let template = DeviceTypeTemplate {
        id: "t-pump".to_string(),
        name: "Pump".to_string(),
        code: "PUMP".to_string(),
        status: true,
        points: vec![
            Point::new("p-run", PointKind::Di, "run"),
            Point::new("p-fault", PointKind::Di, "fault"),
        ],
    };
    let now = Utc::now();
    let device = DeviceInstance {
        id: "d-1".to_string(),
        name: "pump-legacy".to_string(),
        device_type_id: template.id.clone(),
        conaddr: None,
        retadd: None,
        source: PointSource::Overlay {
            custom_points: Vec::new(),
            channel_overrides: vec![ChannelOverride {
                key: PointKey::new(PointKind::Di, "run", ""),
                channel: "DI5".to_string(),
            }],
            persisted_points: Vec::new(),
        },
        created_at: now,
        updated_at: now,
    };
    let console = ConsoleService::new(
        Arc::new(InMemoryDeviceTypeStore::with_templates(vec![template])),
        Arc::new(InMemoryDeviceInstanceStore::with_devices(vec![device])),
        DataPaths::in_dir(dir.path()),
        false,
    );

    assert_eq!(console.reimport_template("d-1").await.expect("import"), 0);

    let stored = console.get_device("d-1").await.expect("device");
    let PointSource::Independent { points } = &stored.source else {
        panic!("overlay device should become independent");
    };
    let run = points.iter().find(|point| point.code == "run").expect("run");
    assert_eq!(run.channel.as_deref(), Some("DI5"));
    assert_eq!(points.len(), 2);

    let text = read(&console.paths().data_txt).await;
    assert!(text.contains("<DI5>[dev=pump-legacy;]</DI5>"));
    assert!(text.contains("<DI0>[dev=pump-legacy;]</DI0>"));
}

#[tokio::test]
async fn edits_refuse_to_rewrite_file_with_unparsed_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    let seed = "<u>[username=admin;pwd=1;]</u>\n<DI0>[dev=a;sta=1;]</DI0>\n<DI1>[dev=b;sta=x;;bad]</DI1>\n";
    tokio::fs::write(&console.paths().data_txt, seed)
        .await
        .expect("seed");

    let err = console.save_network(network()).await.expect_err("refused");
    let ConsoleError::UnparsedLines { skipped, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].line_no, 1);
    assert_eq!(skipped[1].line_no, 3);

    let err = console
        .add_digital_input(di(2, "c"))
        .await
        .expect_err("refused");
    assert!(matches!(err, ConsoleError::UnparsedLines { .. }));
    assert!(matches!(
        console.regenerate().await.expect_err("refused"),
        ConsoleError::UnparsedLines { .. }
    ));

    assert_eq!(read(&console.paths().data_txt).await, seed);
    assert!(!console.paths().data_json.exists());
    assert_eq!(console.list_digital_inputs().await.expect("list").len(), 1);
}

#[tokio::test]
async fn unreadable_data_file_is_not_treated_as_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let console = service(&dir);
    tokio::fs::create_dir(&console.paths().data_txt)
        .await
        .expect("dir in place of file");

    let err = console.save_network(network()).await.expect_err("unreadable");
    assert!(matches!(err, ConsoleError::Codec(_)));
    assert!(console.paths().data_txt.is_dir());
}
