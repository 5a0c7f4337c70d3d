use domain::{
    ChannelId, ChannelKind, FieldValue, Point, PointCounts, PointKind, normalize_channel,
    safe_number_conversion,
};

#[test]
fn placeholder_channels_normalize_to_none() {
    assert_eq!(normalize_channel("请选择"), None);
    assert_eq!(normalize_channel(""), None);
    assert_eq!(normalize_channel("   "), None);
    assert_eq!(normalize_channel("DI4"), Some("DI4".to_string()));
}

#[test]
fn safe_number_conversion_is_idempotent() {
    let samples = vec![
        FieldValue::from("3"),
        FieldValue::from(" 4.5 "),
        FieldValue::from("idle"),
        FieldValue::from(""),
        FieldValue::Number(7.0),
    ];
    for sample in samples {
        let once = safe_number_conversion(&sample);
        let twice = safe_number_conversion(&once);
        assert_eq!(once, twice);
    }
    assert_eq!(safe_number_conversion(&FieldValue::from("3")), FieldValue::Number(3.0));
    assert_eq!(safe_number_conversion(&FieldValue::from("")), FieldValue::from(""));
}

#[test]
fn point_key_falls_back_to_status_code() {
    let mut point = Point::new("p-1", PointKind::Do, "");
    point.status_code = "run".to_string();
    assert_eq!(point.key().as_str(), "DO::run");

    point.code = "start".to_string();
    assert_eq!(point.key().as_str(), "DO::start");
}

#[test]
fn channel_id_parses_and_displays() {
    let id: ChannelId = "DI12".parse().expect("parse");
    assert_eq!(id, ChannelId::new(ChannelKind::Di, 12));
    assert_eq!(id.to_string(), "DI12");
    assert!("AO1".parse::<ChannelId>().is_err());
    assert!("DI".parse::<ChannelId>().is_err());
    assert!("请选择".parse::<ChannelId>().is_err());
}

#[test]
fn ao_points_use_ai_channels() {
    let mut point = Point::new("p-1", PointKind::Ao, "speed");
    point.channel = Some("AI2".to_string());
    assert_eq!(point.usable_channel(), Some(ChannelId::new(ChannelKind::Ai, 2)));

    point.channel = Some("DO2".to_string());
    assert_eq!(point.usable_channel(), None);
}

#[test]
fn counts_fold_ao_into_ai() {
    let points = vec![
        Point::new("1", PointKind::Di, "a"),
        Point::new("2", PointKind::Di, "b"),
        Point::new("3", PointKind::Ai, "c"),
        Point::new("4", PointKind::Ao, "d"),
    ];
    let counts = PointCounts::from_points(&points);
    assert_eq!(counts.digital_in, 2);
    assert_eq!(counts.digital_out, 0);
    assert_eq!(counts.flattened_analog_in(), 2);
}
