//! 各测试文件共用的构造函数。
#![allow(dead_code)]

use chrono::Utc;
use domain::{DeviceInstance, DeviceTypeTemplate, FieldValue, Point, PointKind, PointSource};

pub fn point(kind: PointKind, code: &str) -> Point {
    Point::new(format!("tpl-{code}"), kind, code)
}

pub fn point_on(kind: PointKind, code: &str, channel: &str) -> Point {
    let mut point = point(kind, code);
    point.channel = Some(channel.to_string());
    point
}

pub fn template(id: &str, code: &str, points: Vec<Point>) -> DeviceTypeTemplate {
    DeviceTypeTemplate {
        id: id.to_string(),
        name: format!("{code} type"),
        code: code.to_string(),
        status: true,
        points,
    }
}

pub fn instance(id: &str, name: &str, device_type_id: &str, source: PointSource) -> DeviceInstance {
    let now = Utc::now();
    DeviceInstance {
        id: id.to_string(),
        name: name.to_string(),
        device_type_id: device_type_id.to_string(),
        conaddr: Some(FieldValue::from("1")),
        retadd: None,
        source,
        created_at: now,
        updated_at: now,
    }
}

pub fn overlay() -> PointSource {
    PointSource::Overlay {
        custom_points: Vec::new(),
        channel_overrides: Vec::new(),
        persisted_points: Vec::new(),
    }
}
