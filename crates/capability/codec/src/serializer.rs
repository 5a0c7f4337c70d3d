//! 扁平化文档 → 标签文本。
//!
//! 输出顺序固定：user、network、devices、digitalInputs、digitalOutputs、analogInputs。
//! 缺省的可选块不输出；全部设备写在同一个 `<dev>...</dev>` 中。

use domain::{ChannelKind, ChannelRecord, DataJsonDocument, DeviceSummary, FieldValue};
use std::fmt::Write;

/// 文本格式的保留字符，出现在值中会破坏行结构。
pub const RESERVED_CHARS: [char; 8] = [';', '=', '[', ']', '<', '>', '\n', '\r'];

/// 值能否原样写入标签文本。
pub fn is_format_safe(value: &str) -> bool {
    !value.contains(RESERVED_CHARS)
}

pub fn serialize(doc: &DataJsonDocument) -> String {
    let mut out = String::new();
    if let Some(user) = &doc.user {
        let _ = writeln!(
            out,
            "<u>{}</u>",
            bracket(&[
                ("username", Some(user.username.clone())),
                ("password", Some(user.password.clone())),
            ])
        );
    }
    if let Some(network) = &doc.network {
        let _ = writeln!(
            out,
            "<net>{}</net>",
            bracket(&[
                ("mac", Some(network.mac.clone())),
                ("ip", Some(network.ip.clone())),
                ("mask", Some(network.mask.clone())),
                ("gw", Some(network.gateway.clone())),
            ])
        );
    }
    if !doc.devices.is_empty() {
        out.push_str("<dev>");
        for device in &doc.devices {
            out.push_str(&device_bracket(device));
        }
        out.push_str("</dev>\n");
    }
    for kind in ChannelKind::ALL {
        for record in doc.channels(kind) {
            out.push_str(&channel_line(record));
            out.push('\n');
        }
    }
    out
}

fn device_bracket(device: &DeviceSummary) -> String {
    bracket(&[
        ("name", Some(device.name.clone())),
        ("type", Some(device.device_type.clone())),
        ("DINum", Some(device.di_num.to_string())),
        ("DONum", Some(device.do_num.to_string())),
        ("AINum", Some(device.ai_num.to_string())),
        ("conaddr", device.conaddr.as_ref().map(FieldValue::to_string)),
        ("retadd", device.retadd.as_ref().map(FieldValue::to_string)),
    ])
}

/// 单条通道记录行，标签名即通道标识，如 `<DI3>[dev=pump;sta=1;]</DI3>`。
pub fn channel_line(record: &ChannelRecord) -> String {
    let tag = record.channel.to_string();
    let body = bracket(&[
        ("dev", Some(record.dev.clone())),
        (
            record.kind().value_key(),
            record.value.as_ref().map(FieldValue::to_string),
        ),
        ("bit", record.bit.as_ref().map(FieldValue::to_string)),
    ]);
    format!("<{tag}>{body}</{tag}>")
}

/// `[k=v;k=v;]`，值为 `None` 的字段省略。
fn bracket(fields: &[(&str, Option<String>)]) -> String {
    let mut out = String::from("[");
    for (key, value) in fields {
        if let Some(value) = value {
            let _ = write!(out, "{key}={value};");
        }
    }
    out.push(']');
    out
}
