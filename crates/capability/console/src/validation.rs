//! 写入前的输入校验。

use crate::error::ValidationError;
use domain::{FieldValue, NetworkConfig, Point};
use regex::Regex;
use std::sync::OnceLock;

const MAC_PATTERN: &str = r"^(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$|^(?:[0-9A-Fa-f]{2}-){5}[0-9A-Fa-f]{2}$|^(?:[0-9A-Fa-f]{2}\.){5}[0-9A-Fa-f]{2}$";
const IPV4_PATTERN: &str = r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$";

static MAC_RE: OnceLock<Option<Regex>> = OnceLock::new();
static IPV4_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            // 只在首次编译时记录一次；之后该校验一律判定为不通过。
            tracing::error!(target: "hmc.console", pattern, %err, "invalid validation pattern");
            None
        }
    })
    .as_ref()
}

/// 六组十六进制，分隔符统一为 `:`、`-` 或 `.`。
pub fn is_mac(value: &str) -> bool {
    compiled(&MAC_RE, MAC_PATTERN).is_some_and(|re| re.is_match(value))
}

/// 点分十进制，每段 0-255。
pub fn is_ipv4(value: &str) -> bool {
    let Some(captures) = compiled(&IPV4_RE, IPV4_PATTERN).and_then(|re| re.captures(value))
    else {
        return false;
    };
    captures
        .iter()
        .skip(1)
        .all(|octet| octet.is_some_and(|octet| octet.as_str().parse::<u8>().is_ok()))
}

/// 整体校验网络配置，返回去除首尾空白后的值。
pub fn validate_network(network: &NetworkConfig) -> Result<NetworkConfig, ValidationError> {
    let mac = network.mac.trim();
    if !is_mac(mac) {
        return Err(ValidationError::InvalidMac(mac.to_string()));
    }
    let ipv4 = |field: &'static str, value: &str| {
        let value = value.trim();
        if is_ipv4(value) {
            Ok(value.to_string())
        } else {
            Err(ValidationError::InvalidIpv4 {
                field,
                value: value.to_string(),
            })
        }
    };
    Ok(NetworkConfig {
        mac: mac.to_string(),
        ip: ipv4("ip", &network.ip)?,
        mask: ipv4("mask", &network.mask)?,
        gateway: ipv4("gateway", &network.gateway)?,
    })
}

pub fn ensure_format_safe(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if hmc_codec::is_format_safe(value) {
        Ok(())
    } else {
        Err(ValidationError::FormatUnsafe { field })
    }
}

/// 名称：去除首尾空白后非空，且能写入标签文本。
pub fn require_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    ensure_format_safe(field, value)?;
    Ok(value.to_string())
}

pub fn ensure_field_value_safe(
    field: &'static str,
    value: Option<&FieldValue>,
) -> Result<(), ValidationError> {
    match value {
        Some(FieldValue::Text(text)) => ensure_format_safe(field, text),
        _ => Ok(()),
    }
}

/// 点位中会被写入 data.txt 的字段。
pub fn ensure_points_safe(points: &[Point]) -> Result<(), ValidationError> {
    for point in points {
        ensure_field_value_safe("status", point.status())?;
        ensure_field_value_safe("action", point.action())?;
        ensure_field_value_safe("bit", point.bit.as_ref())?;
    }
    Ok(())
}

/// `exclude_id` 为正在更新的记录自身。
pub fn ensure_unique_name<'a>(
    kind: &'static str,
    name: &str,
    existing: impl IntoIterator<Item = (&'a str, &'a str)>,
    exclude_id: Option<&str>,
) -> Result<(), ValidationError> {
    let taken = existing
        .into_iter()
        .any(|(id, other)| Some(id) != exclude_id && other.trim() == name);
    if taken {
        return Err(ValidationError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        assert!(compiled(&MAC_RE, MAC_PATTERN).is_some());
        assert!(compiled(&IPV4_RE, IPV4_PATTERN).is_some());
    }

    #[test]
    fn mac_separators() {
        assert!(is_mac("00:1A:2b:3C:4D:5E"));
        assert!(is_mac("00-1A-2B-3C-4D-5E"));
        assert!(is_mac("00.1A.2B.3C.4D.5E"));
        assert!(!is_mac("00:1A-2B:3C:4D:5E"));
        assert!(!is_mac("00:1A:2B:3C:4D"));
        assert!(!is_mac("00:1A:2B:3C:4D:5G"));
    }

    #[test]
    fn ipv4_octet_range() {
        assert!(is_ipv4("192.168.1.10"));
        assert!(is_ipv4("255.255.255.0"));
        assert!(!is_ipv4("256.1.1.1"));
        assert!(!is_ipv4("1.2.3"));
        assert!(!is_ipv4("a.b.c.d"));
    }

    #[test]
    fn unique_name_ignores_self() {
        let existing = [("d1", "pump"), ("d2", "fan")];
        assert!(ensure_unique_name("device", "pump", existing, Some("d1")).is_ok());
        assert!(ensure_unique_name("device", "pump", existing, Some("d2")).is_err());
        assert!(ensure_unique_name("device", "valve", existing, None).is_ok());
    }
}
