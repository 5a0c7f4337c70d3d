//! 松散类型字段值与数字安全转换。

use std::fmt;

/// 文本格式与 JSON 中可能为数字也可能为字符串的字段值（status/action/bit/conaddr 等）。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// 按通用规则转换：去除首尾空格后能完整解析为数字则存为数字，否则保留字符串。
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        match parse_number(trimmed) {
            Some(number) => Self::Number(number),
            None => Self::Text(trimmed.to_string()),
        }
    }

    /// 不做数字转换，仅去除首尾空格。
    pub fn text(raw: &str) -> Self {
        Self::Text(raw.trim().to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => f.write_str(&format_number(*number)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// 完整解析数字；空串与非有限值（inf/NaN）不视为数字。
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// 数字的默认字符串形式：整数不带小数点，负零输出为 0。
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// 数字安全转换：纯数字字符串转为数字，其余（含空串）原样保留。
///
/// 对同一值重复调用结果不变。
pub fn safe_number_conversion(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) => match parse_number(text) {
            Some(number) => FieldValue::Number(number),
            None => value.clone(),
        },
        FieldValue::Number(_) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_and_blank() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
    }

    #[test]
    fn formats_integers_without_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
    }
}
