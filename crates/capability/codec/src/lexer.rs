//! 行分类与方括号内容切分。
//!
//! 第一阶段只做词法：把一行文本分类为某种标签记录，并把 `[k=v;...]` 切成字段，
//! 不涉及字段语义。字段的类型转换在 [`Field::value`] 中按键名决定。

use crate::error::LineError;
use domain::{ChannelId, FieldValue};

/// 永不做数字转换的键（避免丢失前导零或破坏凭据比较）。
const CREDENTIAL_KEYS: [&str; 3] = ["username", "password", "pass"];

const DEVICE_OPEN: &str = "<dev>";
const DEVICE_CLOSE: &str = "</dev>";

/// 方括号中的一个 `key=value` 字段，保留去空格后的原始值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub raw: String,
}

impl Field {
    /// 按键名应用转换规则：凭据键保留字符串，其余纯数字转为数字。
    pub fn value(&self) -> FieldValue {
        if is_credential_key(&self.key) {
            FieldValue::text(&self.raw)
        } else {
            FieldValue::coerce(&self.raw)
        }
    }
}

pub fn is_credential_key(key: &str) -> bool {
    CREDENTIAL_KEYS.contains(&key)
}

/// 一组方括号内的字段，保持出现顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    /// 同名键以最后一次出现为准。
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().rev().find(|field| field.key == key)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|field| field.raw.clone())
    }

    pub fn value(&self, key: &str) -> Option<FieldValue> {
        self.get(key).map(Field::value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }
}

/// 分类后的单行。
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    User(Record),
    Network(Record),
    /// 以 `<dev>` 开头的行；`closed` 表示同一行内出现了 `</dev>`。
    Devices { records: Vec<Record>, closed: bool },
    /// 以 `[` 开头的裸记录行，只在设备段内有效；`closes` 表示行尾带 `</dev>`。
    Bare { records: Vec<Record>, closes: bool },
    /// 独立的 `</dev>`。
    DeviceSectionEnd,
    Channel { channel: ChannelId, record: Record },
}

impl Line {
    /// 是否属于设备段（段内遇到其他标签视为段未闭合）。
    pub fn is_device_line(&self) -> bool {
        matches!(
            self,
            Line::Devices { .. } | Line::Bare { .. } | Line::DeviceSectionEnd
        )
    }
}

/// 对一行（已去除首尾空白、非空）做分类与切分。
pub fn lex_line(line: &str) -> Result<Line, LineError> {
    if line == DEVICE_CLOSE {
        return Ok(Line::DeviceSectionEnd);
    }
    if line.starts_with('[') {
        let (body, closes) = strip_device_close(line);
        return Ok(Line::Bare {
            records: tokenize_brackets(body)?,
            closes,
        });
    }
    if let Some(rest) = line.strip_prefix(DEVICE_OPEN) {
        let (body, closed) = strip_device_close(rest);
        return Ok(Line::Devices {
            records: tokenize_brackets(body)?,
            closed,
        });
    }

    let (tag, rest) = split_open_tag(line)?;
    let body = rest
        .strip_suffix(&format!("</{tag}>"))
        .ok_or_else(|| LineError::UnmatchedTag(tag.to_string()))?;
    match tag {
        "u" => single_record(body).map(Line::User),
        "net" => single_record(body).map(Line::Network),
        _ => {
            let channel = tag
                .parse::<ChannelId>()
                .map_err(|_| LineError::UnknownTag(tag.to_string()))?;
            let record = single_record(body)?;
            Ok(Line::Channel { channel, record })
        }
    }
}

fn strip_device_close(text: &str) -> (&str, bool) {
    let trimmed = text.trim_end();
    match trimmed.strip_suffix(DEVICE_CLOSE) {
        Some(body) => (body, true),
        None => (trimmed, false),
    }
}

/// 拆出 `<tag>` 与其后内容。
fn split_open_tag(line: &str) -> Result<(&str, &str), LineError> {
    let rest = line.strip_prefix('<').ok_or(LineError::Untagged)?;
    let end = rest.find('>').ok_or(LineError::Untagged)?;
    let tag = rest[..end].trim();
    if tag.is_empty() || tag.starts_with('/') {
        return Err(LineError::Untagged);
    }
    Ok((tag, &rest[end + 1..]))
}

fn single_record(body: &str) -> Result<Record, LineError> {
    let mut records = tokenize_brackets(body)?;
    if records.len() != 1 {
        return Err(LineError::RecordCount(records.len()));
    }
    Ok(records.remove(0))
}

/// 切分 `[...][...]` 形式的内容；组之间只允许空白。
pub fn tokenize_brackets(content: &str) -> Result<Vec<Record>, LineError> {
    let mut records = Vec::new();
    let mut rest = content.trim();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[').ok_or_else(|| {
            if rest.starts_with(']') {
                LineError::UnbalancedBracket
            } else {
                LineError::UnexpectedText(rest.to_string())
            }
        })?;
        let close = inner.find(']').ok_or(LineError::UnbalancedBracket)?;
        let body = &inner[..close];
        if body.contains('[') {
            return Err(LineError::UnbalancedBracket);
        }
        records.push(parse_pairs(body)?);
        rest = inner[close + 1..].trim_start();
    }
    Ok(records)
}

/// 按 `;` 切分字段、按第一个 `=` 切分键值；空段忽略。
fn parse_pairs(body: &str) -> Result<Record, LineError> {
    let mut fields = Vec::new();
    for segment in body.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, raw) = segment
            .split_once('=')
            .ok_or_else(|| LineError::MissingEquals(segment.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(LineError::EmptyKey(segment.to_string()));
        }
        fields.push(Field {
            key: key.to_string(),
            raw: raw.trim().to_string(),
        });
    }
    Ok(Record { fields })
}
