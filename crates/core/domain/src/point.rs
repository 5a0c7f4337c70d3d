//! 点位模型。
//!
//! 点位按类型区分为 DI/DO/AI/AO 四种信号，每种只携带与之相关的可选字段：
//! 输入类（DI/AI）携带 `status`，输出类（DO/AO）携带 `action`。

use crate::channel::{ChannelId, ChannelKind};
use crate::value::FieldValue;
use std::fmt;
use std::str::FromStr;

/// 未分配通道时的占位值。
pub const CHANNEL_PLACEHOLDER: &str = "请选择";

/// 视为“未分配”的通道占位字符串（空白另行判断）。
const CHANNEL_PLACEHOLDERS: [&str; 3] = [CHANNEL_PLACEHOLDER, "null", "undefined"];

/// 点位类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointKind {
    Di,
    Do,
    Ai,
    Ao,
}

impl PointKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Di => "DI",
            Self::Do => "DO",
            Self::Ai => "AI",
            Self::Ao => "AO",
        }
    }

    /// 导出时使用的通道类别：AO 并入 AI。
    pub fn channel_kind(self) -> ChannelKind {
        match self {
            Self::Di => ChannelKind::Di,
            Self::Do => ChannelKind::Do,
            Self::Ai | Self::Ao => ChannelKind::Ai,
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointKindError(pub String);

impl fmt::Display for PointKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown point type: {}", self.0)
    }
}

impl std::error::Error for PointKindError {}

impl FromStr for PointKind {
    type Err = PointKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DI" => Ok(Self::Di),
            "DO" => Ok(Self::Do),
            "AI" => Ok(Self::Ai),
            "AO" => Ok(Self::Ao),
            _ => Err(PointKindError(raw.to_string())),
        }
    }
}

/// 按类型区分的信号字段。
#[derive(Debug, Clone, PartialEq)]
pub enum PointSignal {
    DigitalInput { status: Option<FieldValue> },
    DigitalOutput { action: Option<FieldValue> },
    AnalogInput { status: Option<FieldValue> },
    AnalogOutput { action: Option<FieldValue> },
}

impl PointSignal {
    /// 按类型构造信号，丢弃与该类型无关的字段。
    pub fn for_kind(
        kind: PointKind,
        status: Option<FieldValue>,
        action: Option<FieldValue>,
    ) -> Self {
        match kind {
            PointKind::Di => Self::DigitalInput { status },
            PointKind::Do => Self::DigitalOutput { action },
            PointKind::Ai => Self::AnalogInput { status },
            PointKind::Ao => Self::AnalogOutput { action },
        }
    }

    pub fn kind(&self) -> PointKind {
        match self {
            Self::DigitalInput { .. } => PointKind::Di,
            Self::DigitalOutput { .. } => PointKind::Do,
            Self::AnalogInput { .. } => PointKind::Ai,
            Self::AnalogOutput { .. } => PointKind::Ao,
        }
    }
}

/// 点位定义（模板点位或实例点位）。
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: String,
    pub code: String,
    pub status_code: String,
    pub status_feedback: String,
    pub value: f64,
    /// 已规范化的通道；`None` 表示未分配。
    pub channel: Option<String>,
    /// 共享寄存器硬件的子通道序号。
    pub bit: Option<FieldValue>,
    pub signal: PointSignal,
}

impl Point {
    /// 构造只有类型与编码的点位，其余字段取默认值。
    pub fn new(id: impl Into<String>, kind: PointKind, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            status_code: String::new(),
            status_feedback: String::new(),
            value: 0.0,
            channel: None,
            bit: None,
            signal: PointSignal::for_kind(kind, None, None),
        }
    }

    pub fn kind(&self) -> PointKind {
        self.signal.kind()
    }

    /// 身份键 `type::(code||statusCode)`。
    pub fn key(&self) -> PointKey {
        PointKey::new(self.kind(), &self.code, &self.status_code)
    }

    pub fn status(&self) -> Option<&FieldValue> {
        match &self.signal {
            PointSignal::DigitalInput { status } | PointSignal::AnalogInput { status } => {
                status.as_ref()
            }
            _ => None,
        }
    }

    pub fn action(&self) -> Option<&FieldValue> {
        match &self.signal {
            PointSignal::DigitalOutput { action } | PointSignal::AnalogOutput { action } => {
                action.as_ref()
            }
            _ => None,
        }
    }

    /// 导出到扁平化记录的值：输入类取 status，输出类取 action。
    pub fn exported_value(&self) -> Option<&FieldValue> {
        self.status().or_else(|| self.action())
    }

    /// 当前通道能否直接用于导出（规范化后是同类别的通道标识）。
    pub fn usable_channel(&self) -> Option<ChannelId> {
        let channel = self.channel.as_deref()?;
        let id = channel.parse::<ChannelId>().ok()?;
        (id.kind() == self.kind().channel_kind()).then_some(id)
    }
}

/// 点位身份键，用于模板合并与通道覆盖匹配。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(String);

impl PointKey {
    /// code 非空时用 code，否则用 statusCode。
    pub fn new(kind: PointKind, code: &str, status_code: &str) -> Self {
        let code = code.trim();
        let ident = if code.is_empty() { status_code.trim() } else { code };
        Self(format!("{kind}::{ident}"))
    }

    /// 直接使用已拼好的键（历史数据中的 map 形式覆盖）。
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_channel_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || CHANNEL_PLACEHOLDERS.contains(&trimmed)
}

/// 通道规范化：占位值或空白视为未分配。
pub fn normalize_channel(raw: &str) -> Option<String> {
    if is_channel_placeholder(raw) {
        return None;
    }
    Some(raw.trim().to_string())
}

/// 按类型统计的点位数量。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointCounts {
    pub digital_in: u32,
    pub digital_out: u32,
    pub analog_in: u32,
    pub analog_out: u32,
}

impl PointCounts {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut counts = Self::default();
        for point in points {
            match point.kind() {
                PointKind::Di => counts.digital_in += 1,
                PointKind::Do => counts.digital_out += 1,
                PointKind::Ai => counts.analog_in += 1,
                PointKind::Ao => counts.analog_out += 1,
            }
        }
        counts
    }

    /// 扁平化文档中的 AINum（AO 计入 AI）。
    pub fn flattened_analog_in(&self) -> u32 {
        self.analog_in + self.analog_out
    }
}
