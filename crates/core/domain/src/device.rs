//! 设备类型模板与设备实例。

use crate::point::{Point, PointKey};
use crate::value::FieldValue;
use chrono::{DateTime, Utc};

/// 设备类型模板：可复用的设备类别及其默认点位。
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTypeTemplate {
    pub id: String,
    pub name: String,
    pub code: String,
    pub status: bool,
    pub points: Vec<Point>,
}

impl DeviceTypeTemplate {
    /// 扁平化文档中设备的 `type` 字段：优先使用 code，为空时使用 name。
    pub fn summary_type(&self) -> &str {
        let code = self.code.trim();
        if code.is_empty() { self.name.trim() } else { code }
    }
}

/// 单条通道覆盖：按点位身份键重映射物理通道。
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOverride {
    pub key: PointKey,
    pub channel: String,
}

/// 实例点位的两种持久化形态。
#[derive(Debug, Clone, PartialEq)]
pub enum PointSource {
    /// 历史形态：模板点位 + 自定义点位，通道由覆盖表（或历史 points）叠加。
    Overlay {
        custom_points: Vec<Point>,
        channel_overrides: Vec<ChannelOverride>,
        /// 早期数据保存的完整点位列表，仅在覆盖表为空时作为通道来源。
        persisted_points: Vec<Point>,
    },
    /// 新形态：实例持有完整独立的点位副本。
    Independent { points: Vec<Point> },
}

impl PointSource {
    pub fn independent(points: Vec<Point>) -> Self {
        Self::Independent { points }
    }

    pub fn is_independent(&self) -> bool {
        matches!(self, Self::Independent { .. })
    }
}

/// 设备实例。`name` 在所有实例中唯一。
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInstance {
    pub id: String,
    pub name: String,
    pub device_type_id: String,
    pub conaddr: Option<FieldValue>,
    pub retadd: Option<FieldValue>,
    pub source: PointSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
