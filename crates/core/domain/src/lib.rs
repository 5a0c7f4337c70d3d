//! 控制台核心领域模型：点位、设备类型模板、设备实例与扁平化文档。

pub mod channel;
pub mod device;
pub mod document;
pub mod point;
pub mod value;

pub use channel::{ChannelId, ChannelIdError, ChannelKind};
pub use device::{ChannelOverride, DeviceInstance, DeviceTypeTemplate, PointSource};
pub use document::{ChannelRecord, DataJsonDocument, DeviceSummary, NetworkConfig, UserCredential};
pub use point::{
    CHANNEL_PLACEHOLDER, Point, PointCounts, PointKey, PointKind, PointKindError, PointSignal,
    is_channel_placeholder, normalize_channel,
};
pub use value::{FieldValue, format_number, parse_number, safe_number_conversion};
