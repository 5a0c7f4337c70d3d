//! JSON 文件契约：设备类型文件、设备实例文件与扁平化文档镜像。
//!
//! 文件中的点位是松散类型（status/action/bit 可能是数字也可能是字符串，
//! channel 可能是占位值），在这里统一校验并转换为 `domain` 类型。

mod device;
mod document;
mod error;
mod point;
mod value;

pub use device::{
    ChannelOverrideDto, ChannelOverridesDto, DeviceFile, DeviceInstanceDto, DeviceInstanceFile,
    DeviceTypeDto, DeviceTypeFile,
};
pub use document::{
    ChannelRecordDto, DataJsonDocumentDto, DeviceSummaryDto, NetworkDto, UserDto,
    document_from_json, document_to_json,
};
pub use error::ContractError;
pub use point::PointDto;
pub use value::{field_value_from_json, field_value_to_json};
