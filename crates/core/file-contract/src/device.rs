use crate::error::ContractError;
use crate::point::{PointDto, points_from_dtos, points_to_dtos};
use crate::value::{field_value_from_json, field_value_to_json};
use chrono::{DateTime, Utc};
use domain::{ChannelOverride, DeviceInstance, DeviceTypeTemplate, PointKey, PointKind, PointSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 设备类型文件与设备实例文件共用的外层结构：`{devices, lastUpdated}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFile<T> {
    #[serde(default = "Vec::new")]
    pub devices: Vec<T>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for DeviceFile<T> {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            last_updated: None,
        }
    }
}

pub type DeviceTypeFile = DeviceFile<DeviceTypeDto>;
pub type DeviceInstanceFile = DeviceFile<DeviceInstanceDto>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_status")]
    pub status: bool,
    #[serde(default)]
    pub points: Vec<PointDto>,
}

fn default_status() -> bool {
    true
}

impl TryFrom<DeviceTypeDto> for DeviceTypeTemplate {
    type Error = ContractError;

    fn try_from(dto: DeviceTypeDto) -> Result<Self, Self::Error> {
        Ok(DeviceTypeTemplate {
            id: dto.id,
            name: dto.name,
            code: dto.code,
            status: dto.status,
            points: points_from_dtos(dto.points)?,
        })
    }
}

impl From<&DeviceTypeTemplate> for DeviceTypeDto {
    fn from(template: &DeviceTypeTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            code: template.code.clone(),
            status: template.status,
            points: points_to_dtos(&template.points),
        }
    }
}

/// 列表形式的单条覆盖。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOverrideDto {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub channel: String,
}

/// `channelOverrides` 在历史数据中有两种写法：对象列表，或 `"TYPE::key" → channel` 映射。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelOverridesDto {
    List(Vec<ChannelOverrideDto>),
    Map(BTreeMap<String, String>),
}

impl ChannelOverridesDto {
    fn into_overrides(self) -> Result<Vec<ChannelOverride>, ContractError> {
        match self {
            Self::List(items) => items
                .into_iter()
                .map(|item| {
                    let kind = item.kind.parse::<PointKind>()?;
                    Ok(ChannelOverride {
                        key: PointKey::new(kind, &item.code, &item.status_code),
                        channel: item.channel,
                    })
                })
                .collect(),
            Self::Map(map) => Ok(map
                .into_iter()
                .map(|(key, channel)| ChannelOverride {
                    key: PointKey::from_raw(key),
                    channel,
                })
                .collect()),
        }
    }
}

/// 设备实例的文件形态。存在 `independentPoints` 即为独立副本形态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInstanceDto {
    pub id: String,
    pub name: String,
    #[serde(alias = "deviceType")]
    pub device_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conaddr: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retadd: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent_points: Option<Vec<PointDto>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_points: Vec<PointDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_overrides: Option<ChannelOverridesDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<PointDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<DeviceInstanceDto> for DeviceInstance {
    type Error = ContractError;

    fn try_from(dto: DeviceInstanceDto) -> Result<Self, Self::Error> {
        let source = match dto.independent_points {
            Some(points) => PointSource::independent(points_from_dtos(points)?),
            None => PointSource::Overlay {
                custom_points: points_from_dtos(dto.custom_points)?,
                channel_overrides: match dto.channel_overrides {
                    Some(overrides) => overrides.into_overrides()?,
                    None => Vec::new(),
                },
                persisted_points: points_from_dtos(dto.points)?,
            },
        };
        let created_at = dto.created_at.unwrap_or_default();
        Ok(DeviceInstance {
            id: dto.id,
            name: dto.name,
            device_type_id: dto.device_type_id,
            conaddr: dto.conaddr.as_ref().and_then(field_value_from_json),
            retadd: dto.retadd.as_ref().and_then(field_value_from_json),
            source,
            created_at,
            updated_at: dto.updated_at.unwrap_or(created_at),
        })
    }
}

impl From<&DeviceInstance> for DeviceInstanceDto {
    fn from(instance: &DeviceInstance) -> Self {
        let mut dto = Self {
            id: instance.id.clone(),
            name: instance.name.clone(),
            device_type_id: instance.device_type_id.clone(),
            conaddr: instance.conaddr.as_ref().map(field_value_to_json),
            retadd: instance.retadd.as_ref().map(field_value_to_json),
            independent_points: None,
            custom_points: Vec::new(),
            channel_overrides: None,
            points: Vec::new(),
            created_at: Some(instance.created_at),
            updated_at: Some(instance.updated_at),
        };
        match &instance.source {
            PointSource::Independent { points } => {
                dto.independent_points = Some(points_to_dtos(points));
            }
            PointSource::Overlay {
                custom_points,
                channel_overrides,
                persisted_points,
            } => {
                dto.custom_points = points_to_dtos(custom_points);
                if !channel_overrides.is_empty() {
                    // 身份键已折叠为字符串，写回时统一用映射形式。
                    dto.channel_overrides = Some(ChannelOverridesDto::Map(
                        channel_overrides
                            .iter()
                            .map(|item| (item.key.as_str().to_string(), item.channel.clone()))
                            .collect(),
                    ));
                }
                dto.points = points_to_dtos(persisted_points);
            }
        }
        dto
    }
}
