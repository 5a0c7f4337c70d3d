use crate::error::ContractError;
use crate::value::{field_value_from_json, field_value_to_json};
use domain::{
    ChannelId, ChannelKind, ChannelRecord, DataJsonDocument, DeviceSummary, NetworkConfig,
    UserCredential,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    #[serde(alias = "pass")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDto {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mask: String,
    #[serde(default, alias = "gw")]
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummaryDto {
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(rename = "DINum", default)]
    pub di_num: u32,
    #[serde(rename = "DONum", default)]
    pub do_num: u32,
    #[serde(rename = "AINum", default)]
    pub ai_num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conaddr: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retadd: Option<Value>,
}

/// 通道记录；DI/AI 使用 `sta`，DO 使用 `action`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecordDto {
    pub channel: String,
    #[serde(default)]
    pub dev: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit: Option<Value>,
}

/// 扁平化文档的 JSON 镜像（data.json）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataJsonDocumentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkDto>,
    #[serde(default)]
    pub devices: Vec<DeviceSummaryDto>,
    #[serde(default)]
    pub digital_inputs: Vec<ChannelRecordDto>,
    #[serde(default)]
    pub digital_outputs: Vec<ChannelRecordDto>,
    #[serde(default)]
    pub analog_inputs: Vec<ChannelRecordDto>,
}

fn list_name(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Di => "digitalInputs",
        ChannelKind::Do => "digitalOutputs",
        ChannelKind::Ai => "analogInputs",
    }
}

impl ChannelRecordDto {
    fn into_record(self, kind: ChannelKind) -> Result<ChannelRecord, ContractError> {
        let channel = self.channel.trim().parse::<ChannelId>()?;
        if channel.kind() != kind {
            return Err(ContractError::ChannelKindMismatch {
                list: list_name(kind),
                channel: self.channel,
            });
        }
        let raw = match kind {
            ChannelKind::Do => self.action,
            ChannelKind::Di | ChannelKind::Ai => self.sta,
        };
        Ok(ChannelRecord {
            channel,
            dev: self.dev,
            value: raw.as_ref().and_then(field_value_from_json),
            bit: self.bit.as_ref().and_then(field_value_from_json),
        })
    }
}

impl From<&ChannelRecord> for ChannelRecordDto {
    fn from(record: &ChannelRecord) -> Self {
        let value = record.value.as_ref().map(field_value_to_json);
        let (sta, action) = match record.kind() {
            ChannelKind::Do => (None, value),
            ChannelKind::Di | ChannelKind::Ai => (value, None),
        };
        Self {
            channel: record.channel.to_string(),
            dev: record.dev.clone(),
            sta,
            action,
            bit: record.bit.as_ref().map(field_value_to_json),
        }
    }
}

impl TryFrom<DataJsonDocumentDto> for DataJsonDocument {
    type Error = ContractError;

    fn try_from(dto: DataJsonDocumentDto) -> Result<Self, Self::Error> {
        let mut doc = DataJsonDocument {
            user: dto.user.map(|user| UserCredential {
                username: user.username,
                password: user.password,
            }),
            network: dto.network.map(|network| NetworkConfig {
                mac: network.mac,
                ip: network.ip,
                mask: network.mask,
                gateway: network.gateway,
            }),
            devices: dto
                .devices
                .into_iter()
                .map(|device| DeviceSummary {
                    name: device.name,
                    device_type: device.device_type,
                    di_num: device.di_num,
                    do_num: device.do_num,
                    ai_num: device.ai_num,
                    conaddr: device.conaddr.as_ref().and_then(field_value_from_json),
                    retadd: device.retadd.as_ref().and_then(field_value_from_json),
                })
                .collect(),
            ..DataJsonDocument::default()
        };
        for (kind, records) in [
            (ChannelKind::Di, dto.digital_inputs),
            (ChannelKind::Do, dto.digital_outputs),
            (ChannelKind::Ai, dto.analog_inputs),
        ] {
            for record in records {
                doc.push_channel(record.into_record(kind)?);
            }
        }
        Ok(doc)
    }
}

impl From<&DataJsonDocument> for DataJsonDocumentDto {
    fn from(doc: &DataJsonDocument) -> Self {
        let records = |kind: ChannelKind| -> Vec<ChannelRecordDto> {
            doc.channels(kind).iter().map(ChannelRecordDto::from).collect()
        };
        Self {
            user: doc.user.as_ref().map(|user| UserDto {
                username: user.username.clone(),
                password: user.password.clone(),
            }),
            network: doc.network.as_ref().map(|network| NetworkDto {
                mac: network.mac.clone(),
                ip: network.ip.clone(),
                mask: network.mask.clone(),
                gateway: network.gateway.clone(),
            }),
            devices: doc
                .devices
                .iter()
                .map(|device| DeviceSummaryDto {
                    name: device.name.clone(),
                    device_type: device.device_type.clone(),
                    di_num: device.di_num,
                    do_num: device.do_num,
                    ai_num: device.ai_num,
                    conaddr: device.conaddr.as_ref().map(field_value_to_json),
                    retadd: device.retadd.as_ref().map(field_value_to_json),
                })
                .collect(),
            digital_inputs: records(ChannelKind::Di),
            digital_outputs: records(ChannelKind::Do),
            analog_inputs: records(ChannelKind::Ai),
        }
    }
}

/// 文档 → 带缩进的 JSON 文本。
pub fn document_to_json(doc: &DataJsonDocument) -> Result<String, ContractError> {
    Ok(serde_json::to_string_pretty(&DataJsonDocumentDto::from(doc))?)
}

pub fn document_from_json(raw: &str) -> Result<DataJsonDocument, ContractError> {
    let dto: DataJsonDocumentDto = serde_json::from_str(raw)?;
    DataJsonDocument::try_from(dto)
}
