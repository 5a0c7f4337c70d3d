//! 扁平化文档：与硬件交换的 data.txt 的结构化形态。

use crate::channel::{ChannelId, ChannelKind};
use crate::value::FieldValue;

/// 登录凭据，保存在 `<u>` 记录中。密码始终按不透明字符串处理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
}

/// 网络配置（整体替换，不做部分更新）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub mac: String,
    pub ip: String,
    pub mask: String,
    pub gateway: String,
}

/// 设备摘要（`<dev>` 中的一条记录）。
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSummary {
    pub name: String,
    pub device_type: String,
    pub di_num: u32,
    pub do_num: u32,
    /// AO 数量已并入。
    pub ai_num: u32,
    pub conaddr: Option<FieldValue>,
    pub retadd: Option<FieldValue>,
}

/// 单条通道记录（`<DIn>`/`<DOn>`/`<AIn>`）。
///
/// `value` 对 DI/AI 为 `sta`，对 DO 为 `action`。
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRecord {
    pub channel: ChannelId,
    pub dev: String,
    pub value: Option<FieldValue>,
    pub bit: Option<FieldValue>,
}

impl ChannelRecord {
    pub fn kind(&self) -> ChannelKind {
        self.channel.kind()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataJsonDocument {
    pub user: Option<UserCredential>,
    pub network: Option<NetworkConfig>,
    pub devices: Vec<DeviceSummary>,
    pub digital_inputs: Vec<ChannelRecord>,
    pub digital_outputs: Vec<ChannelRecord>,
    pub analog_inputs: Vec<ChannelRecord>,
}

impl DataJsonDocument {
    pub fn channels(&self, kind: ChannelKind) -> &[ChannelRecord] {
        match kind {
            ChannelKind::Di => &self.digital_inputs,
            ChannelKind::Do => &self.digital_outputs,
            ChannelKind::Ai => &self.analog_inputs,
        }
    }

    pub fn channels_mut(&mut self, kind: ChannelKind) -> &mut Vec<ChannelRecord> {
        match kind {
            ChannelKind::Di => &mut self.digital_inputs,
            ChannelKind::Do => &mut self.digital_outputs,
            ChannelKind::Ai => &mut self.analog_inputs,
        }
    }

    /// 按记录自身的通道类别放入对应列表。
    pub fn push_channel(&mut self, record: ChannelRecord) {
        self.channels_mut(record.kind()).push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.network.is_none()
            && self.devices.is_empty()
            && self.digital_inputs.is_empty()
            && self.digital_outputs.is_empty()
            && self.analog_inputs.is_empty()
    }
}
