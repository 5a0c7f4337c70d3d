use crate::error::{ConsoleError, ValidationError};
use crate::service::ConsoleService;
use crate::validation::{ensure_field_value_safe, require_name};
use domain::{ChannelId, ChannelKind, ChannelRecord};
use tracing::info;

impl ConsoleService {
    pub async fn list_digital_inputs(&self) -> Result<Vec<ChannelRecord>, ConsoleError> {
        Ok(self.load_document().await?.digital_inputs)
    }

    /// 新增一条 `<DIn>` 记录；通道已存在时报错。
    pub async fn add_digital_input(
        &self,
        record: ChannelRecord,
    ) -> Result<ChannelRecord, ConsoleError> {
        let record = validated_record(record)?;
        let mut doc = self.load_for_update().await?;
        if doc
            .digital_inputs
            .iter()
            .any(|item| item.channel == record.channel)
        {
            return Err(ValidationError::DuplicateChannel(record.channel.to_string()).into());
        }
        doc.digital_inputs.push(record.clone());
        self.store_document(&doc).await?;
        info!(target: "hmc.console", channel = %record.channel, "digital input added");
        Ok(record)
    }

    /// 替换 `channel` 上的记录；记录可以改到另一个空闲通道。
    pub async fn update_digital_input(
        &self,
        channel: ChannelId,
        record: ChannelRecord,
    ) -> Result<ChannelRecord, ConsoleError> {
        let record = validated_record(record)?;
        let mut doc = self.load_for_update().await?;
        if record.channel != channel
            && doc
                .digital_inputs
                .iter()
                .any(|item| item.channel == record.channel)
        {
            return Err(ValidationError::DuplicateChannel(record.channel.to_string()).into());
        }
        let slot = doc
            .digital_inputs
            .iter_mut()
            .find(|item| item.channel == channel)
            .ok_or_else(|| ConsoleError::not_found("digital input", channel.to_string()))?;
        *slot = record.clone();
        self.store_document(&doc).await?;
        info!(target: "hmc.console", %channel, "digital input updated");
        Ok(record)
    }

    pub async fn delete_digital_input(&self, channel: ChannelId) -> Result<(), ConsoleError> {
        let mut doc = self.load_for_update().await?;
        let before = doc.digital_inputs.len();
        doc.digital_inputs.retain(|item| item.channel != channel);
        if doc.digital_inputs.len() == before {
            return Err(ConsoleError::not_found("digital input", channel.to_string()));
        }
        self.store_document(&doc).await?;
        info!(target: "hmc.console", %channel, "digital input deleted");
        Ok(())
    }
}

fn validated_record(record: ChannelRecord) -> Result<ChannelRecord, ValidationError> {
    if record.kind() != ChannelKind::Di {
        return Err(ValidationError::NotDigitalInput(record.channel.to_string()));
    }
    let dev = require_name("dev", &record.dev)?;
    ensure_field_value_safe("sta", record.value.as_ref())?;
    ensure_field_value_safe("bit", record.bit.as_ref())?;
    Ok(ChannelRecord { dev, ..record })
}
