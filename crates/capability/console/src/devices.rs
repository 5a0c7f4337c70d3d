use crate::device_types::with_ids;
use crate::error::{ConsoleError, ValidationError};
use crate::service::ConsoleService;
use crate::validation::{ensure_field_value_safe, ensure_points_safe, ensure_unique_name, require_name};
use chrono::Utc;
use domain::{DeviceInstance, FieldValue, Point, PointSource};
use hmc_merge::{fork_template_points, import_template_defaults, merge_effective_points};
use tracing::info;
use uuid::Uuid;

/// 创建设备的输入。`points` 为空时从模板复制。
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub device_type_id: String,
    pub conaddr: Option<FieldValue>,
    pub retadd: Option<FieldValue>,
    pub points: Option<Vec<Point>>,
}

/// 更新设备的输入，`None` 的字段保持不变。给出 `points` 会把设备转为独立副本形态。
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub conaddr: Option<FieldValue>,
    pub retadd: Option<FieldValue>,
    pub points: Option<Vec<Point>>,
}

impl ConsoleService {
    pub async fn list_devices(&self) -> Result<Vec<DeviceInstance>, ConsoleError> {
        Ok(self.devices.list_devices().await?)
    }

    pub async fn get_device(&self, id: &str) -> Result<DeviceInstance, ConsoleError> {
        self.devices
            .find_device(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("device", id))
    }

    pub async fn create_device(&self, input: NewDevice) -> Result<DeviceInstance, ConsoleError> {
        let id = Uuid::new_v4().to_string();
        let name = self.validated_device_name(&input.name, None).await?;
        ensure_field_value_safe("conaddr", input.conaddr.as_ref())?;
        ensure_field_value_safe("retadd", input.retadd.as_ref())?;
        if let Some(points) = &input.points {
            ensure_points_safe(points)?;
        }
        let template = self
            .types
            .find_device_type(&input.device_type_id)
            .await?
            .ok_or_else(|| ValidationError::UnknownDeviceType(input.device_type_id.clone()))?;

        let points = match input.points {
            Some(points) => with_ids(points),
            None => fork_template_points(&template),
        };
        let now = Utc::now();
        let device = DeviceInstance {
            id,
            name,
            device_type_id: template.id.clone(),
            conaddr: input.conaddr,
            retadd: input.retadd,
            source: PointSource::independent(points),
            created_at: now,
            updated_at: now,
        };
        let created = self.devices.create_device(device).await?;
        info!(target: "hmc.console", id = %created.id, name = %created.name, "device created");
        self.regenerate().await?;
        Ok(created)
    }

    pub async fn update_device(
        &self,
        id: &str,
        update: DeviceUpdate,
    ) -> Result<DeviceInstance, ConsoleError> {
        let mut device = self.get_device(id).await?;
        if let Some(name) = &update.name {
            device.name = self.validated_device_name(name, Some(id)).await?;
        }
        ensure_field_value_safe("conaddr", update.conaddr.as_ref())?;
        ensure_field_value_safe("retadd", update.retadd.as_ref())?;
        if let Some(points) = &update.points {
            ensure_points_safe(points)?;
        }
        if let Some(conaddr) = update.conaddr {
            device.conaddr = Some(conaddr);
        }
        if let Some(retadd) = update.retadd {
            device.retadd = Some(retadd);
        }
        if let Some(points) = update.points {
            device.source = PointSource::independent(with_ids(points));
        }
        device.updated_at = Utc::now();
        let updated = self
            .devices
            .update_device(device)
            .await?
            .ok_or_else(|| ConsoleError::not_found("device", id))?;
        info!(target: "hmc.console", id, "device updated");
        self.regenerate().await?;
        Ok(updated)
    }

    pub async fn delete_device(&self, id: &str) -> Result<(), ConsoleError> {
        if !self.devices.delete_device(id).await? {
            return Err(ConsoleError::not_found("device", id));
        }
        info!(target: "hmc.console", id, "device deleted");
        self.regenerate().await?;
        Ok(())
    }

    /// 从模板补入缺失点位，返回新增数量。已有点位（含其通道）保持不变，
    /// 设备随之转为独立副本形态。
    pub async fn reimport_template(&self, id: &str) -> Result<usize, ConsoleError> {
        let mut device = self.get_device(id).await?;
        let template = self
            .types
            .find_device_type(&device.device_type_id)
            .await?
            .ok_or_else(|| ValidationError::UnknownDeviceType(device.device_type_id.clone()))?;

        let mut points = merge_effective_points(&device, &template).points;
        let added = import_template_defaults(&points, &template);
        let count = added.len();
        if count == 0 && device.source.is_independent() {
            return Ok(0);
        }
        points.extend(added);
        device.source = PointSource::independent(points);
        device.updated_at = Utc::now();
        self.devices
            .update_device(device)
            .await?
            .ok_or_else(|| ConsoleError::not_found("device", id))?;
        info!(target: "hmc.console", id, added = count, "template defaults imported");
        self.regenerate().await?;
        Ok(count)
    }

    async fn validated_device_name(
        &self,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<String, ConsoleError> {
        let name = require_name("name", name)?;
        let existing = self.devices.list_devices().await?;
        ensure_unique_name(
            "device",
            &name,
            existing
                .iter()
                .map(|item| (item.id.as_str(), item.name.as_str())),
            exclude_id,
        )?;
        Ok(name)
    }
}
