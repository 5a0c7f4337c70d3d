use crate::error::ConsoleError;
use crate::service::ConsoleService;
use crate::validation::{ensure_format_safe, ensure_points_safe, ensure_unique_name, require_name};
use domain::{DeviceTypeTemplate, Point};
use tracing::info;
use uuid::Uuid;

/// 创建或更新设备类型的输入。
#[derive(Debug, Clone)]
pub struct DeviceTypeInput {
    pub name: String,
    pub code: String,
    pub status: bool,
    pub points: Vec<Point>,
}

pub type NewDeviceType = DeviceTypeInput;

impl ConsoleService {
    pub async fn list_device_types(&self) -> Result<Vec<DeviceTypeTemplate>, ConsoleError> {
        Ok(self.types.list_device_types().await?)
    }

    pub async fn get_device_type(&self, id: &str) -> Result<DeviceTypeTemplate, ConsoleError> {
        self.types
            .find_device_type(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found("device type", id))
    }

    pub async fn create_device_type(
        &self,
        input: NewDeviceType,
    ) -> Result<DeviceTypeTemplate, ConsoleError> {
        let template = self
            .validated_template(Uuid::new_v4().to_string(), input)
            .await?;
        let created = self.types.create_device_type(template).await?;
        info!(target: "hmc.console", id = %created.id, name = %created.name, "device type created");
        Ok(created)
    }

    /// 更新模板；覆盖表形态的设备会受影响，因此随后重新生成 data.txt。
    pub async fn update_device_type(
        &self,
        id: &str,
        input: DeviceTypeInput,
    ) -> Result<DeviceTypeTemplate, ConsoleError> {
        self.get_device_type(id).await?;
        let template = self.validated_template(id.to_string(), input).await?;
        let updated = self
            .types
            .update_device_type(template)
            .await?
            .ok_or_else(|| ConsoleError::not_found("device type", id))?;
        info!(target: "hmc.console", id, "device type updated");
        self.regenerate().await?;
        Ok(updated)
    }

    /// 删除模板。仍引用它的设备会在下次导出时被跳过。
    pub async fn delete_device_type(&self, id: &str) -> Result<(), ConsoleError> {
        if !self.types.delete_device_type(id).await? {
            return Err(ConsoleError::not_found("device type", id));
        }
        info!(target: "hmc.console", id, "device type deleted");
        self.regenerate().await?;
        Ok(())
    }

    async fn validated_template(
        &self,
        id: String,
        input: DeviceTypeInput,
    ) -> Result<DeviceTypeTemplate, ConsoleError> {
        let name = require_name("name", &input.name)?;
        let code = input.code.trim().to_string();
        ensure_format_safe("code", &code)?;
        ensure_points_safe(&input.points)?;
        let existing = self.types.list_device_types().await?;
        ensure_unique_name(
            "device type",
            &name,
            existing
                .iter()
                .map(|item| (item.id.as_str(), item.name.as_str())),
            Some(id.as_str()),
        )?;
        Ok(DeviceTypeTemplate {
            id,
            name,
            code,
            status: input.status,
            points: with_ids(input.points),
        })
    }
}

/// 缺少 id 的点位补上新 id。
pub(crate) fn with_ids(points: Vec<Point>) -> Vec<Point> {
    points
        .into_iter()
        .map(|mut point| {
            if point.id.trim().is_empty() {
                point.id = Uuid::new_v4().to_string();
            }
            point
        })
        .collect()
}
