//! 存储接口 Trait 定义
//!
//! - DeviceTypeStore：设备类型模板
//! - DeviceInstanceStore：设备实例
//!
//! 列表按写入顺序返回；`update_*` 在记录不存在时返回 `None`，
//! `delete_*` 返回是否删除了记录。

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{DeviceInstance, DeviceTypeTemplate};

#[async_trait]
pub trait DeviceTypeStore: Send + Sync {
    async fn list_device_types(&self) -> Result<Vec<DeviceTypeTemplate>, StorageError>;

    async fn find_device_type(&self, id: &str)
    -> Result<Option<DeviceTypeTemplate>, StorageError>;

    /// id 已存在时返回 `Conflict`。
    async fn create_device_type(
        &self,
        template: DeviceTypeTemplate,
    ) -> Result<DeviceTypeTemplate, StorageError>;

    /// 按 `template.id` 整体替换。
    async fn update_device_type(
        &self,
        template: DeviceTypeTemplate,
    ) -> Result<Option<DeviceTypeTemplate>, StorageError>;

    async fn delete_device_type(&self, id: &str) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait DeviceInstanceStore: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<DeviceInstance>, StorageError>;

    async fn find_device(&self, id: &str) -> Result<Option<DeviceInstance>, StorageError>;

    /// id 已存在时返回 `Conflict`。
    async fn create_device(&self, device: DeviceInstance) -> Result<DeviceInstance, StorageError>;

    /// 按 `device.id` 整体替换。
    async fn update_device(
        &self,
        device: DeviceInstance,
    ) -> Result<Option<DeviceInstance>, StorageError>;

    async fn delete_device(&self, id: &str) -> Result<bool, StorageError>;
}
