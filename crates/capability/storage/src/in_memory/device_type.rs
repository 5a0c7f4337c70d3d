//! 设备类型内存存储实现

use crate::error::StorageError;
use crate::traits::DeviceTypeStore;
use domain::DeviceTypeTemplate;
use std::sync::RwLock;

/// 使用 RwLock + Vec 保持写入顺序。
#[derive(Debug, Default)]
pub struct InMemoryDeviceTypeStore {
    items: RwLock<Vec<DeviceTypeTemplate>>,
}

impl InMemoryDeviceTypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<DeviceTypeTemplate>) -> Self {
        Self {
            items: RwLock::new(templates),
        }
    }
}

#[async_trait::async_trait]
impl DeviceTypeStore for InMemoryDeviceTypeStore {
    async fn list_device_types(&self) -> Result<Vec<DeviceTypeTemplate>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Lock)?;
        Ok(items.clone())
    }

    async fn find_device_type(
        &self,
        id: &str,
    ) -> Result<Option<DeviceTypeTemplate>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Lock)?;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn create_device_type(
        &self,
        template: DeviceTypeTemplate,
    ) -> Result<DeviceTypeTemplate, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Lock)?;
        if items.iter().any(|item| item.id == template.id) {
            return Err(StorageError::Conflict(format!(
                "device type {} exists",
                template.id
            )));
        }
        items.push(template.clone());
        Ok(template)
    }

    async fn update_device_type(
        &self,
        template: DeviceTypeTemplate,
    ) -> Result<Option<DeviceTypeTemplate>, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Lock)?;
        let slot = match items.iter_mut().find(|item| item.id == template.id) {
            Some(slot) => slot,
            None => return Ok(None),
        };
        *slot = template.clone();
        Ok(Some(template))
    }

    async fn delete_device_type(&self, id: &str) -> Result<bool, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Lock)?;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() != before)
    }
}
