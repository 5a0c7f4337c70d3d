//! 设备实例内存存储实现

use crate::error::StorageError;
use crate::traits::DeviceInstanceStore;
use domain::DeviceInstance;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryDeviceInstanceStore {
    items: RwLock<Vec<DeviceInstance>>,
}

impl InMemoryDeviceInstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: Vec<DeviceInstance>) -> Self {
        Self {
            items: RwLock::new(devices),
        }
    }
}

#[async_trait::async_trait]
impl DeviceInstanceStore for InMemoryDeviceInstanceStore {
    async fn list_devices(&self) -> Result<Vec<DeviceInstance>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Lock)?;
        Ok(items.clone())
    }

    async fn find_device(&self, id: &str) -> Result<Option<DeviceInstance>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Lock)?;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn create_device(&self, device: DeviceInstance) -> Result<DeviceInstance, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Lock)?;
        if items.iter().any(|item| item.id == device.id) {
            return Err(StorageError::Conflict(format!("device {} exists", device.id)));
        }
        items.push(device.clone());
        Ok(device)
    }

    async fn update_device(
        &self,
        device: DeviceInstance,
    ) -> Result<Option<DeviceInstance>, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Lock)?;
        let slot = match items.iter_mut().find(|item| item.id == device.id) {
            Some(slot) => slot,
            None => return Ok(None),
        };
        *slot = device.clone();
        Ok(Some(device))
    }

    async fn delete_device(&self, id: &str) -> Result<bool, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Lock)?;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() != before)
    }
}
