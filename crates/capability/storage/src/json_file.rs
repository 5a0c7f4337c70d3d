//! JSON 文件存储实现
//!
//! 文件格式为 `{ "devices": [...], "lastUpdated": "<RFC3339>" }`，
//! 每次写回都会刷新 `lastUpdated`。

use crate::error::StorageError;
use crate::traits::{DeviceInstanceStore, DeviceTypeStore};
use async_trait::async_trait;
use chrono::Utc;
use domain::{DeviceInstance, DeviceTypeTemplate};
use file_contract::{ContractError, DeviceFile, DeviceInstanceDto, DeviceTypeDto};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 可以存入 `{devices, lastUpdated}` 文件的记录。
trait FileRecord: Clone + Send + Sync + Sized + 'static {
    type Dto: Serialize + DeserializeOwned + Send + Sync;
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn to_dto(&self) -> Self::Dto;
    fn from_dto(dto: Self::Dto) -> Result<Self, ContractError>;
}

impl FileRecord for DeviceTypeTemplate {
    type Dto = DeviceTypeDto;
    const KIND: &'static str = "device type";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_dto(&self) -> Self::Dto {
        DeviceTypeDto::from(self)
    }

    fn from_dto(dto: Self::Dto) -> Result<Self, ContractError> {
        DeviceTypeTemplate::try_from(dto)
    }
}

impl FileRecord for DeviceInstance {
    type Dto = DeviceInstanceDto;
    const KIND: &'static str = "device";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_dto(&self) -> Self::Dto {
        DeviceInstanceDto::from(self)
    }

    fn from_dto(dto: Self::Dto) -> Result<Self, ContractError> {
        DeviceInstance::try_from(dto)
    }
}

/// 单个 JSON 文件上的读-改-写。
#[derive(Debug, Clone)]
struct JsonCollection<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: FileRecord> JsonCollection<R> {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    async fn load(&self) -> Result<Vec<R>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    target: "hmc.storage",
                    path = %self.path.display(),
                    "store file missing, treated as empty"
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(StorageError::io(&self.path, err)),
        };
        let file: DeviceFile<R::Dto> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })?;
        file.devices
            .into_iter()
            .map(|dto| R::from_dto(dto).map_err(StorageError::from))
            .collect()
    }

    async fn save(&self, records: &[R]) -> Result<(), StorageError> {
        let file = DeviceFile {
            devices: records.iter().map(R::to_dto).collect(),
            last_updated: Some(Utc::now()),
        };
        let body = serde_json::to_string_pretty(&file).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::io(parent, err))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|err| StorageError::io(&self.path, err))?;
        debug!(
            target: "hmc.storage",
            path = %self.path.display(),
            count = records.len(),
            "store file written"
        );
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<R>, StorageError> {
        Ok(self.load().await?.into_iter().find(|item| item.id() == id))
    }

    async fn create(&self, record: R) -> Result<R, StorageError> {
        let mut records = self.load().await?;
        if records.iter().any(|item| item.id() == record.id()) {
            return Err(StorageError::Conflict(format!(
                "{} {} exists",
                R::KIND,
                record.id()
            )));
        }
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    async fn update(&self, record: R) -> Result<Option<R>, StorageError> {
        let mut records = self.load().await?;
        let Some(slot) = records.iter_mut().find(|item| item.id() == record.id()) else {
            return Ok(None);
        };
        *slot = record.clone();
        self.save(&records).await?;
        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|item| item.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }
}

/// 设备类型模板文件（device-types.json）。
#[derive(Debug, Clone)]
pub struct JsonDeviceTypeStore {
    inner: JsonCollection<DeviceTypeTemplate>,
}

impl JsonDeviceTypeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: JsonCollection::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

#[async_trait]
impl DeviceTypeStore for JsonDeviceTypeStore {
    async fn list_device_types(&self) -> Result<Vec<DeviceTypeTemplate>, StorageError> {
        self.inner.load().await
    }

    async fn find_device_type(
        &self,
        id: &str,
    ) -> Result<Option<DeviceTypeTemplate>, StorageError> {
        self.inner.find(id).await
    }

    async fn create_device_type(
        &self,
        template: DeviceTypeTemplate,
    ) -> Result<DeviceTypeTemplate, StorageError> {
        self.inner.create(template).await
    }

    async fn update_device_type(
        &self,
        template: DeviceTypeTemplate,
    ) -> Result<Option<DeviceTypeTemplate>, StorageError> {
        self.inner.update(template).await
    }

    async fn delete_device_type(&self, id: &str) -> Result<bool, StorageError> {
        self.inner.delete(id).await
    }
}

/// 设备实例文件（devices.json）。
#[derive(Debug, Clone)]
pub struct JsonDeviceInstanceStore {
    inner: JsonCollection<DeviceInstance>,
}

impl JsonDeviceInstanceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: JsonCollection::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

#[async_trait]
impl DeviceInstanceStore for JsonDeviceInstanceStore {
    async fn list_devices(&self) -> Result<Vec<DeviceInstance>, StorageError> {
        self.inner.load().await
    }

    async fn find_device(&self, id: &str) -> Result<Option<DeviceInstance>, StorageError> {
        self.inner.find(id).await
    }

    async fn create_device(&self, device: DeviceInstance) -> Result<DeviceInstance, StorageError> {
        self.inner.create(device).await
    }

    async fn update_device(
        &self,
        device: DeviceInstance,
    ) -> Result<Option<DeviceInstance>, StorageError> {
        self.inner.update(device).await
    }

    async fn delete_device(&self, id: &str) -> Result<bool, StorageError> {
        self.inner.delete(id).await
    }
}
