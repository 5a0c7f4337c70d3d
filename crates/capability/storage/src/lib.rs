//! # HMC Storage 模块
//!
//! 设备类型模板与设备实例的持久化。
//!
//! - [`traits`]：异步存储接口（`DeviceTypeStore`、`DeviceInstanceStore`）
//! - [`json_file`]：基于 `{devices, lastUpdated}` JSON 文件的实现
//! - [`in_memory`]：`RwLock<Vec>` 内存实现，用于测试
//!
//! JSON 实现每次操作都整体读取文件、修改、整体写回，不做进程内加锁；
//! 控制台写并发很低，同一文件上的并发写竞争是可接受的风险。
//! 文件不存在时视为空集合。

pub mod error;
pub mod in_memory;
pub mod json_file;
pub mod traits;

pub use error::StorageError;
pub use in_memory::{InMemoryDeviceInstanceStore, InMemoryDeviceTypeStore};
pub use json_file::{JsonDeviceInstanceStore, JsonDeviceTypeStore};
pub use traits::{DeviceInstanceStore, DeviceTypeStore};
