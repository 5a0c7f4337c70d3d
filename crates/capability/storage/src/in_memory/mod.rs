//! 内存存储实现模块
//!
//! 用于测试与不落盘的场景。
//!
//! - DeviceTypeStore: InMemoryDeviceTypeStore
//! - DeviceInstanceStore: InMemoryDeviceInstanceStore

pub mod device_instance;
pub mod device_type;

pub use device_instance::*;
pub use device_type::*;
