//! # 控制台业务层
//!
//! 被排除在外的 HTTP 层会调用的操作集合。每个变更都遵循读-改-写：
//! 先校验输入，再读取整个文件、修改、整体写回；设备相关变更之后
//! 同步重新生成 data.txt（以及可选的 JSON 镜像）。

mod device_types;
mod devices;
mod digital_inputs;
mod error;
mod service;
pub mod validation;

pub use device_types::{DeviceTypeInput, NewDeviceType};
pub use devices::{DeviceUpdate, NewDevice};
pub use error::{ConsoleError, ValidationError};
pub use service::ConsoleService;
