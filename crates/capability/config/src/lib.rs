//! 运行配置加载（环境变量）。

use std::env;
use std::path::PathBuf;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 同步工具的运行模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// 设备实例 → data.txt（+ JSON 镜像）。
    Export,
    /// data.txt → JSON 镜像。
    Import,
}

/// 数据文件路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_txt: PathBuf,
    pub data_json: PathBuf,
    pub device_types: PathBuf,
    pub devices: PathBuf,
}

impl DataPaths {
    /// 以同一目录下的默认文件名构造。
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            data_txt: dir.join("data.txt"),
            data_json: dir.join("data.json"),
            device_types: dir.join("device-types.json"),
            devices: dir.join("devices.json"),
        }
    }
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: DataPaths,
    pub mirror_json: bool,
    pub sync_mode: SyncMode,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = read_optional("HMC_DATA_DIR").unwrap_or_else(|| "data".to_string());
        let defaults = DataPaths::in_dir(&data_dir);
        let paths = DataPaths {
            data_txt: read_path_with_default("HMC_DATA_TXT_PATH", defaults.data_txt),
            data_json: read_path_with_default("HMC_DATA_JSON_PATH", defaults.data_json),
            device_types: read_path_with_default("HMC_DEVICE_TYPES_PATH", defaults.device_types),
            devices: read_path_with_default("HMC_DEVICES_PATH", defaults.devices),
        };
        let mirror_json = read_bool_with_default("HMC_MIRROR_JSON", true);
        let sync_mode = read_sync_mode("HMC_SYNC_MODE")?;

        Ok(Self {
            paths,
            mirror_json,
            sync_mode,
        })
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn read_path_with_default(key: &str, default: PathBuf) -> PathBuf {
    read_optional(key).map(PathBuf::from).unwrap_or(default)
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match read_optional(key) {
        Some(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        None => default,
    }
}

fn read_sync_mode(key: &str) -> Result<SyncMode, ConfigError> {
    let value = match read_optional(key) {
        Some(value) => value,
        None => return Ok(SyncMode::Export),
    };
    match value.to_ascii_lowercase().as_str() {
        "export" => Ok(SyncMode::Export),
        "import" => Ok(SyncMode::Import),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}
