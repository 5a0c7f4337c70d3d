use hmc_config::{AppConfig, ConfigError, SyncMode};
use std::path::PathBuf;

// 环境变量是进程级共享状态，放在同一个测试里顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("HMC_DATA_DIR", "/var/lib/hmc");
        std::env::set_var("HMC_DATA_TXT_PATH", "/srv/hw/data.txt");
        std::env::set_var("HMC_MIRROR_JSON", "off");
        std::env::set_var("HMC_SYNC_MODE", "Import");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.paths.data_txt, PathBuf::from("/srv/hw/data.txt"));
    assert_eq!(
        config.paths.devices,
        PathBuf::from("/var/lib/hmc/devices.json")
    );
    assert!(!config.mirror_json);
    assert_eq!(config.sync_mode, SyncMode::Import);

    unsafe {
        std::env::set_var("HMC_SYNC_MODE", "replay");
    }
    let err = AppConfig::from_env().expect_err("invalid mode");
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "HMC_SYNC_MODE"));

    unsafe {
        std::env::remove_var("HMC_SYNC_MODE");
        std::env::remove_var("HMC_MIRROR_JSON");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.sync_mode, SyncMode::Export);
    assert!(config.mirror_json);
}
