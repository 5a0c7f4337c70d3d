//! data.txt 同步工具：按 `HMC_SYNC_MODE` 执行一次导出或导入。

use hmc_config::{AppConfig, SyncMode};
use hmc_console::ConsoleService;
use hmc_telemetry::{init_tracing, metrics};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let console = ConsoleService::from_config(&config);
    match config.sync_mode {
        // 设备实例 + 设备类型 → data.txt（+ data.json）
        SyncMode::Export => {
            let report = console.regenerate().await?;
            info!(
                path = %config.paths.data_txt.display(),
                devices = report.document.devices.len(),
                skipped = report.skipped.len(),
                "export finished"
            );
        }
        // data.txt → data.json
        SyncMode::Import => {
            let report = console.import_text_to_mirror().await?;
            info!(
                path = %config.paths.data_json.display(),
                parsed = report.parsed_lines,
                skipped = report.skipped_count(),
                "import finished"
            );
        }
    }

    let snapshot = metrics().snapshot();
    info!(
        lines_parsed = snapshot.lines_parsed,
        lines_skipped = snapshot.lines_skipped,
        devices_exported = snapshot.devices_exported,
        devices_skipped = snapshot.devices_skipped,
        documents_written = snapshot.documents_written,
        "sync metrics"
    );
    Ok(())
}
