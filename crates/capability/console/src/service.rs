use crate::error::ConsoleError;
use crate::validation::validate_network;
use domain::{DataJsonDocument, NetworkConfig};
use hmc_auth::{ChangePassword, verify_credentials};
use hmc_codec::{CodecError, ParseReport};
use hmc_config::{AppConfig, DataPaths};
use hmc_merge::{ExportReport, export_flattened_document};
use hmc_storage::{
    DeviceInstanceStore, DeviceTypeStore, JsonDeviceInstanceStore, JsonDeviceTypeStore,
};
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::{info, warn};

/// 控制台服务（基于两个存储 + data.txt 路径）。
#[derive(Clone)]
pub struct ConsoleService {
    pub(crate) types: Arc<dyn DeviceTypeStore>,
    pub(crate) devices: Arc<dyn DeviceInstanceStore>,
    paths: DataPaths,
    mirror_json: bool,
}

impl ConsoleService {
    pub fn new(
        types: Arc<dyn DeviceTypeStore>,
        devices: Arc<dyn DeviceInstanceStore>,
        paths: DataPaths,
        mirror_json: bool,
    ) -> Self {
        Self {
            types,
            devices,
            paths,
            mirror_json,
        }
    }

    /// 使用配置中的 JSON 文件存储。
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(JsonDeviceTypeStore::new(&config.paths.device_types)),
            Arc::new(JsonDeviceInstanceStore::new(&config.paths.devices)),
            config.paths.clone(),
            config.mirror_json,
        )
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// 读取当前 data.txt（尽力而为，被跳过的行只记日志）；文件尚不存在时返回空文档。
    pub async fn load_document(&self) -> Result<DataJsonDocument, ConsoleError> {
        let report = self.read_report().await?;
        for skipped in &report.skipped {
            warn!(
                target: "hmc.console",
                line = skipped.line_no,
                reason = %skipped.reason,
                "skipped unparsed data file line"
            );
        }
        Ok(report.document)
    }

    /// 读-改-写之前读取 data.txt。存在无法解析的行时拒绝继续，
    /// 否则整体写回会丢掉这些行。
    pub(crate) async fn load_for_update(&self) -> Result<DataJsonDocument, ConsoleError> {
        let report = self.read_report().await?;
        if !report.is_clean() {
            warn!(
                target: "hmc.console",
                path = %self.paths.data_txt.display(),
                skipped = report.skipped_count(),
                "data file has unparsed lines, update refused"
            );
            return Err(ConsoleError::UnparsedLines {
                path: self.paths.data_txt.clone(),
                skipped: report.skipped,
            });
        }
        Ok(report.document)
    }

    async fn read_report(&self) -> Result<ParseReport, ConsoleError> {
        match hmc_codec::parse_file(&self.paths.data_txt).await {
            Ok(report) => Ok(report),
            Err(CodecError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(ParseReport::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 写 data.txt，开启镜像时随后写 data.json。
    pub(crate) async fn store_document(&self, doc: &DataJsonDocument) -> Result<(), ConsoleError> {
        hmc_codec::write_file(doc, &self.paths.data_txt).await?;
        if self.mirror_json {
            self.write_mirror(doc).await?;
        }
        Ok(())
    }

    async fn write_mirror(&self, doc: &DataJsonDocument) -> Result<(), ConsoleError> {
        let path = &self.paths.data_json;
        let mirror_error = |source| ConsoleError::Mirror {
            path: path.clone(),
            source,
        };
        let body = file_contract::document_to_json(doc)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(mirror_error)?;
        }
        tokio::fs::write(path, body).await.map_err(mirror_error)?;
        info!(target: "hmc.console", path = %path.display(), "json mirror written");
        Ok(())
    }

    /// 由设备类型与实例整体重新生成 data.txt。
    ///
    /// user/network 保留现有 data.txt 中的值；其余块全部重建。
    pub async fn regenerate(&self) -> Result<ExportReport, ConsoleError> {
        let templates = self.types.list_device_types().await?;
        let instances = self.devices.list_devices().await?;
        let current = self.load_for_update().await?;

        let mut report = export_flattened_document(&templates, &instances);
        report.document.user = current.user;
        report.document.network = current.network;
        self.store_document(&report.document).await?;
        if !report.skipped.is_empty() {
            warn!(
                target: "hmc.console",
                skipped = report.skipped.len(),
                "devices skipped during regeneration"
            );
        }
        info!(
            target: "hmc.console",
            devices = report.document.devices.len(),
            "data file regenerated"
        );
        Ok(report)
    }

    /// 引导导入：解析 data.txt 并写出 JSON 镜像（与镜像开关无关）。
    pub async fn import_text_to_mirror(&self) -> Result<ParseReport, ConsoleError> {
        let report = hmc_codec::parse_file(&self.paths.data_txt).await?;
        self.write_mirror(&report.document).await?;
        info!(
            target: "hmc.console",
            parsed = report.parsed_lines,
            skipped = report.skipped_count(),
            "data file imported"
        );
        Ok(report)
    }

    /// 整体替换网络配置。
    pub async fn save_network(&self, network: NetworkConfig) -> Result<NetworkConfig, ConsoleError> {
        let network = validate_network(&network)?;
        let mut doc = self.load_for_update().await?;
        doc.network = Some(network.clone());
        self.store_document(&doc).await?;
        info!(target: "hmc.console", ip = %network.ip, "network saved");
        Ok(network)
    }

    pub async fn verify_login(&self, username: &str, password: &str) -> Result<bool, ConsoleError> {
        let doc = self.load_document().await?;
        Ok(doc
            .user
            .as_ref()
            .is_some_and(|user| verify_credentials(user, username, password)))
    }

    pub async fn change_password(&self, request: ChangePassword) -> Result<(), ConsoleError> {
        let mut doc = self.load_for_update().await?;
        let user = hmc_auth::change_password(doc.user.as_ref(), &request)?;
        doc.user = Some(user);
        self.store_document(&doc).await
    }
}
