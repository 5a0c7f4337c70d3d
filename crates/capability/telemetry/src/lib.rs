//! 日志初始化与编解码/导出计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_parsed: u64,
    pub lines_skipped: u64,
    pub devices_exported: u64,
    pub devices_skipped: u64,
    pub documents_written: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    lines_parsed: AtomicU64,
    lines_skipped: AtomicU64,
    devices_exported: AtomicU64,
    devices_skipped: AtomicU64,
    documents_written: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            lines_parsed: AtomicU64::new(0),
            lines_skipped: AtomicU64::new(0),
            devices_exported: AtomicU64::new(0),
            devices_skipped: AtomicU64::new(0),
            documents_written: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_parsed: self.lines_parsed.load(Ordering::Relaxed),
            lines_skipped: self.lines_skipped.load(Ordering::Relaxed),
            devices_exported: self.devices_exported.load(Ordering::Relaxed),
            devices_skipped: self.devices_skipped.load(Ordering::Relaxed),
            documents_written: self.documents_written.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info，`RUST_LOG` 覆盖）。重复调用无副作用。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 记录成功解析的行。
pub fn record_line_parsed() {
    metrics().lines_parsed.fetch_add(1, Ordering::Relaxed);
}

/// 记录被跳过的行。
pub fn record_line_skipped() {
    metrics().lines_skipped.fetch_add(1, Ordering::Relaxed);
}

pub fn record_device_exported() {
    metrics().devices_exported.fetch_add(1, Ordering::Relaxed);
}

/// 记录因缺少设备类型而跳过的设备。
pub fn record_device_skipped() {
    metrics().devices_skipped.fetch_add(1, Ordering::Relaxed);
}

/// 记录 data.txt 写入次数。
pub fn record_document_written() {
    metrics().documents_written.fetch_add(1, Ordering::Relaxed);
}
