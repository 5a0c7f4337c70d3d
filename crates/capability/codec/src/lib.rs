//! # data.txt 编解码
//!
//! data.txt 是交给硬件读取的配置产物，格式为逐行的标签记录：
//!
//! ```text
//! <u>[username=admin;password=123456;]</u>
//! <net>[mac=00:11:22:33:44:55;ip=192.168.1.10;mask=255.255.255.0;gw=192.168.1.1;]</net>
//! <dev>[name=pump-1;type=PUMP;DINum=2;DONum=1;AINum=0;conaddr=1;retadd=2;]</dev>
//! <DI0>[dev=pump-1;sta=0;]</DI0>
//! <DO0>[dev=pump-1;action=1;]</DO0>
//! ```
//!
//! 设备记录也可以写成多行块：单独一行 `<dev>` 开始、单独一行 `</dev>` 结束，
//! 中间每行若干 `[...]`。
//!
//! 解析分两阶段：[`lexer`] 把每行分类并切分字段，[`parser`] 按设备段状态组装文档。
//! 单行错误只跳过该行（见 [`ParseReport::skipped`]）；文件不可读才是致命错误。

pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;

pub use error::{CodecError, LineError};
pub use parser::{ParseReport, SkippedLine, parse_str};
pub use serializer::{RESERVED_CHARS, channel_line, is_format_safe, serialize};

use domain::DataJsonDocument;
use std::path::Path;
use tracing::info;

/// 读取并解析 data.txt。
pub async fn parse_file(path: impl AsRef<Path>) -> Result<ParseReport, CodecError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CodecError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let report = parse_str(&content);
    info!(
        target: "hmc.codec",
        path = %path.display(),
        parsed = report.parsed_lines,
        skipped = report.skipped_count(),
        "data file parsed"
    );
    Ok(report)
}

/// 序列化并整体写入 data.txt（必要时创建父目录）。
pub async fn write_file(doc: &DataJsonDocument, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let write_error = |source| CodecError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    tokio::fs::write(path, serialize(doc))
        .await
        .map_err(write_error)?;
    hmc_telemetry::record_document_written();
    info!(target: "hmc.codec", path = %path.display(), "data file written");
    Ok(())
}
