//! 第二阶段：把分类后的行组装为 [`DataJsonDocument`]。
//!
//! 任意一行失败只记录到 `skipped` 并打印 warning，其余行继续解析。

use crate::error::LineError;
use crate::lexer::{Line, Record, lex_line};
use domain::{
    ChannelId, ChannelRecord, DataJsonDocument, DeviceSummary, NetworkConfig, UserCredential,
};
use tracing::{debug, warn};

/// 被跳过的行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 从 1 开始的物理行号。
    pub line_no: usize,
    pub content: String,
    pub reason: LineError,
}

/// 解析结果：尽力而为的文档 + 被跳过的行。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub document: DataJsonDocument,
    pub parsed_lines: usize,
    pub skipped: Vec<SkippedLine>,
}

impl ParseReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// 解析整段文本。
pub fn parse_str(input: &str) -> ParseReport {
    let mut assembler = Assembler::default();
    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match assembler.accept(line) {
            Ok(()) => {
                assembler.report.parsed_lines += 1;
                hmc_telemetry::record_line_parsed();
            }
            Err(reason) => {
                warn!(
                    target: "hmc.codec",
                    line = index + 1,
                    content = line,
                    reason = %reason,
                    "line skipped"
                );
                hmc_telemetry::record_line_skipped();
                assembler.report.skipped.push(SkippedLine {
                    line_no: index + 1,
                    content: line.to_string(),
                    reason,
                });
            }
        }
    }
    if assembler.in_device_section {
        warn!(target: "hmc.codec", "device section not terminated at end of input");
    }
    assembler.report
}

#[derive(Default)]
struct Assembler {
    report: ParseReport,
    in_device_section: bool,
}

impl Assembler {
    fn accept(&mut self, line: &str) -> Result<(), LineError> {
        let lexed = lex_line(line)?;
        if self.in_device_section && !lexed.is_device_line() {
            warn!(target: "hmc.codec", content = line, "device section closed implicitly");
            self.in_device_section = false;
        }
        match lexed {
            Line::User(record) => {
                let user = assemble_user(&record)?;
                if self.report.document.user.is_some() {
                    warn!(target: "hmc.codec", "duplicate <u> record, last one wins");
                }
                self.report.document.user = Some(user);
            }
            Line::Network(record) => {
                self.report.document.network = Some(assemble_network(&record));
            }
            Line::Devices { records, closed } => {
                // 开段状态先于记录组装生效，坏记录只影响本行。
                self.in_device_section = !closed;
                self.push_devices(&records)?;
            }
            Line::Bare { records, closes } => {
                if !self.in_device_section {
                    return Err(LineError::OutsideDeviceSection);
                }
                self.push_devices(&records)?;
                if closes {
                    self.in_device_section = false;
                }
            }
            Line::DeviceSectionEnd => {
                if !self.in_device_section {
                    return Err(LineError::OutsideDeviceSection);
                }
                self.in_device_section = false;
            }
            Line::Channel { channel, record } => {
                let record = assemble_channel(channel, &record)?;
                self.report.document.push_channel(record);
            }
        }
        Ok(())
    }

    /// 同一行的设备记录全部组装成功才写入文档。
    fn push_devices(&mut self, records: &[Record]) -> Result<(), LineError> {
        let devices = records
            .iter()
            .map(assemble_device)
            .collect::<Result<Vec<_>, _>>()?;
        self.report.document.devices.extend(devices);
        Ok(())
    }
}

fn assemble_user(record: &Record) -> Result<UserCredential, LineError> {
    let username = record
        .text("username")
        .ok_or(LineError::MissingField("username"))?;
    let password = record
        .text("password")
        .or_else(|| record.text("pass"))
        .ok_or(LineError::MissingField("password"))?;
    Ok(UserCredential { username, password })
}

fn assemble_network(record: &Record) -> NetworkConfig {
    NetworkConfig {
        mac: record.text("mac").unwrap_or_default(),
        ip: record.text("ip").unwrap_or_default(),
        mask: record.text("mask").unwrap_or_default(),
        gateway: record
            .text("gw")
            .or_else(|| record.text("gateway"))
            .unwrap_or_default(),
    }
}

fn assemble_device(record: &Record) -> Result<DeviceSummary, LineError> {
    let name = record
        .text("name")
        .filter(|name| !name.is_empty())
        .ok_or(LineError::MissingField("name"))?;
    let ai_num = read_count(record, "AINum")? + read_count(record, "AONum")?;
    Ok(DeviceSummary {
        name,
        device_type: record.text("type").unwrap_or_default(),
        di_num: read_count(record, "DINum")?,
        do_num: read_count(record, "DONum")?,
        ai_num,
        conaddr: record.value("conaddr"),
        retadd: record.value("retadd"),
    })
}

/// 缺省为 0；存在时必须是非负整数。
fn read_count(record: &Record, key: &'static str) -> Result<u32, LineError> {
    let Some(field) = record.get(key) else {
        return Ok(0);
    };
    let invalid = || LineError::InvalidNumber(key, field.raw.clone());
    let number = field.value().as_number().ok_or_else(invalid)?;
    if number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(invalid());
    }
    Ok(number as u32)
}

fn assemble_channel(channel: ChannelId, record: &Record) -> Result<ChannelRecord, LineError> {
    let dev = record
        .text("dev")
        .filter(|dev| !dev.is_empty())
        .ok_or(LineError::MissingField("dev"))?;
    let value_key = channel.kind().value_key();
    for key in record.keys() {
        if !matches!(key, "dev" | "bit") && key != value_key {
            debug!(target: "hmc.codec", %channel, key, "unknown channel field ignored");
        }
    }
    Ok(ChannelRecord {
        channel,
        dev,
        value: record.value(value_key),
        bit: record.value("bit"),
    })
}
