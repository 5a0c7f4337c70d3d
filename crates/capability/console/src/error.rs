use file_contract::ContractError;
use hmc_auth::AuthError;
use hmc_codec::{CodecError, SkippedLine};
use hmc_storage::StorageError;
use std::path::PathBuf;

/// 输入校验失败。任何写操作之前完成校验，失败时不会写文件。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must not contain ; = [ ] < > or line breaks")]
    FormatUnsafe { field: &'static str },
    #[error("invalid mac address: {0}")]
    InvalidMac(String),
    #[error("invalid {field}: {value}")]
    InvalidIpv4 { field: &'static str, value: String },
    #[error("{kind} name already exists: {name}")]
    DuplicateName { kind: &'static str, name: String },
    #[error("channel {0} is not a digital input")]
    NotDigitalInput(String),
    #[error("channel {0} already exists")]
    DuplicateChannel(String),
    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// data.txt 中有无法解析的行；整体写回会丢失它们，因此拒绝修改。
    #[error("{path} has {} unparsed line(s), fix them before editing", skipped.len())]
    UnparsedLines {
        path: PathBuf,
        skipped: Vec<SkippedLine>,
    },
    #[error("failed to write json mirror {path}: {source}")]
    Mirror {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConsoleError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
