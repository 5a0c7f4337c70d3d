//! 编解码错误类型

use std::path::PathBuf;

/// 致命错误：源文件不可读或目标文件不可写。
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 单行解析失败。只会出现在 `ParseReport::skipped` 中，不会中断整个文件的解析。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("missing '=' in segment: {0}")]
    MissingEquals(String),
    #[error("empty key in segment: {0}")]
    EmptyKey(String),
    #[error("unbalanced brackets")]
    UnbalancedBracket,
    #[error("unexpected text outside brackets: {0}")]
    UnexpectedText(String),
    #[error("missing closing tag </{0}>")]
    UnmatchedTag(String),
    #[error("unknown tag <{0}>")]
    UnknownTag(String),
    #[error("line is not a tagged record")]
    Untagged,
    #[error("expected exactly one record, found {0}")]
    RecordCount(usize),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("device record outside <dev> section")]
    OutsideDeviceSection,
}
