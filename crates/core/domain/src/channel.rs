//! 扁平化文档中的通道标识（`DI3`、`DO0`、`AI12`）。

use std::fmt;
use std::str::FromStr;

/// 通道类别，对应文本格式中的 `<DIn>`/`<DOn>`/`<AIn>` 标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    Di,
    Do,
    Ai,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Di, ChannelKind::Do, ChannelKind::Ai];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Di => "DI",
            Self::Do => "DO",
            Self::Ai => "AI",
        }
    }

    /// 记录中承载状态/动作值的字段名。
    pub fn value_key(self) -> &'static str {
        match self {
            Self::Di | Self::Ai => "sta",
            Self::Do => "action",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "DI" => Some(Self::Di),
            "DO" => Some(Self::Do),
            "AI" => Some(Self::Ai),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// 通道标识：类别 + 非负序号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId {
    kind: ChannelKind,
    index: u32,
}

impl ChannelId {
    pub fn new(kind: ChannelKind, index: u32) -> Self {
        Self { kind, index }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.index)
    }
}

/// 通道标识解析错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdError(pub String);

impl fmt::Display for ChannelIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid channel id: {}", self.0)
    }
}

impl std::error::Error for ChannelIdError {}

impl FromStr for ChannelId {
    type Err = ChannelIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || ChannelIdError(raw.to_string());
        let (prefix, digits) = trimmed.split_at_checked(2).ok_or_else(invalid)?;
        let kind = ChannelKind::from_prefix(prefix).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        let index = digits.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(kind, index))
    }
}
