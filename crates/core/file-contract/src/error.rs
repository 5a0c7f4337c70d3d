use domain::{ChannelIdError, PointKindError};

/// 文件内容无法转换为领域类型。
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error(transparent)]
    PointKind(#[from] PointKindError),
    #[error(transparent)]
    Channel(#[from] ChannelIdError),
    #[error("channel {channel} does not belong to {list}")]
    ChannelKindMismatch { list: &'static str, channel: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
