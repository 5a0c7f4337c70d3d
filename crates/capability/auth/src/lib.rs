//! 认证能力：校验 `<u>` 记录中的凭据，修改密码。
//!
//! 硬件直接读取 data.txt 中的明文密码，因此这里不做哈希，
//! 只保证比较是常量时间的。

mod password;

pub use password::{ChangePassword, change_password, verify_credentials};

/// 认证相关错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no credentials configured")]
    NotConfigured,
    #[error("invalid new password: {0}")]
    InvalidNewPassword(&'static str),
}
