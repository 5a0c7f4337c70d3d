use crate::AuthError;
use domain::UserCredential;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

/// 修改密码请求。
#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

/// 用户名与密码都按常量时间比较，任何一项不符都返回 false。
pub fn verify_credentials(stored: &UserCredential, username: &str, password: &str) -> bool {
    let user_ok = stored.username.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = stored.password.as_bytes().ct_eq(password.as_bytes());
    (user_ok & pass_ok).into()
}

/// 校验旧凭据并返回替换后的凭据，调用方负责写回 data.txt。
pub fn change_password(
    stored: Option<&UserCredential>,
    request: &ChangePassword,
) -> Result<UserCredential, AuthError> {
    let stored = stored.ok_or(AuthError::NotConfigured)?;
    if !verify_credentials(stored, &request.username, &request.old_password) {
        warn!(username = %request.username, "password change rejected");
        return Err(AuthError::InvalidCredentials);
    }
    validate_new_password(&request.new_password)?;
    info!(username = %stored.username, "password changed");
    Ok(UserCredential {
        username: stored.username.clone(),
        password: request.new_password.clone(),
    })
}

fn validate_new_password(password: &str) -> Result<(), AuthError> {
    if password.trim().is_empty() {
        return Err(AuthError::InvalidNewPassword("must not be empty"));
    }
    if password.trim() != password {
        return Err(AuthError::InvalidNewPassword(
            "must not start or end with whitespace",
        ));
    }
    if !hmc_codec::is_format_safe(password) {
        return Err(AuthError::InvalidNewPassword(
            "must not contain ; = [ ] < > or line breaks",
        ));
    }
    Ok(())
}
