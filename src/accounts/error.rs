//! 账户目录错误类型

use std::fmt;

use super::password::BCRYPT_MAX_PASSWORD_BYTES;

#[derive(Debug)]
pub enum DirectoryError {
    /// 邮箱已被注册
    EmailTaken,
    /// 邮箱或密码不匹配
    InvalidCredentials,
    /// 密码超出哈希方案可保存的长度
    PasswordTooLong,
    /// 存储或哈希失败
    Internal(anyhow::Error),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::EmailTaken => write!(f, "User already exists with this email"),
            DirectoryError::InvalidCredentials => write!(f, "Invalid email or password"),
            DirectoryError::PasswordTooLong => write!(
                f,
                "Password must be at most {} bytes",
                BCRYPT_MAX_PASSWORD_BYTES
            ),
            DirectoryError::Internal(e) => write!(f, "账户目录内部错误: {}", e),
        }
    }
}

impl std::error::Error for DirectoryError {}

impl From<anyhow::Error> for DirectoryError {
    fn from(e: anyhow::Error) -> Self {
        DirectoryError::Internal(e)
    }
}
