//! 密码哈希
//!
//! 新账户使用 bcrypt。旧版演示数据使用 32 位滚动摘要，
//! 仅为兼容保留，不具备任何安全性。

use crate::common::auth::constant_time_eq;
use crate::model::config::PasswordScheme;

/// 旧版滚动摘要：`h = h * 31 + c`（按 UTF-16 码元，i32 回绕），十进制输出
pub fn legacy_digest(password: &str) -> String {
    password
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32)
        })
        .to_string()
}

/// bcrypt 只读取密码前 72 字节，超出部分会被静默忽略
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

fn is_bcrypt_hash(stored: &str) -> bool {
    stored.starts_with("$2")
}

/// 密码哈希器
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    scheme: PasswordScheme,
    cost: u32,
}

impl PasswordHasher {
    pub fn new(scheme: PasswordScheme, cost: u32) -> Self {
        Self { scheme, cost }
    }

    /// 当前方案能否完整保存该密码
    pub fn accepts(&self, password: &str) -> bool {
        match self.scheme {
            PasswordScheme::Bcrypt => password.len() <= BCRYPT_MAX_PASSWORD_BYTES,
            PasswordScheme::Legacy => true,
        }
    }

    /// 按配置的方案生成存储用哈希
    pub fn hash(&self, password: &str) -> anyhow::Result<String> {
        match self.scheme {
            PasswordScheme::Bcrypt => {
                anyhow::ensure!(
                    self.accepts(password),
                    "密码超过 bcrypt 上限 {} 字节",
                    BCRYPT_MAX_PASSWORD_BYTES
                );
                Ok(bcrypt::hash(password, self.cost)?)
            }
            PasswordScheme::Legacy => Ok(legacy_digest(password)),
        }
    }

    /// 校验密码，方案由存储的哈希格式决定
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        if is_bcrypt_hash(stored) {
            // 超长密码的前缀可能与已存储的密码相同
            if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
                return false;
            }
            match bcrypt::verify(password, stored) {
                Ok(ok) => ok,
                Err(e) => {
                    tracing::warn!("bcrypt 校验失败: {}", e);
                    false
                }
            }
        } else {
            constant_time_eq(&legacy_digest(password), stored)
        }
    }
}
