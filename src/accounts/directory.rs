//! 账户目录服务

use std::sync::Arc;

use super::error::DirectoryError;
use super::model::{AccountRecord, NewAccount};
use super::password::PasswordHasher;
use super::repository::AccountRepository;

/// 演示账户
pub const DEMO_NAME: &str = "Demo User";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

/// 账户目录
///
/// 所有方法均为同步阻塞调用（bcrypt 较慢），异步上下文中应放入 `spawn_blocking`
pub struct AccountDirectory {
    repo: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
}

impl AccountDirectory {
    pub fn new(repo: Arc<dyn AccountRepository>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    /// 写入演示账户（已存在时跳过）
    pub fn seed_demo_account(&self) -> Result<(), DirectoryError> {
        match self.create(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD) {
            Ok(record) => {
                tracing::info!("已创建演示账户 #{}: {}", record.id, record.email);
                Ok(())
            }
            Err(DirectoryError::EmailTaken) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// 按邮箱精确查找
    pub fn lookup_by_email(&self, email: &str) -> Result<Option<AccountRecord>, DirectoryError> {
        Ok(self.repo.find_by_email(email)?)
    }

    /// 创建账户，邮箱已存在时返回 `EmailTaken`，
    /// 密码超出 bcrypt 长度上限时返回 `PasswordTooLong`
    pub fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, DirectoryError> {
        if self.repo.find_by_email(email)?.is_some() {
            return Err(DirectoryError::EmailTaken);
        }
        if !self.hasher.accepts(password) {
            return Err(DirectoryError::PasswordTooLong);
        }

        let password_hash = self.hasher.hash(password)?;
        let record = self
            .repo
            .insert_if_absent(NewAccount {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })?
            .ok_or(DirectoryError::EmailTaken)?;

        tracing::debug!("账户 #{} 已创建", record.id);
        Ok(record)
    }

    /// 校验邮箱与密码，均匹配时返回账户
    pub fn authenticate(&self, email: &str, password: &str) -> Result<AccountRecord, DirectoryError> {
        let account = self
            .repo
            .find_by_email(email)?
            .ok_or(DirectoryError::InvalidCredentials)?;

        if self.hasher.verify(password, &account.password_hash) {
            Ok(account)
        } else {
            Err(DirectoryError::InvalidCredentials)
        }
    }

    /// 账户总数
    pub fn count(&self) -> Result<usize, DirectoryError> {
        Ok(self.repo.count()?)
    }
}
