//! 账户存储抽象

use super::model::{AccountRecord, NewAccount};

/// 账户存储
///
/// 实现方必须保证 `insert_if_absent` 的检查与插入是原子的
pub trait AccountRepository: Send + Sync {
    /// 按邮箱精确查找
    fn find_by_email(&self, email: &str) -> anyhow::Result<Option<AccountRecord>>;

    /// 邮箱不存在时插入并返回新记录，已存在时返回 `None`
    fn insert_if_absent(&self, account: NewAccount) -> anyhow::Result<Option<AccountRecord>>;

    /// 账户总数
    fn count(&self) -> anyhow::Result<usize>;
}
