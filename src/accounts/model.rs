//! 账户数据模型

/// 已存储的账户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// 从 1 开始单调递增
    pub id: u64,
    pub name: String,
    /// 精确匹配（区分大小写）的查找键
    pub email: String,
    pub password_hash: String,
}

/// 待插入的账户（id 由存储层分配）
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
