//! 账户目录模块
//!
//! Input: 邮箱、密码
//! Output: 账户记录
//! Pos: 登录 / 注册所用的账户存储与校验
//!
//! # 功能
//! - 可替换的存储后端（内存 / SQLite）
//! - bcrypt 密码哈希，兼容旧版滚动摘要
//! - 邮箱唯一性由存储层原子保证

mod directory;
mod error;
mod memory;
pub mod model;
pub mod password;
mod repository;
mod sqlite;

pub use directory::AccountDirectory;
pub use error::DirectoryError;
pub use memory::InMemoryAccountRepository;
pub use model::AccountRecord;
pub use password::PasswordHasher;
pub use repository::AccountRepository;
pub use sqlite::SqliteAccountRepository;
