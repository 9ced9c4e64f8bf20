//! SQLite 账户存储

use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};

use super::model::{AccountRecord, NewAccount};
use super::repository::AccountRepository;

pub struct SqliteAccountRepository {
    conn: Mutex<Connection>,
}

impl SqliteAccountRepository {
    /// 打开（或创建）数据库文件，`:memory:` 为内存库
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS auth_users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );",
        )?;
        tracing::info!("账户数据库已打开: {}", db_path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountRecord> {
        Ok(AccountRecord {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
        })
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                "SELECT id, name, email, password_hash FROM auth_users WHERE email = ?1",
                [email],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn insert_if_absent(&self, account: NewAccount) -> Result<Option<AccountRecord>> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT INTO auth_users (name, email, password_hash) VALUES (?1, ?2, ?3)
             ON CONFLICT(email) DO NOTHING",
            rusqlite::params![account.name, account.email, account.password_hash],
        )?;
        if inserted == 0 {
            return Ok(None);
        }

        Ok(Some(AccountRecord {
            id: conn.last_insert_rowid() as u64,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
        }))
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM auth_users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
