//! 内存账户存储（进程重启后丢失）

use parking_lot::RwLock;

use super::model::{AccountRecord, NewAccount};
use super::repository::AccountRepository;

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<AccountRecord>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn find_by_email(&self, email: &str) -> anyhow::Result<Option<AccountRecord>> {
        Ok(self
            .accounts
            .read()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    fn insert_if_absent(&self, account: NewAccount) -> anyhow::Result<Option<AccountRecord>> {
        // 检查与插入在同一把写锁内完成
        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.email == account.email) {
            return Ok(None);
        }

        let record = AccountRecord {
            id: accounts.len() as u64 + 1,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
        };
        accounts.push(record.clone());
        Ok(Some(record))
    }

    fn count(&self) -> anyhow::Result<usize> {
        Ok(self.accounts.read().len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Agent".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let repo = InMemoryAccountRepository::new();
        let a = repo.insert_if_absent(new_account("a@example.com")).unwrap().unwrap();
        let b = repo.insert_if_absent(new_account("b@example.com")).unwrap().unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let repo = InMemoryAccountRepository::new();
        assert!(repo.insert_if_absent(new_account("a@example.com")).unwrap().is_some());
        assert!(repo.insert_if_absent(new_account("a@example.com")).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_email_lookup_is_case_sensitive() {
        let repo = InMemoryAccountRepository::new();
        repo.insert_if_absent(new_account("Agent@example.com")).unwrap();
        assert!(repo.find_by_email("Agent@example.com").unwrap().is_some());
        assert!(repo.find_by_email("agent@example.com").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_signups_insert_once() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                std::thread::spawn(move || {
                    repo.insert_if_absent(new_account("race@example.com"))
                        .unwrap()
                        .is_some()
                })
            })
            .collect();

        let inserted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
