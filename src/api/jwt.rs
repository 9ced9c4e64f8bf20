//! 会话 JWT 管理模块
//!
//! 登录成功后签发 HS256 Token，后续请求据此识别账户

use anyhow::{Result, anyhow};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::accounts::AccountRecord;

/// JWT Claims 结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject（账户 ID）
    pub sub: String,
    pub email: String,
    pub name: String,
    /// 签发时间 (Unix timestamp)
    pub iat: usize,
    /// 过期时间 (Unix timestamp)
    pub exp: usize,
}

impl Claims {
    /// 账户 ID
    pub fn account_id(&self) -> Option<u64> {
        self.sub.parse().ok()
    }
}

/// 从配置的会话密钥派生 HMAC 密钥
fn derive_secret_key(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl JwtManager {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let key = derive_secret_key(secret);
        Self {
            encoding: EncodingKey::from_secret(&key),
            decoding: DecodingKey::from_secret(&key),
            ttl_secs,
        }
    }

    /// 为账户签发 Token
    ///
    /// # Returns
    /// * `Ok((token, expires_in))` - JWT Token 字符串和过期秒数
    pub fn generate_token(&self, account: &AccountRecord) -> Result<(String, u64)> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs();

        let claims = Claims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            iat: now as usize,
            exp: now.saturating_add(self.ttl_secs) as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok((token, self.ttl_secs))
    }

    /// 验证 Token（过期、签名错误均失败）
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow!("Invalid token: {}", e))?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AccountRecord {
        AccountRecord {
            id: 7,
            name: "Riley".to_string(),
            email: "riley@example.com".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let jwt = JwtManager::new("test-session-secret", 3600);
        let (token, expires_in) = jwt.generate_token(&account()).unwrap();
        assert!(!token.is_empty());
        assert_eq!(expires_in, 3600);

        let claims = jwt.verify_token(&token).unwrap();
        assert_eq!(claims.account_id(), Some(7));
        assert_eq!(claims.email, "riley@example.com");
        assert_eq!(claims.name, "Riley");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_token_with_wrong_secret() {
        let (token, _) = JwtManager::new("secret-a", 3600)
            .generate_token(&account())
            .unwrap();
        assert!(JwtManager::new("secret-b", 3600).verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        let jwt = JwtManager::new("test-session-secret", 3600);
        let claims = Claims {
            sub: "1".to_string(),
            email: "demo@example.com".to_string(),
            name: "Demo User".to_string(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(&Header::default(), &claims, &jwt.encoding).unwrap();
        assert!(jwt.verify_token(&token).is_err());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let jwt = JwtManager::new("test-session-secret", u64::MAX);
        let (token, expires_in) = jwt.generate_token(&account()).unwrap();
        assert_eq!(expires_in, u64::MAX);

        let claims = jwt.verify_token(&token).unwrap();
        assert_eq!(claims.exp as u64, u64::MAX);
    }

    #[test]
    fn test_verify_invalid_token() {
        let jwt = JwtManager::new("test-session-secret", 3600);
        assert!(jwt.verify_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_derive_secret_key_consistency() {
        assert_eq!(derive_secret_key("k"), derive_secret_key("k"));
        assert_eq!(derive_secret_key("k").len(), 32);
    }
}
