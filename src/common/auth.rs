//! 请求认证辅助函数

use axum::{body::Body, http::Request};
use subtle::ConstantTimeEq;

/// 常量时间字符串比较（防止时序攻击）
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// 从 `Authorization: Bearer <token>` 头中提取 token
pub fn extract_bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("1403730359", "1403730359"));
        assert!(!constant_time_eq("1403730359", "1403730358"));
        assert!(!constant_time_eq("abc", "abcd"));
    }

    #[test]
    fn test_extract_bearer_token() {
        let request = Request::builder()
            .header("authorization", "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_bearer_token(&request).as_deref(), Some("abc.def.ghi"));

        let request = Request::builder()
            .header("authorization", "Basic Zm9vOmJhcg==")
            .body(Body::empty())
            .unwrap();
        assert!(extract_bearer_token(&request).is_none());

        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&request).is_none());
    }
}
