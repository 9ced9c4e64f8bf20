//! API 错误类型

use std::fmt;

use axum::http::StatusCode;

use crate::accounts::DirectoryError;

use super::types::ErrorResponse;

/// 通用内部错误消息（不向客户端暴露原因）
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    /// 请求缺少字段或格式错误
    BadRequest(String),
    /// 未登录或凭据错误
    Unauthorized(String),
    /// 资源冲突（邮箱已注册）
    Conflict(String),
    /// 上游拉取或解析失败，`message` 为对外消息
    Upstream {
        message: &'static str,
        source: anyhow::Error,
    },
    /// 其他内部错误
    Internal(anyhow::Error),
}

impl ApiError {
    /// 上游失败：记录原因，对外只返回通用消息
    pub fn upstream(message: &'static str, source: anyhow::Error) -> Self {
        tracing::error!("{}: {:#}", message, source);
        ApiError::Upstream { message, source }
    }

    pub fn internal(source: anyhow::Error) -> Self {
        tracing::error!("内部错误: {:#}", source);
        ApiError::Internal(source)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn into_response(self) -> ErrorResponse {
        match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::Conflict(msg) => {
                ErrorResponse::new(msg)
            }
            ApiError::Upstream { message, .. } => ErrorResponse::new(message),
            ApiError::Internal(_) => ErrorResponse::new(INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::Conflict(msg) => {
                write!(f, "{}", msg)
            }
            ApiError::Upstream { message, source } => write!(f, "{}: {}", message, source),
            ApiError::Internal(e) => write!(f, "{}", e),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::EmailTaken => ApiError::Conflict(e.to_string()),
            DirectoryError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            DirectoryError::PasswordTooLong => ApiError::BadRequest(e.to_string()),
            DirectoryError::Internal(source) => ApiError::internal(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_errors_map_to_status() {
        assert_eq!(
            ApiError::from(DirectoryError::EmailTaken).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(DirectoryError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );

        let err = ApiError::from(DirectoryError::PasswordTooLong);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().error, "Password must be at most 72 bytes");
    }

    #[test]
    fn test_bad_request_keeps_message() {
        let err = ApiError::BadRequest("All fields are required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().error, "All fields are required");
    }

    #[test]
    fn test_upstream_error_hides_cause() {
        let err = ApiError::upstream(
            "Failed to fetch call logs",
            anyhow::anyhow!("connection refused to 10.0.0.1"),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().error, "Failed to fetch call logs");
    }

    #[test]
    fn test_internal_error_message_is_generic() {
        let err = ApiError::from(DirectoryError::Internal(anyhow::anyhow!("disk I/O error")));
        assert_eq!(err.into_response().error, INTERNAL_ERROR_MESSAGE);
    }
}
