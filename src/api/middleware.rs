//! API 共享状态与中间件

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::CookieJar;

use crate::accounts::AccountDirectory;
use crate::common::auth;
use crate::dataset::ReportService;

use super::jwt::JwtManager;
use super::types::ErrorResponse;

/// 会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "callboard_session";

/// API 共享状态
#[derive(Clone)]
pub struct AppState {
    /// 报表服务
    pub reports: Arc<ReportService>,
    /// 账户目录
    pub directory: Arc<AccountDirectory>,
    /// 会话 JWT 管理器
    pub sessions: JwtManager,
}

impl AppState {
    pub fn new(reports: ReportService, directory: AccountDirectory, sessions: JwtManager) -> Self {
        Self {
            reports: Arc::new(reports),
            directory: Arc::new(directory),
            sessions,
        }
    }
}

/// 从请求中提取会话 token，Cookie 优先
fn extract_token(jar: &CookieJar, request: &Request<Body>) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    auth::extract_bearer_token(request)
}

/// 会话认证中间件
///
/// 验证通过后将 `Claims` 注入请求扩展
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let claims = extract_token(&jar, &request).and_then(|token| {
        state
            .sessions
            .verify_token(&token)
            .inspect_err(|e| tracing::debug!("会话校验失败: {}", e))
            .ok()
    });

    match claims {
        Some(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        None => (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Unauthorized"))).into_response(),
    }
}

/// CORS 中间件层
///
/// 允许任何来源，凭据通过 Bearer 头传递；Cookie 会话仅用于同源页面
pub fn cors_layer() -> tower_http::cors::CorsLayer {
    use tower_http::cors::{Any, CorsLayer};

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
