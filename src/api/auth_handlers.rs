//! 认证相关处理器
//!
//! 提供注册、登录、登出和当前会话查询端点

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::{
    error::ApiError,
    jwt::Claims,
    middleware::{AppState, SESSION_COOKIE_NAME},
    types::{LoginRequest, LoginResponse, MessageResponse, SignupRequest, UserProfile, provided},
};

/// 在阻塞线程池中执行账户操作（bcrypt 计算较慢）
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(anyhow::anyhow!("账户任务异常退出: {}", e)))?
}

fn session_cookie(token: String, ttl_secs: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX)))
        .build()
}

fn bad_body(rejection: JsonRejection) -> Response {
    tracing::debug!("请求体解析失败: {}", rejection);
    let e = ApiError::BadRequest("Invalid request body".to_string());
    (e.status_code(), Json(e.into_response())).into_response()
}

/// POST /api/auth/signup
///
/// 创建账户，邮箱已存在时返回 409
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_body(rejection),
    };

    let (Some(name), Some(email), Some(password)) = (
        provided(&payload.name),
        provided(&payload.email),
        provided(&payload.password),
    ) else {
        let e = ApiError::BadRequest("All fields are required".to_string());
        return (e.status_code(), Json(e.into_response())).into_response();
    };

    let (name, email, password) = (name.to_string(), email.to_string(), password.to_string());
    let directory = state.directory.clone();
    let result = run_blocking(move || Ok(directory.create(&name, &email, &password)?)).await;

    match result {
        Ok(account) => {
            tracing::info!("新账户注册: #{}", account.id);
            (
                StatusCode::CREATED,
                Json(MessageResponse::new("User created successfully")),
            )
                .into_response()
        }
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// POST /api/auth/login
///
/// 校验邮箱与密码，签发会话 Token（响应体 + HttpOnly Cookie）
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_body(rejection),
    };

    let (Some(email), Some(password)) = (provided(&payload.email), provided(&payload.password))
    else {
        let e = ApiError::BadRequest("Email and password are required".to_string());
        return (e.status_code(), Json(e.into_response())).into_response();
    };

    let (email, password) = (email.to_string(), password.to_string());
    let directory = state.directory.clone();
    let account = match run_blocking(move || Ok(directory.authenticate(&email, &password)?)).await
    {
        Ok(account) => account,
        Err(e) => {
            if matches!(e, ApiError::Unauthorized(_)) {
                tracing::info!("登录失败：邮箱或密码错误");
            }
            return (e.status_code(), Json(e.into_response())).into_response();
        }
    };

    let (token, expires_in) = match state.sessions.generate_token(&account) {
        Ok(t) => t,
        Err(e) => {
            let e = ApiError::internal(e.context("生成会话 Token 失败"));
            return (e.status_code(), Json(e.into_response())).into_response();
        }
    };

    tracing::info!("账户 #{} 登录成功", account.id);
    let jar = jar.add(session_cookie(token.clone(), expires_in));
    (
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: UserProfile::from(&account),
            token,
            expires_in,
        }),
    )
        .into_response()
}

/// POST /api/auth/logout
///
/// 清除会话 Cookie（JWT 无服务端状态，已签发的 Token 在过期前仍有效）
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    (jar, Json(MessageResponse::new("Logout successful")))
}

/// GET /api/auth/me
///
/// 返回当前会话对应的账户（以账户目录中的记录为准）
pub async fn me(State(state): State<AppState>, Extension(claims): Extension<Claims>) -> Response {
    let directory = state.directory.clone();
    let email = claims.email.clone();
    let result = run_blocking(move || Ok(directory.lookup_by_email(&email)?)).await;

    match result {
        Ok(Some(account)) if Some(account.id) == claims.account_id() => {
            Json(UserProfile::from(&account)).into_response()
        }
        Ok(_) => {
            let e = ApiError::Unauthorized("Unauthorized".to_string());
            (e.status_code(), Json(e.into_response())).into_response()
        }
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".to_string(), 3600);
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn test_session_cookie_clamps_huge_ttl() {
        let cookie = session_cookie("token".to_string(), u64::MAX);
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(i64::MAX)));
    }
}
