//! API 路由配置

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::{
    auth_handlers::{login, logout, me, signup},
    handlers::{
        export_call_logs, export_ordered_calls, export_user_analytics, get_analytics,
        get_analytics_summary, get_call_logs, get_dashboard_stats, health,
    },
    middleware::{AppState, session_auth_middleware},
};

/// 创建应用路由
///
/// # 端点
/// - `GET /health` - 健康检查
/// - `POST /api/auth/login` - 登录，签发会话
/// - `POST /api/auth/signup` - 注册
/// - `POST /api/auth/logout` - 清除会话 Cookie
/// - `GET /api/auth/me` - 当前账户
/// - `GET /api/analytics` - 用户分析列表
/// - `GET /api/analytics/summary` - 用户分析汇总
/// - `GET /api/call-logs` - 通话记录
/// - `GET /api/dashboard/stats` - 仪表盘统计
/// - `GET /api/export/{call-logs,user-analytics,ordered-calls}` - CSV 原样导出
///
/// # 认证
/// 除 health 与 login / signup / logout 外均需要会话，支持：
/// - `callboard_session` Cookie
/// - `Authorization: Bearer <token>` header
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/analytics", get(get_analytics))
        .route("/analytics/summary", get(get_analytics_summary))
        .route("/call-logs", get(get_call_logs))
        .route("/dashboard/stats", get(get_dashboard_stats))
        .route("/export/call-logs", get(export_call_logs))
        .route("/export/user-analytics", get(export_user_analytics))
        .route("/export/ordered-calls", get(export_ordered_calls))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    let public = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout));

    Router::new()
        .route("/health", get(health))
        .nest("/api", protected.merge(public))
        .with_state(state)
}
