//! 报表与导出 HTTP 处理器

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};

use crate::dataset::query::CallLogQuery;
use crate::dataset::types::DatasetKind;

use super::{
    error::ApiError,
    middleware::AppState,
    types::HealthResponse,
};

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/analytics
/// 获取用户分析列表
pub async fn get_analytics(State(state): State<AppState>) -> impl IntoResponse {
    match state.reports.user_analytics().await {
        Ok(analytics) => Json(analytics).into_response(),
        Err(e) => {
            let e = ApiError::upstream("Failed to fetch analytics data", e);
            (e.status_code(), Json(e.into_response())).into_response()
        }
    }
}

/// GET /api/analytics/summary
/// 获取用户分析汇总
pub async fn get_analytics_summary(State(state): State<AppState>) -> impl IntoResponse {
    match state.reports.analytics_summary().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            let e = ApiError::upstream("Failed to fetch analytics data", e);
            (e.status_code(), Json(e.into_response())).into_response()
        }
    }
}

/// GET /api/call-logs
/// 获取通话记录，支持 search / direction / sortBy / order 查询参数
pub async fn get_call_logs(
    State(state): State<AppState>,
    query: Result<Query<CallLogQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => {
            let e = ApiError::BadRequest(rejection.body_text());
            return (e.status_code(), Json(e.into_response())).into_response();
        }
    };

    match state.reports.call_logs(&query).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            let e = ApiError::upstream("Failed to fetch call logs", e);
            (e.status_code(), Json(e.into_response())).into_response()
        }
    }
}

/// GET /api/dashboard/stats
/// 获取仪表盘统计
pub async fn get_dashboard_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.reports.dashboard_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            let e = ApiError::upstream("Failed to fetch dashboard stats", e);
            (e.status_code(), Json(e.into_response())).into_response()
        }
    }
}

/// 原样转发数据集字节，作为附件下载
async fn export_dataset(state: &AppState, kind: DatasetKind, failure: &'static str) -> Response {
    match state.reports.export(kind).await {
        Ok(bytes) => {
            tracing::info!("导出 {} 数据集: {} 字节", kind.label(), bytes.len());
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", kind.export_filename()),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            let e = ApiError::upstream(failure, e);
            (e.status_code(), Json(e.into_response())).into_response()
        }
    }
}

/// GET /api/export/call-logs
pub async fn export_call_logs(State(state): State<AppState>) -> Response {
    export_dataset(&state, DatasetKind::CallLogs, "Failed to export call logs").await
}

/// GET /api/export/user-analytics
pub async fn export_user_analytics(State(state): State<AppState>) -> Response {
    export_dataset(
        &state,
        DatasetKind::UserAnalytics,
        "Failed to export user analytics",
    )
    .await
}

/// GET /api/export/ordered-calls
pub async fn export_ordered_calls(State(state): State<AppState>) -> Response {
    export_dataset(
        &state,
        DatasetKind::OrderedCalls,
        "Failed to export ordered calls",
    )
    .await
}
