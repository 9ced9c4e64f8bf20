//! 报表服务
//!
//! 每个请求独立拉取并解析，整体成功或整体失败，不返回部分结果

use bytes::Bytes;

use crate::model::config::{AnalyticsValidation, MissingFieldPolicy};

use super::parser::{count_data_lines, parse_call_logs, parse_user_analytics};
use super::query::CallLogQuery;
use super::source::BlobStore;
use super::stats;
use super::types::{AnalyticsSummary, CallRecord, DashboardStats, DatasetKind, UserAnalytic};

/// 解析策略
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub analytics_validation: AnalyticsValidation,
    pub missing_field_policy: MissingFieldPolicy,
}

/// 报表服务
///
/// 封装上游拉取、解析和汇总逻辑
pub struct ReportService {
    store: BlobStore,
    options: ParseOptions,
}

impl ReportService {
    pub fn new(store: BlobStore, options: ParseOptions) -> Self {
        Self { store, options }
    }

    /// 获取用户分析列表
    pub async fn user_analytics(&self) -> anyhow::Result<Vec<UserAnalytic>> {
        let text = self.store.fetch_text(DatasetKind::UserAnalytics).await?;
        Ok(parse_user_analytics(&text, self.options.analytics_validation))
    }

    /// 获取用户分析汇总
    pub async fn analytics_summary(&self) -> anyhow::Result<AnalyticsSummary> {
        let analytics = self.user_analytics().await?;
        Ok(stats::analytics_summary(&analytics))
    }

    /// 获取通话记录（可选筛选、排序）
    pub async fn call_logs(&self, query: &CallLogQuery) -> anyhow::Result<Vec<CallRecord>> {
        let text = self.store.fetch_text(DatasetKind::CallLogs).await?;
        let fetched_at = chrono::Utc::now().timestamp();
        let records = parse_call_logs(&text, self.options.missing_field_policy, fetched_at);
        Ok(query.apply(records))
    }

    /// 获取仪表盘统计（并发拉取两个数据集）
    pub async fn dashboard_stats(&self) -> anyhow::Result<DashboardStats> {
        let (analytics_text, call_logs_text) = tokio::try_join!(
            self.store.fetch_text(DatasetKind::UserAnalytics),
            self.store.fetch_text(DatasetKind::CallLogs),
        )?;

        let analytics = parse_user_analytics(&analytics_text, self.options.analytics_validation);
        let total_calls = count_data_lines(&call_logs_text);
        Ok(stats::dashboard_stats(&analytics, total_calls))
    }

    /// 导出数据集原始字节（不做任何转换）
    pub async fn export(&self, kind: DatasetKind) -> anyhow::Result<Bytes> {
        self.store.fetch_bytes(kind).await
    }
}
