//! 报表数据类型

use serde::Serialize;

use crate::model::config::DatasetConfig;

/// 上游数据集种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    CallLogs,
    UserAnalytics,
    OrderedCalls,
}

impl DatasetKind {
    /// 导出时使用的固定文件名
    pub fn export_filename(self) -> &'static str {
        match self {
            DatasetKind::CallLogs => "call-logs.csv",
            DatasetKind::UserAnalytics => "user-analytics.csv",
            DatasetKind::OrderedCalls => "ordered-calls.csv",
        }
    }

    /// 日志及错误消息中的名称
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::CallLogs => "call logs",
            DatasetKind::UserAnalytics => "user analytics",
            DatasetKind::OrderedCalls => "ordered calls",
        }
    }

    pub fn url(self, datasets: &DatasetConfig) -> &str {
        match self {
            DatasetKind::CallLogs => &datasets.call_logs_url,
            DatasetKind::UserAnalytics => &datasets.user_analytics_url,
            DatasetKind::OrderedCalls => &datasets.ordered_calls_url,
        }
    }
}

/// 单条通话记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// 数据行序号（从 1 开始，不取自源数据）
    pub call_id: u64,
    pub phone_number: String,
    /// Unix 秒
    pub start_time: i64,
    /// Unix 秒，源数据不保证 >= startTime
    pub end_time: i64,
    /// 通常为 inbound / outbound，实际为自由文本
    pub direction: String,
    pub user_id: u64,
    /// endTime - startTime，负值按 0 计
    pub duration: i64,
}

impl CallRecord {
    pub fn new(
        call_id: u64,
        phone_number: String,
        start_time: i64,
        end_time: i64,
        direction: String,
        user_id: u64,
    ) -> Self {
        Self {
            call_id,
            phone_number,
            start_time,
            end_time,
            direction,
            user_id,
            duration: end_time.saturating_sub(start_time).max(0),
        }
    }
}

/// 单个用户的通话分析
///
/// 宽松校验模式下 avgDuration / numCalls 可能缺失，序列化为 null
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytic {
    pub user_id: i64,
    pub avg_duration: Option<f64>,
    pub num_calls: Option<i64>,
}

/// 仪表盘汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_calls: usize,
    /// 保留一位小数，空集为 0
    pub avg_call_duration: f64,
    pub active_users: usize,
}

/// 通话量分布中的一项
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallShare {
    pub user_id: i64,
    pub num_calls: i64,
}

/// 用户分析汇总（分析页的卡片与饼图数据）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_calls: i64,
    pub avg_duration: f64,
    pub user_count: usize,
    pub call_distribution: Vec<CallShare>,
}
