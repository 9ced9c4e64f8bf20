//! 汇总统计

use super::types::{AnalyticsSummary, CallShare, DashboardStats, UserAnalytic};

/// 通话量分布中展示的用户数
pub const CALL_DISTRIBUTION_SIZE: usize = 5;

/// 均值保留一位小数，空集返回 0
fn rounded_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    if !mean.is_finite() {
        return 0.0;
    }
    (mean * 10.0).round() / 10.0
}

/// 计算仪表盘统计
///
/// `total_calls` 为通话记录 CSV 的非空数据行数
pub fn dashboard_stats(analytics: &[UserAnalytic], total_calls: usize) -> DashboardStats {
    DashboardStats {
        total_users: analytics.len(),
        total_calls,
        avg_call_duration: rounded_mean(analytics.iter().filter_map(|a| a.avg_duration)),
        active_users: analytics
            .iter()
            .filter(|a| a.num_calls.is_some_and(|n| n > 0))
            .count(),
    }
}

/// 计算用户分析汇总
pub fn analytics_summary(analytics: &[UserAnalytic]) -> AnalyticsSummary {
    AnalyticsSummary {
        total_calls: analytics
            .iter()
            .filter_map(|a| a.num_calls)
            .fold(0i64, i64::saturating_add),
        avg_duration: rounded_mean(analytics.iter().filter_map(|a| a.avg_duration)),
        user_count: analytics.len(),
        call_distribution: analytics
            .iter()
            .take(CALL_DISTRIBUTION_SIZE)
            .map(|a| CallShare {
                user_id: a.user_id,
                num_calls: a.num_calls.unwrap_or(0),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytic(user_id: i64, avg: f64, calls: i64) -> UserAnalytic {
        UserAnalytic {
            user_id,
            avg_duration: Some(avg),
            num_calls: Some(calls),
        }
    }

    #[test]
    fn test_empty_analytics_average_is_zero() {
        let stats = dashboard_stats(&[], 0);
        assert_eq!(stats.avg_call_duration, 0.0);
        assert!(!stats.avg_call_duration.is_nan());
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.active_users, 0);
    }

    #[test]
    fn test_dashboard_stats() {
        let rows = vec![analytic(1, 42.5, 3), analytic(2, 10.0, 0), analytic(3, 20.04, 7)];
        let stats = dashboard_stats(&rows, 12);
        assert_eq!(
            stats,
            DashboardStats {
                total_users: 3,
                total_calls: 12,
                // (42.5 + 10 + 20.04) / 3 = 24.18
                avg_call_duration: 24.2,
                active_users: 2,
            }
        );
    }

    #[test]
    fn test_missing_values_excluded_from_mean() {
        let rows = vec![
            analytic(1, 30.0, 1),
            UserAnalytic {
                user_id: 2,
                avg_duration: None,
                num_calls: None,
            },
        ];
        let stats = dashboard_stats(&rows, 2);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.avg_call_duration, 30.0);
        assert_eq!(stats.active_users, 1);
    }

    #[test]
    fn test_negative_call_counts_are_not_active() {
        let rows = vec![analytic(-3, 10.0, -2), analytic(4, 20.0, 5)];
        let stats = dashboard_stats(&rows, 0);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.active_users, 1);
        assert_eq!(stats.avg_call_duration, 15.0);
        assert_eq!(analytics_summary(&rows).total_calls, 3);
    }

    #[test]
    fn test_analytics_summary_distribution() {
        let rows: Vec<UserAnalytic> = (1..=7).map(|i| analytic(i, i as f64, i * 2)).collect();
        let summary = analytics_summary(&rows);
        assert_eq!(summary.total_calls, 56);
        assert_eq!(summary.avg_duration, 4.0);
        assert_eq!(summary.user_count, 7);
        assert_eq!(summary.call_distribution.len(), CALL_DISTRIBUTION_SIZE);
        assert_eq!(
            summary.call_distribution[0],
            CallShare {
                user_id: 1,
                num_calls: 2
            }
        );
    }
}
