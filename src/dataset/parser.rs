//! CSV 解析
//!
//! 上游 CSV 为简单逗号分隔格式：首行为表头，不支持引号转义，
//! 字段内不得包含逗号或换行。

use crate::model::config::{AnalyticsValidation, MissingFieldPolicy};

use super::types::{CallRecord, UserAnalytic};

/// 缺失字段补齐时使用的占位值
pub const UNKNOWN_PHONE_NUMBER: &str = "unknown";
pub const UNKNOWN_DIRECTION: &str = "unknown";
/// 缺失 endTime 时相对 startTime 的偏移（秒）
pub const DEFAULT_CALL_LENGTH_SECS: i64 = 60;

/// 遍历数据行（跳过表头），返回 (从 0 开始的行序号, 行内容)
///
/// 整个文本先去除首尾空白，空行保留序号但不返回
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.trim()
        .split('\n')
        .skip(1)
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
}

/// 统计非空数据行数（不含表头）
pub fn count_data_lines(text: &str) -> usize {
    data_lines(text).count()
}

/// 取第 `idx` 列，去除空白后为空视为缺失
fn field<'a>(values: &[&'a str], idx: usize) -> Option<&'a str> {
    values
        .get(idx)
        .copied()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_u64(values: &[&str], idx: usize) -> Option<u64> {
    field(values, idx).and_then(|v| v.parse().ok())
}

fn parse_i64(values: &[&str], idx: usize) -> Option<i64> {
    field(values, idx).and_then(|v| v.parse().ok())
}

fn parse_f64(values: &[&str], idx: usize) -> Option<f64> {
    field(values, idx)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// 解析用户分析 CSV：`userId, avgDuration, numCalls`
///
/// userId 无法解析为整数的行总是被丢弃（负数仍是合法整数）；
/// 其余字段按 `validation` 处理
pub fn parse_user_analytics(text: &str, validation: AnalyticsValidation) -> Vec<UserAnalytic> {
    data_lines(text)
        .filter_map(|(_, line)| {
            let values: Vec<&str> = line.split(',').collect();
            let user_id = parse_i64(&values, 0)?;
            let avg_duration = parse_f64(&values, 1);
            let num_calls = parse_i64(&values, 2);

            if validation == AnalyticsValidation::Strict
                && (avg_duration.is_none() || num_calls.is_none())
            {
                tracing::debug!("丢弃无效的用户分析行: {}", line.trim());
                return None;
            }

            Some(UserAnalytic {
                user_id,
                avg_duration,
                num_calls,
            })
        })
        .collect()
}

/// 解析通话记录 CSV：`callId, phoneNumber, startTime, endTime, direction, userId`
///
/// callId 取数据行序号（从 1 开始），源数据中的 callId 列只做校验：
/// 非数字的行总是被丢弃，`Reject` 下缺失也会被丢弃。
/// `fetched_at` 为拉取时刻（Unix 秒），仅在 `MissingFieldPolicy::Default` 下
/// 用作缺失时间戳的占位值。
///
/// `Default` 只补齐电话、时间戳和方向；userId 从不补齐，缺失或非数字的行
/// 在两种策略下都会被丢弃。
pub fn parse_call_logs(text: &str, policy: MissingFieldPolicy, fetched_at: i64) -> Vec<CallRecord> {
    data_lines(text)
        .filter_map(|(index, line)| {
            let values: Vec<&str> = line.split(',').collect();
            let call_id = index as u64 + 1;
            let source_id_ok = match field(&values, 0) {
                Some(_) => parse_i64(&values, 0).is_some(),
                None => policy == MissingFieldPolicy::Default,
            };
            if !source_id_ok {
                tracing::debug!("丢弃 callId 列无效的通话记录行 #{}", call_id);
                return None;
            }
            let user_id = parse_u64(&values, 5)?;

            let phone_number = field(&values, 1).map(str::to_string);
            let start_time = parse_i64(&values, 2);
            let end_time = parse_i64(&values, 3);
            let direction = field(&values, 4).map(str::to_string);

            match policy {
                MissingFieldPolicy::Reject => {
                    let (Some(phone_number), Some(start_time), Some(end_time), Some(direction)) =
                        (phone_number, start_time, end_time, direction)
                    else {
                        tracing::debug!("丢弃字段不完整的通话记录行 #{}", call_id);
                        return None;
                    };
                    Some(CallRecord::new(
                        call_id,
                        phone_number,
                        start_time,
                        end_time,
                        direction,
                        user_id,
                    ))
                }
                MissingFieldPolicy::Default => {
                    let start_time = start_time.unwrap_or(fetched_at);
                    let end_time =
                        end_time.unwrap_or(start_time.saturating_add(DEFAULT_CALL_LENGTH_SECS));
                    Some(CallRecord::new(
                        call_id,
                        phone_number.unwrap_or_else(|| UNKNOWN_PHONE_NUMBER.to_string()),
                        start_time,
                        end_time,
                        direction.unwrap_or_else(|| UNKNOWN_DIRECTION.to_string()),
                        user_id,
                    ))
                }
            }
        })
        .collect()
}
