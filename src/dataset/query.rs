//! 通话记录的筛选与排序

use serde::Deserialize;

use super::types::CallRecord;

/// 可排序字段
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    CallId,
    PhoneNumber,
    StartTime,
    EndTime,
    Direction,
    UserId,
    Duration,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// GET /api/call-logs 查询参数
///
/// 所有参数均为空时保持源数据顺序
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogQuery {
    /// 电话号码子串（不区分大小写）或 userId 子串
    pub search: Option<String>,
    /// 呼叫方向（不区分大小写）
    pub direction: Option<String>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl CallLogQuery {
    fn matches(&self, record: &CallRecord) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let phone_hit = record.phone_number.to_lowercase().contains(&needle);
            let user_hit = record.user_id.to_string().contains(search);
            if !phone_hit && !user_hit {
                return false;
            }
        }

        if let Some(direction) = self.direction.as_deref().map(str::trim).filter(|s| !s.is_empty())
        {
            if !record.direction.eq_ignore_ascii_case(direction) {
                return false;
            }
        }

        true
    }

    /// 应用筛选和排序（排序稳定）
    pub fn apply(&self, records: Vec<CallRecord>) -> Vec<CallRecord> {
        let mut records: Vec<CallRecord> = records.into_iter().filter(|r| self.matches(r)).collect();

        if let Some(field) = self.sort_by {
            records.sort_by(|a, b| {
                let ordering = match field {
                    SortField::CallId => a.call_id.cmp(&b.call_id),
                    SortField::PhoneNumber => a.phone_number.cmp(&b.phone_number),
                    SortField::StartTime => a.start_time.cmp(&b.start_time),
                    SortField::EndTime => a.end_time.cmp(&b.end_time),
                    SortField::Direction => a.direction.cmp(&b.direction),
                    SortField::UserId => a.user_id.cmp(&b.user_id),
                    SortField::Duration => a.duration.cmp(&b.duration),
                };
                match self.order.unwrap_or_default() {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        records
    }
}
