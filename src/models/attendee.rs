//! 参会人数据模型

use serde::{Deserialize, Serialize};

/// 一条待录入的参会人记录
///
/// 由名单来源构建，之后只读。字段允许为空字符串：
/// 源数据残缺时照原样录入，不在这一层做拒绝
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub checked_in: bool,
    /// 在源表格中的行号（表头为第 1 行），仅用于诊断
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
}

impl AttendeeRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// 单条记录的录入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// 录入成功
    Success,
    /// 录入失败，附带可读的失败原因
    Failure(String),
}

/// 批次统计
///
/// `retried` 为将来重试策略预留，当前版本每条记录只尝试一次
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub retried: usize,
}

/// 一条失败记录及其原因
#[derive(Debug, Clone, Serialize)]
pub struct FailedImport {
    pub attendee: AttendeeRecord,
    pub error: String,
}

/// 整个批次的录入结果
///
/// `successes` 和 `errors` 各自保持输入顺序；
/// 想要恢复整体顺序的消费者应使用 `row_index`
#[derive(Debug, Default, Serialize)]
pub struct ImportResult {
    pub stats: ImportStats,
    pub successes: Vec<AttendeeRecord>,
    pub errors: Vec<FailedImport>,
}

impl ImportResult {
    /// 以固定的输入总数创建空结果
    pub fn new(total: usize) -> Self {
        Self {
            stats: ImportStats {
                total,
                ..Default::default()
            },
            successes: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self, attendee: AttendeeRecord) {
        self.stats.success += 1;
        self.successes.push(attendee);
    }

    pub fn record_failure(&mut self, attendee: AttendeeRecord, error: String) {
        self.stats.failed += 1;
        self.errors.push(FailedImport { attendee, error });
    }

    /// 每条输入都恰好产生了一个结果
    pub fn is_complete(&self) -> bool {
        self.stats.success + self.stats.failed == self.stats.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendee(name: &str) -> AttendeeRecord {
        AttendeeRecord {
            first_name: name.to_string(),
            last_name: "测试".to_string(),
            email: format!("{}@example.com", name),
            checked_in: false,
            row_index: None,
        }
    }

    #[test]
    fn result_accumulates_stats() {
        let mut result = ImportResult::new(3);
        result.record_success(attendee("a"));
        result.record_failure(attendee("b"), "弹窗未打开".to_string());
        result.record_success(attendee("c"));

        assert_eq!(result.stats.total, 3);
        assert_eq!(result.stats.success, 2);
        assert_eq!(result.stats.failed, 1);
        assert_eq!(result.stats.retried, 0);
        assert!(result.is_complete());
        assert_eq!(result.successes.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error, "弹窗未打开");
    }

    #[test]
    fn full_name_trims_missing_parts() {
        let mut a = attendee("张");
        a.last_name = String::new();
        assert_eq!(a.full_name(), "张");
    }
}
