//! 失败明细写入服务 - 业务能力层
//!
//! 只负责"把失败记录写成 JSON 文件"能力，供后续人工检查或重试工具消费

use anyhow::{Context, Result};
use std::fs;
use tracing::debug;

use crate::models::FailedImport;

/// 失败明细写入服务
pub struct FailureWriter {
    report_path: String,
}

impl FailureWriter {
    pub fn new() -> Self {
        Self {
            report_path: "import-failures.json".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    /// 把整个失败列表写入文件（覆盖旧内容）
    pub async fn write(&self, failures: &[FailedImport]) -> Result<()> {
        debug!("写入失败明细: {} 条 -> {}", failures.len(), self.report_path);

        let json = serde_json::to_string_pretty(failures)?;
        fs::write(&self.report_path, json)
            .with_context(|| format!("写入失败明细文件失败: {}", self.report_path))?;

        Ok(())
    }
}

impl Default for FailureWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendeeRecord;

    #[tokio::test]
    async fn writes_failures_as_json() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("failures.json");
        let writer = FailureWriter::with_path(path.to_str().expect("路径非法"));

        let failures = vec![FailedImport {
            attendee: AttendeeRecord {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                checked_in: false,
                row_index: Some(2),
            },
            error: "弹窗未打开".to_string(),
        }];
        writer.write(&failures).await.expect("应能写入");

        let raw = std::fs::read_to_string(&path).expect("应能读回");
        let parsed: serde_json::Value = serde_json::from_str(&raw).expect("应是合法 JSON");
        assert_eq!(parsed[0]["attendee"]["firstName"], "Ada");
        assert_eq!(parsed[0]["attendee"]["rowIndex"], 2);
        assert_eq!(parsed[0]["error"], "弹窗未打开");
    }
}
