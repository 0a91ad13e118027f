//! 测试用页面驱动
//!
//! 记录每次调用，并按脚本在指定操作上返回失败，
//! 让流程层和编排层可以脱离真实浏览器做验证

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::page_driver::PageDriver;

#[derive(Debug)]
struct FailurePlan {
    message: String,
    /// None 表示每次都失败；Some(n) 表示只在第 n 次调用时失败（从 1 开始）
    only_call: Option<usize>,
}

/// 可编程的 mock 驱动
#[derive(Default)]
pub struct MockDriver {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, FailurePlan>>,
    hits: Mutex<HashMap<String, usize>>,
    texts_present: Mutex<HashSet<String>>,
    selectors_present: Mutex<HashSet<String>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明页面上存在包含该文本的可点击元素
    pub fn add_text(&self, text: &str) {
        self.texts_present.lock().unwrap().insert(text.to_string());
    }

    /// 声明页面上存在该选择器命中的元素
    pub fn add_selector(&self, selector: &str) {
        self.selectors_present
            .lock()
            .unwrap()
            .insert(selector.to_string());
    }

    /// 让指定操作每次都失败
    pub fn fail_on(&self, op: &str, message: &str) {
        self.failures.lock().unwrap().insert(
            op.to_string(),
            FailurePlan {
                message: message.to_string(),
                only_call: None,
            },
        );
    }

    /// 让指定操作只在第 nth 次调用时失败（从 1 开始）
    pub fn fail_on_nth(&self, op: &str, nth: usize, message: &str) {
        self.failures.lock().unwrap().insert(
            op.to_string(),
            FailurePlan {
                message: message.to_string(),
                only_call: Some(nth),
            },
        );
    }

    /// 调用历史快照
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// 是否发生过以 `prefix` 开头的调用
    pub fn called(&self, prefix: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: &str) -> Result<()> {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(op.to_string()).or_insert(0);
        *count += 1;
        let current = *count;
        drop(hits);

        let failures = self.failures.lock().unwrap();
        if let Some(plan) = failures.get(op) {
            let should_fail = match plan.only_call {
                None => true,
                Some(nth) => nth == current,
            };
            if should_fail {
                bail!("{}", plan.message);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(format!("navigate:{}", url));
        self.check("navigate")
    }

    async fn wait_network_idle(&self) -> Result<()> {
        self.record("wait_network_idle".to_string());
        self.check("wait_network_idle")
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        self.record(format!("exists:{}", selector));
        self.check("exists")?;
        Ok(self.selectors_present.lock().unwrap().contains(selector))
    }

    async fn exists_text(&self, text: &str) -> Result<bool> {
        self.record(format!("exists_text:{}", text));
        self.check("exists_text")?;
        Ok(self.texts_present.lock().unwrap().contains(text))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.record(format!("click:{}", selector));
        self.check("click")
    }

    async fn click_text(&self, text: &str) -> Result<()> {
        self.record(format!("click_text:{}", text));
        self.check("click_text")
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.record(format!("fill:{}={}", selector, value));
        self.check("fill")
    }

    async fn wait_visible(&self, selector: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("wait_visible:{}", selector));
        self.check("wait_visible")
    }

    async fn wait_hidden(&self, selector: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("wait_hidden:{}", selector));
        self.check("wait_hidden")
    }
}
