//! 页面驱动 - 基础设施层
//!
//! `PageDriver` 把"导航、点击、填写、等待元素"抽象成能力接口，
//! 上层流程只依赖接口，测试时可以用 mock 替换真实浏览器。
//! `CdpDriver` 是唯一的 page owner，所有交互通过执行 JS 完成。

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// 等待类操作的轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 页面加载等待上限
const LOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// 页面操作能力接口
///
/// 职责：
/// - 暴露流程层需要的全部页面交互
/// - 不认识 AttendeeRecord
/// - 不处理业务流程
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定 URL 并等待页面加载完成
    async fn navigate(&self, url: &str) -> Result<()>;

    /// 等待页面安静下来（加载完成 + 短暂静置）
    async fn wait_network_idle(&self) -> Result<()>;

    /// 选择器是否能命中元素
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// 页面上是否存在文本包含 `text` 的可点击元素
    async fn exists_text(&self, text: &str) -> Result<bool>;

    /// 点击选择器命中的第一个元素
    async fn click(&self, selector: &str) -> Result<()>;

    /// 点击文本包含 `text` 的第一个可点击元素
    async fn click_text(&self, text: &str) -> Result<()>;

    /// 把 `value` 写入输入框（覆盖原内容，触发 input/change 事件）
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// 等待元素在超时时间内变为可见
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// 等待元素在超时时间内消失或隐藏
    async fn wait_hidden(&self, selector: &str, timeout: Duration) -> Result<()>;
}

/// 基于 CDP 的页面驱动
///
/// 持有唯一的 Page 资源，所有操作通过 `page.evaluate` 执行 JS 实现
pub struct CdpDriver {
    page: Page,
    slow_mo: Duration,
}

impl CdpDriver {
    /// 创建新的页面驱动
    ///
    /// `slow_mo` 大于零时，每个页面动作前都会先等待这么久
    pub fn new(page: Page, slow_mo: Duration) -> Self {
        Self { page, slow_mo }
    }

    /// 获取 page 的引用（用于 cookie 等 CDP 级操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 动作前减速
    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
        );
        self.eval_as(js).await
    }

    async fn wait_document_ready(&self) -> Result<()> {
        let deadline = Instant::now() + LOAD_TIMEOUT;
        loop {
            let ready: bool = self
                .eval_as("document.readyState === 'complete'")
                .await
                .unwrap_or(false);
            if ready {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("页面加载超时 ({}ms)", LOAD_TIMEOUT.as_millis());
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.pace().await;
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| anyhow!("导航到 {} 失败: {}", url, e))?;
        self.wait_document_ready().await
    }

    async fn wait_network_idle(&self) -> Result<()> {
        // CDP 没有现成的 networkidle 信号，用 readyState + 定长静置近似
        self.wait_document_ready().await?;
        sleep(Duration::from_millis(500)).await;
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let js = format!(
            "document.querySelector({sel}) !== null",
            sel = serde_json::to_string(selector)?,
        );
        self.eval_as(js).await
    }

    async fn exists_text(&self, text: &str) -> Result<bool> {
        let js = format!(
            r#"
            (() => {{
                const needle = {needle};
                const nodes = document.querySelectorAll('button, a, [role="button"]');
                for (const el of nodes) {{
                    if ((el.textContent || '').trim().includes(needle)) return true;
                }}
                return false;
            }})()
            "#,
            needle = serde_json::to_string(text)?,
        );
        self.eval_as(js).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.pace().await;
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
        );
        let clicked: bool = self.eval_as(js).await?;
        if !clicked {
            bail!("未找到元素: {}", selector);
        }
        Ok(())
    }

    async fn click_text(&self, text: &str) -> Result<()> {
        self.pace().await;
        let js = format!(
            r#"
            (() => {{
                const needle = {needle};
                const nodes = document.querySelectorAll('button, a, [role="button"]');
                for (const el of nodes) {{
                    if ((el.textContent || '').trim().includes(needle)) {{
                        el.click();
                        return true;
                    }}
                }}
                return false;
            }})()
            "#,
            needle = serde_json::to_string(text)?,
        );
        let clicked: bool = self.eval_as(js).await?;
        if !clicked {
            bail!("未找到文本为 '{}' 的可点击元素", text);
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.pace().await;
        // React 这类框架会忽略直接赋值，必须走原生 setter 再派发事件
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const proto = el.tagName === 'TEXTAREA'
                    ? HTMLTextAreaElement.prototype
                    : HTMLInputElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
                setter.call(el, {val});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
            val = serde_json::to_string(value)?,
        );
        let filled: bool = self.eval_as(js).await?;
        if !filled {
            bail!("未找到输入框: {}", selector);
        }
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("等待元素出现超时 ({}ms): {}", timeout.as_millis(), selector);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_hidden(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_visible(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("等待元素消失超时 ({}ms): {}", timeout.as_millis(), selector);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}
