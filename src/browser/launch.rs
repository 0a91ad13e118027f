use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;

/// 启动浏览器并创建一个空白页面
///
/// 默认有头模式，录入过程有意让人盯着；`config.headless` 为 true 时转无头
pub async fn launch_browser(config: &Config) -> Result<(Browser, Page)> {
    info!("🚀 启动浏览器...");
    debug!("无头模式: {}, 减速: {}ms", config.headless, config.slow_mo_ms);

    let mut builder = BrowserConfig::builder();
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    let browser_config = builder
        .args(vec![
            "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage", // 防止共享内存不足
            "--disable-gpu",
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            anyhow::anyhow!("配置浏览器失败: {}", e)
        })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        anyhow::anyhow!("启动浏览器失败: {}", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        anyhow::anyhow!("创建页面失败: {}", e)
    })?;

    info!("✅ 浏览器就绪");
    Ok((browser, page))
}
