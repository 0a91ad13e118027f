//! 批量录入器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动浏览器、恢复登录状态、建立会话
//! 2. **顺序录入**：严格逐条遍历名单，委托 `AttendeeFlow` 处理单条
//! 3. **节流**：相邻两条之间随机等待，最后一条之后不等
//! 4. **错误隔离**：单条失败只计入统计，绝不中断批次
//! 5. **收尾**：保存登录状态、导出失败明细、关闭浏览器
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 Browser 的模块
//! - **严格串行**：同一会话上不存在并发的 submit
//! - **向下委托**：单条记录的细节全部在 workflow 层

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::{self, auth_state};
use crate::config::{Config, ThrottleConfig};
use crate::infrastructure::{CdpDriver, PageDriver};
use crate::models::{AttendeeRecord, ImportOutcome, ImportResult};
use crate::services::FailureWriter;
use crate::workflow::{AttendeeCtx, AttendeeFlow};

/// 应用主结构
///
/// 一个 App 对应一次批量录入：独占一个浏览器会话，用完即销毁
pub struct App {
    config: Config,
    browser: Browser,
    driver: CdpDriver,
}

impl App {
    /// 初始化应用：启动浏览器并建立登录会话
    ///
    /// 这里失败意味着一条记录都没有开始录，没有部分统计
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        log_startup(&config);

        auth_state::ensure_auth_dir(&config.auth_state_path)?;

        let (browser, page) = browser::launch_browser(&config).await?;

        // 尽力恢复上次的登录状态，成功就能跳过登录交互
        auth_state::restore_auth_state(&page, &config.auth_state_path).await;

        let driver = CdpDriver::new(page, Duration::from_millis(config.slow_mo_ms));
        browser::establish_session(&driver, &config.event_url, config.credentials().as_ref())
            .await?;

        Ok(Self {
            config,
            browser,
            driver,
        })
    }

    /// 运行整个批次并做收尾
    pub async fn run(mut self, attendees: Vec<AttendeeRecord>) -> Result<ImportResult> {
        let result =
            process_all_attendees(&self.driver, &attendees, &self.config.throttle).await;

        // 保存登录状态，失败只告警，不影响本次结果
        if let Err(e) =
            auth_state::persist_auth_state(self.driver.page(), &self.config.auth_state_path).await
        {
            warn!("⚠️ 登录状态保存失败（不影响本次结果）: {}", e);
        }

        // 失败明细落盘，供人工检查或后续重试工具使用
        if !result.errors.is_empty() {
            let writer = FailureWriter::with_path(&self.config.failure_report_path);
            match writer.write(&result.errors).await {
                Ok(()) => info!("💾 失败明细已写入: {}", self.config.failure_report_path),
                Err(e) => warn!("⚠️ 失败明细写入失败: {}", e),
            }
        }

        if let Err(e) = self.browser.close().await {
            warn!("⚠️ 关闭浏览器失败: {}", e);
        }
        let _ = self.browser.wait().await;

        print_final_stats(&result);
        Ok(result)
    }
}

/// 顺序录入整份名单
///
/// 相邻两条之间随机等待 [min, max] 毫秒（最后一条之后不等）；
/// 单条失败被记入 `errors` 后继续下一条
pub async fn process_all_attendees<D: PageDriver>(
    driver: &D,
    attendees: &[AttendeeRecord],
    throttle: &ThrottleConfig,
) -> ImportResult {
    run_batch(driver, &AttendeeFlow::new(), attendees, throttle).await
}

pub(crate) async fn run_batch<D: PageDriver>(
    driver: &D,
    flow: &AttendeeFlow,
    attendees: &[AttendeeRecord],
    throttle: &ThrottleConfig,
) -> ImportResult {
    let total = attendees.len();
    let mut result = ImportResult::new(total);

    if total == 0 {
        info!("名单为空，没有需要录入的记录");
        return result;
    }

    info!("🚀 开始录入，共 {} 条记录", total);

    for (index, attendee) in attendees.iter().enumerate() {
        let ctx = AttendeeCtx::new(index + 1, total);

        match flow.submit_one(driver, attendee, &ctx).await {
            ImportOutcome::Success => {
                info!("✓ {} 已添加: {} ({})", ctx, attendee.full_name(), attendee.email);
                result.record_success(attendee.clone());
            }
            ImportOutcome::Failure(reason) => {
                error!(
                    "✗ {} 添加失败: {} - {}",
                    ctx,
                    attendee.full_name(),
                    reason
                );
                result.record_failure(attendee.clone(), reason);
            }
        }

        // 最后一条之后不再等待
        if index + 1 < total {
            human_delay(throttle.min_delay_ms, throttle.max_delay_ms).await;
        }
    }

    result
}

/// 随机等待，模拟人工录入节奏
async fn human_delay(min_ms: u64, max_ms: u64) {
    let delay = random_delay_ms(min_ms, max_ms);
    debug!("节流等待 {}ms", delay);
    sleep(Duration::from_millis(delay)).await;
}

/// 从 [min, max] 闭区间均匀取一个毫秒数
pub(crate) fn random_delay_ms(min_ms: u64, max_ms: u64) -> u64 {
    if max_ms <= min_ms {
        return min_ms;
    }
    rand::thread_rng().gen_range(min_ms..=max_ms)
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Bevy 参会人批量录入");
    info!("📍 活动页面: {}", config.event_url);
    info!(
        "⏱ 节流区间: {}-{}ms",
        config.throttle.min_delay_ms, config.throttle.max_delay_ms
    );
    info!("{}", "=".repeat(60));
}

fn print_final_stats(result: &ImportResult) {
    info!("\n{}", "=".repeat(60));
    info!("📊 录入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", result.stats.success, result.stats.total);
    info!("❌ 失败: {}", result.stats.failed);
    info!("🔄 重试: {}", result.stats.retried);
    info!("{}", "=".repeat(60));
}
