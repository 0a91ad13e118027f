//! 单条记录的录入流程 - 流程层
//!
//! 核心职责：把"录入一个参会人"拆成一条严格的步骤链：
//!
//! ```text
//! 点开录入弹窗 → 等弹窗出现 → 清空表单 → 填写表单 → 提交 → 等弹窗关闭
//! ```
//!
//! 任何一步失败都会中断剩余步骤，并被收敛成 `ImportOutcome::Failure`，
//! 永远不会向外抛出、也不会影响批次里的其他记录。

use std::fmt;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::infrastructure::PageDriver;
use crate::models::{AttendeeRecord, ImportOutcome};
use crate::workflow::attendee_ctx::AttendeeCtx;

/// 录入弹窗的特征选择器
pub const MODAL_SELECTOR: &str = r#"div[class*="modal"]"#;

const ADD_ATTENDEE_TEXT: &str = "Add attendee";
const FIRST_NAME_INPUT: &str = r#"input[name="first_name"]"#;
const LAST_NAME_INPUT: &str = r#"input[name="last_name"]"#;
const EMAIL_INPUT: &str = r#"input[name="email"]"#;
const SUBMIT_BUTTON: &str = r#"button[aria-label="Add"][type="button"]"#;

/// 录入流程的步骤
///
/// 每一步恰好有一条成功边和一条失败边，失败模式可以逐个枚举测试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStep {
    /// 点击"Add attendee"按钮
    OpenModal,
    /// 等待弹窗出现
    WaitModalOpen,
    /// 清空三个输入框
    ClearFields,
    /// 填写姓名和邮箱
    FillFields,
    /// 点击提交按钮
    Submit,
    /// 等待弹窗关闭
    WaitModalClose,
}

impl SubmitStep {
    pub fn describe(self) -> &'static str {
        match self {
            SubmitStep::OpenModal => "打开录入弹窗",
            SubmitStep::WaitModalOpen => "等待弹窗出现",
            SubmitStep::ClearFields => "清空表单",
            SubmitStep::FillFields => "填写表单",
            SubmitStep::Submit => "提交表单",
            SubmitStep::WaitModalClose => "等待弹窗关闭",
        }
    }
}

impl fmt::Display for SubmitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// 单条记录级别的错误
///
/// 只在流程内部流转，最终被渲染成 `ImportOutcome::Failure` 的原因字符串，
/// 不进入 `AppError`、不终止批次
#[derive(Debug)]
pub struct RecordError {
    step: SubmitStep,
    message: String,
}

impl RecordError {
    fn at(step: SubmitStep, source: anyhow::Error) -> Self {
        Self {
            step,
            message: source.to_string(),
        }
    }

    fn timeout(step: SubmitStep, message: &str) -> Self {
        Self {
            step,
            message: message.to_string(),
        }
    }

    pub fn step(&self) -> SubmitStep {
        self.step
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}失败: {}", self.step.describe(), self.message)
    }
}

impl std::error::Error for RecordError {}

/// 单条记录的录入流程
///
/// - 编排完整的步骤链
/// - 不持有任何资源（page）
/// - 只依赖 `PageDriver` 能力
pub struct AttendeeFlow {
    modal_timeout: Duration,
    settle_after_open: Duration,
    settle_after_submit: Duration,
    settle_after_close: Duration,
}

impl AttendeeFlow {
    /// 线上默认节奏：弹窗等待 5 秒，各静置点 1s / 1s / 500ms
    pub fn new() -> Self {
        Self {
            modal_timeout: Duration::from_secs(5),
            settle_after_open: Duration::from_secs(1),
            settle_after_submit: Duration::from_secs(1),
            settle_after_close: Duration::from_millis(500),
        }
    }

    /// 自定义节奏（测试时把静置时间压到零）
    pub fn with_timings(modal_timeout: Duration, settle: Duration) -> Self {
        Self {
            modal_timeout,
            settle_after_open: settle,
            settle_after_submit: settle,
            settle_after_close: settle,
        }
    }

    /// 录入一条记录
    ///
    /// 步骤失败永远被收敛成 `Failure`，调用方可以放心继续下一条
    pub async fn submit_one<D: PageDriver>(
        &self,
        driver: &D,
        attendee: &AttendeeRecord,
        ctx: &AttendeeCtx,
    ) -> ImportOutcome {
        match self.run_steps(driver, attendee, ctx).await {
            Ok(()) => {
                info!("{} ✓ 录入完成: {}", ctx, attendee.full_name());
                ImportOutcome::Success
            }
            Err(e) => {
                warn!("{} ⚠️ 录入失败: {} - {}", ctx, attendee.full_name(), e);
                ImportOutcome::Failure(e.to_string())
            }
        }
    }

    async fn run_steps<D: PageDriver>(
        &self,
        driver: &D,
        attendee: &AttendeeRecord,
        ctx: &AttendeeCtx,
    ) -> Result<(), RecordError> {
        info!("{} 开始录入: {}", ctx, attendee.full_name());

        // 弹窗每录完一条就关闭，所以每条记录都要重新点开
        driver
            .click_text(ADD_ATTENDEE_TEXT)
            .await
            .map_err(|e| RecordError::at(SubmitStep::OpenModal, e))?;

        driver
            .wait_visible(MODAL_SELECTOR, self.modal_timeout)
            .await
            .map_err(|_| RecordError::timeout(SubmitStep::WaitModalOpen, "弹窗未打开"))?;
        info!("{} ✓ 弹窗已打开", ctx);
        sleep(self.settle_after_open).await;

        // 清空输入框，防止上一条失败记录留下残余内容
        for selector in [FIRST_NAME_INPUT, LAST_NAME_INPUT, EMAIL_INPUT] {
            driver
                .fill(selector, "")
                .await
                .map_err(|e| RecordError::at(SubmitStep::ClearFields, e))?;
        }

        driver
            .fill(FIRST_NAME_INPUT, &attendee.first_name)
            .await
            .map_err(|e| RecordError::at(SubmitStep::FillFields, e))?;
        driver
            .fill(LAST_NAME_INPUT, &attendee.last_name)
            .await
            .map_err(|e| RecordError::at(SubmitStep::FillFields, e))?;
        driver
            .fill(EMAIL_INPUT, &attendee.email)
            .await
            .map_err(|e| RecordError::at(SubmitStep::FillFields, e))?;
        info!("{} ✓ 已填写: {} - {}", ctx, attendee.full_name(), attendee.email);

        // 签到状态刻意不走表单，由人工稍后统一处理
        if attendee.checked_in {
            info!("{} 跳过签到勾选，留给人工处理", ctx);
        }

        driver
            .click(SUBMIT_BUTTON)
            .await
            .map_err(|e| RecordError::at(SubmitStep::Submit, e))?;
        sleep(self.settle_after_submit).await;

        driver
            .wait_hidden(MODAL_SELECTOR, self.modal_timeout)
            .await
            .map_err(|_| {
                RecordError::timeout(SubmitStep::WaitModalClose, "弹窗未关闭，本次提交可能未写入")
            })?;
        info!("{} ✓ 弹窗已关闭", ctx);
        sleep(self.settle_after_close).await;

        Ok(())
    }
}

impl Default for AttendeeFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockDriver;

    fn fast_flow() -> AttendeeFlow {
        AttendeeFlow::with_timings(Duration::from_millis(50), Duration::ZERO)
    }

    fn attendee() -> AttendeeRecord {
        AttendeeRecord {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            checked_in: true,
            row_index: Some(2),
        }
    }

    #[tokio::test]
    async fn happy_path_runs_full_step_sequence() {
        let driver = MockDriver::new();
        let outcome = fast_flow()
            .submit_one(&driver, &attendee(), &AttendeeCtx::new(1, 1))
            .await;

        assert_eq!(outcome, ImportOutcome::Success);
        let expected = vec![
            format!("click_text:{}", ADD_ATTENDEE_TEXT),
            format!("wait_visible:{}", MODAL_SELECTOR),
            format!("fill:{}=", FIRST_NAME_INPUT),
            format!("fill:{}=", LAST_NAME_INPUT),
            format!("fill:{}=", EMAIL_INPUT),
            format!("fill:{}=Ada", FIRST_NAME_INPUT),
            format!("fill:{}=Lovelace", LAST_NAME_INPUT),
            format!("fill:{}=ada@example.com", EMAIL_INPUT),
            format!("click:{}", SUBMIT_BUTTON),
            format!("wait_hidden:{}", MODAL_SELECTOR),
        ];
        assert_eq!(driver.calls(), expected);
    }

    #[tokio::test]
    async fn modal_open_timeout_becomes_failure() {
        let driver = MockDriver::new();
        driver.fail_on("wait_visible", "等待元素出现超时");

        let outcome = fast_flow()
            .submit_one(&driver, &attendee(), &AttendeeCtx::new(1, 1))
            .await;

        match outcome {
            ImportOutcome::Failure(reason) => assert!(reason.contains("弹窗未打开")),
            ImportOutcome::Success => panic!("不应成功"),
        }
        // 超时后不再继续填表
        assert!(!driver.called("fill:"));
    }

    #[tokio::test]
    async fn modal_close_timeout_mentions_unregistered_submission() {
        let driver = MockDriver::new();
        driver.fail_on("wait_hidden", "等待元素消失超时");

        let outcome = fast_flow()
            .submit_one(&driver, &attendee(), &AttendeeCtx::new(1, 1))
            .await;

        match outcome {
            ImportOutcome::Failure(reason) => {
                assert!(reason.contains("弹窗未关闭"));
                assert!(reason.contains("可能未写入"));
            }
            ImportOutcome::Success => panic!("不应成功"),
        }
    }

    #[tokio::test]
    async fn fill_failure_names_the_step() {
        let driver = MockDriver::new();
        // 前三次 fill 是清空，第四次开始才是真正填写
        driver.fail_on_nth("fill", 4, "未找到输入框");

        let outcome = fast_flow()
            .submit_one(&driver, &attendee(), &AttendeeCtx::new(1, 1))
            .await;

        match outcome {
            ImportOutcome::Failure(reason) => assert!(reason.contains("填写表单失败")),
            ImportOutcome::Success => panic!("不应成功"),
        }
        assert!(!driver.called("click:button"));
    }

    #[tokio::test]
    async fn clear_failure_names_the_step() {
        let driver = MockDriver::new();
        driver.fail_on_nth("fill", 1, "未找到输入框");

        let outcome = fast_flow()
            .submit_one(&driver, &attendee(), &AttendeeCtx::new(1, 1))
            .await;

        match outcome {
            ImportOutcome::Failure(reason) => assert!(reason.contains("清空表单失败")),
            ImportOutcome::Success => panic!("不应成功"),
        }
    }
}
