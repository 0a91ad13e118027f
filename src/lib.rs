//! # Bevy Attendee Import
//!
//! 一个把参会人名单批量录入 Bevy 活动页面的自动化工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 页面操作能力接口（导航、点击、填写、等待）
//! - `CdpDriver` - 唯一的 page owner，基于 CDP 的实现
//!
//! ### ② 业务能力层（Services / Browser）
//! - `browser/` - 浏览器启动、登录会话建立、登录状态持久化
//! - `services/FailureWriter` - 写失败明细文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条参会人记录"的完整录入流程
//! - `AttendeeCtx` - 上下文封装（第几条 / 共几条）
//! - `AttendeeFlow` - 流程编排（开弹窗 → 清空 → 填写 → 提交 → 等关闭）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量录入器，顺序遍历名单并节流
//!
//! ## 数据流
//!
//! ```text
//! models/loaders (CSV / 在线表格)
//!     ↓ Vec<AttendeeRecord>
//! orchestrator::App (持有 Browser + CdpDriver)
//!     ↓ 逐条
//! workflow::AttendeeFlow (单条记录的状态机)
//!     ↓
//! infrastructure::PageDriver (页面能力)
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use browser::{establish_session, launch_browser};
pub use config::{Config, Credentials, ThrottleConfig};
pub use error::{AppError, AppResult};
pub use infrastructure::{CdpDriver, PageDriver};
pub use models::{AttendeeRecord, FailedImport, ImportOutcome, ImportResult, ImportStats};
pub use orchestrator::{process_all_attendees, App};
pub use workflow::{AttendeeCtx, AttendeeFlow, SubmitStep};
