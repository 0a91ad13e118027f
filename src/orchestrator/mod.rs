//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一整个批次的录入和资源管理，是系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<AttendeeRecord>，持有 Browser)
//!     ↓
//! workflow::AttendeeFlow (处理单条记录)
//!     ↓
//! infrastructure::PageDriver (页面能力)
//! ```
//!
//! ## 设计原则
//!
//! 1. **严格串行**：同一个会话上永远只有一条记录在录入，
//!    页面同一时刻只有一个弹窗，并发交互会搞乱页面状态
//! 2. **资源隔离**：只有编排层持有 Browser
//! 3. **无业务逻辑**：只做调度、节流和统计

pub mod batch_processor;

pub use batch_processor::{process_all_attendees, App};
