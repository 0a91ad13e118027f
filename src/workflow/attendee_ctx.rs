//! 录入上下文
//!
//! 封装"我正在录第几条、一共多少条"这一信息，只用于日志展示

use std::fmt::Display;

/// 单条记录的录入上下文
#[derive(Debug, Clone, Copy)]
pub struct AttendeeCtx {
    /// 当前是第几条（从 1 开始）
    pub position: usize,
    /// 本批次总条数
    pub total: usize,
}

impl AttendeeCtx {
    pub fn new(position: usize, total: usize) -> Self {
        Self { position, total }
    }
}

impl Display for AttendeeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.position, self.total)
    }
}
