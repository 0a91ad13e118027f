//! 日志初始化
//!
//! 基于 tracing-subscriber，支持 RUST_LOG 环境变量覆盖默认级别

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化全局日志订阅器
///
/// 重复调用时后续调用是空操作（测试里可能被多次触发）
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_attendee_import=info,info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .try_init();
}
