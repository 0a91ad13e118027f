//! 浏览器相关：启动、登录会话、登录状态持久化

pub mod auth_state;
pub mod launch;
pub mod session;

pub use launch::launch_browser;
pub use session::{check_login_status, establish_session};
