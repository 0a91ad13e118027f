use crate::error::{AppError, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// Bevy 登录邮箱
    pub email: String,
    /// Bevy 登录密码
    pub password: String,
    /// 活动报名页 URL
    pub event_url: String,
    /// 是否无头模式（默认有头，便于人工盯着录入过程）
    pub headless: bool,
    /// 每个页面动作前的减速毫秒数
    pub slow_mo_ms: u64,
    /// 登录状态持久化文件路径
    pub auth_state_path: String,
    /// 本地 CSV 文件路径
    pub csv_path: String,
    /// 在线表格 URL
    pub sheet_url: String,
    /// 失败明细输出文件路径
    pub failure_report_path: String,
    /// 节流配置
    pub throttle: ThrottleConfig,
}

/// 录入节流配置
///
/// 两条记录之间随机等待 [min, max] 毫秒，避免呈现明显的机器节奏
#[derive(Clone, Copy, Debug)]
pub struct ThrottleConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

/// 登录凭据
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            event_url: String::new(),
            headless: false,
            slow_mo_ms: 0,
            auth_state_path: ".auth/bevy-auth.json".to_string(),
            csv_path: String::new(),
            sheet_url: String::new(),
            failure_report_path: "import-failures.json".to_string(),
            throttle: ThrottleConfig {
                min_delay_ms: 500,
                max_delay_ms: 1000,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            email: std::env::var("BEVY_EMAIL").unwrap_or(default.email),
            password: std::env::var("BEVY_PASSWORD").unwrap_or(default.password),
            event_url: std::env::var("BEVY_EVENT_URL").unwrap_or(default.event_url),
            headless: std::env::var("HEADLESS").ok().and_then(|v| parse_bool(&v)).unwrap_or(default.headless),
            slow_mo_ms: std::env::var("SLOW_MO_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.slow_mo_ms),
            auth_state_path: std::env::var("AUTH_STATE_PATH").unwrap_or(default.auth_state_path),
            csv_path: std::env::var("CSV_PATH").unwrap_or(default.csv_path),
            sheet_url: std::env::var("GOOGLE_SHEET_URL").unwrap_or(default.sheet_url),
            failure_report_path: std::env::var("FAILURE_REPORT_PATH").unwrap_or(default.failure_report_path),
            throttle: ThrottleConfig {
                min_delay_ms: std::env::var("MIN_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.throttle.min_delay_ms),
                max_delay_ms: std::env::var("MAX_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.throttle.max_delay_ms),
            },
        }
    }

    /// 校验运行必需的配置项
    pub fn validate(&self) -> Result<(), AppError> {
        if self.event_url.is_empty() {
            return Err(AppError::Config(ConfigError::MissingVar {
                var_name: "BEVY_EVENT_URL".to_string(),
            }));
        }
        Ok(())
    }

    /// 邮箱和密码都配置了才返回凭据
    pub fn credentials(&self) -> Option<Credentials> {
        if self.email.is_empty() || self.password.is_empty() {
            return None;
        }
        Some(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
