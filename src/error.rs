use std::fmt;

/// 应用程序错误类型
///
/// 只有会终止整次运行的错误才会出现在这里；
/// 单条记录的失败由 `workflow::RecordError` 承载，永远不会向上传播
#[derive(Debug)]
pub enum AppError {
    /// 名单来源错误（文件、网络表格、解析）
    Source(SourceError),
    /// 会话错误（导航、登录）
    Session(SessionError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Source(e) => write!(f, "名单来源错误: {}", e),
            AppError::Session(e) => write!(f, "会话错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Source(e) => Some(e),
            AppError::Session(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 名单来源错误
///
/// 这一类错误在任何记录被处理之前就终止运行
#[derive(Debug)]
pub enum SourceError {
    /// 读取本地文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 拉取在线表格时网络请求失败
    RequestFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 在线表格返回非 2xx 状态
    FetchFailed {
        url: String,
        status: u16,
    },
    /// 表格内容解析失败
    ParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            SourceError::RequestFailed { url, source } => {
                write!(f, "拉取表格失败 ({}): {}", url, source)
            }
            SourceError::FetchFailed { url, status } => {
                write!(f, "拉取表格失败 ({}): HTTP {}", url, status)
            }
            SourceError::ParseFailed { source } => {
                write!(f, "表格解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::ReadFailed { source, .. }
            | SourceError::RequestFailed { source, .. }
            | SourceError::ParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            SourceError::FetchFailed { .. } => None,
        }
    }
}

/// 会话错误
///
/// 无法到达活动页面或无法完成登录时，整个批次不会开始
#[derive(Debug)]
pub enum SessionError {
    /// 导航到目标页面失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 未登录且没有提供凭据
    AuthenticationRequired,
    /// 登录交互失败
    LoginFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            SessionError::AuthenticationRequired => {
                write!(f, "当前未登录且未提供凭据，请手动登录或配置 BEVY_EMAIL / BEVY_PASSWORD")
            }
            SessionError::LoginFailed { source } => {
                write!(f, "登录失败: {}", source)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::NavigationFailed { source, .. }
            | SessionError::LoginFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            SessionError::AuthenticationRequired => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 必需的环境变量缺失
    MissingVar { var_name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar { var_name } => {
                write!(f, "必须设置环境变量 {}", var_name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 便捷转换 ==========

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::Source(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
