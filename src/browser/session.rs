//! 登录会话建立
//!
//! 打开活动页面，判断登录状态，必要时走一遍登录交互。
//! 整段逻辑只依赖 `PageDriver` 能力，可以脱离真实浏览器测试。

use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::SessionError;
use crate::infrastructure::PageDriver;

/// 登录入口的文本特征
const LOGIN_TEXT: &str = "Login";

/// 已登录用户菜单的特征选择器
const USER_MENU_SELECTOR: &str = r#"[data-testid="user-menu"], .user-menu, [class*="user"]"#;

const EMAIL_INPUT: &str = r#"input[type="email"], input[name="email"]"#;
const PASSWORD_INPUT: &str = r#"input[type="password"], input[name="password"]"#;
const LOGIN_SUBMIT: &str = r#"button[type="submit"]"#;

/// 登录后给站点跳转留的静置时间
const POST_LOGIN_SETTLE: Duration = Duration::from_secs(2);

/// 在已打开的页面上建立登录会话
///
/// 1. 导航到活动页面
/// 2. 判断登录状态
/// 3. 未登录且有凭据则执行登录交互，然后回到活动页面
/// 4. 未登录且无凭据直接失败
/// 5. 等页面安静下来再返回
pub async fn establish_session<D: PageDriver>(
    driver: &D,
    event_url: &str,
    credentials: Option<&Credentials>,
) -> Result<(), SessionError> {
    info!("正在打开活动页面: {}", event_url);
    driver
        .navigate(event_url)
        .await
        .map_err(|e| SessionError::NavigationFailed {
            url: event_url.to_string(),
            source: e.into(),
        })?;

    if !check_login_status(driver).await {
        match credentials {
            Some(credentials) => {
                login(driver, credentials)
                    .await
                    .map_err(|e| SessionError::LoginFailed { source: e.into() })?;
                info!("登录完成，返回活动页面...");
                driver
                    .navigate(event_url)
                    .await
                    .map_err(|e| SessionError::NavigationFailed {
                        url: event_url.to_string(),
                        source: e.into(),
                    })?;
            }
            None => return Err(SessionError::AuthenticationRequired),
        }
    }

    driver
        .wait_network_idle()
        .await
        .map_err(|e| SessionError::NavigationFailed {
            url: event_url.to_string(),
            source: e.into(),
        })?;

    info!("✅ 活动页面加载完成: {}", event_url);
    Ok(())
}

/// 判断当前页面是否已登录
///
/// 启发式：看到 Login 按钮且没有用户菜单 → 未登录；
/// 探测本身出错也按未登录处理，宁可多走一次登录。
/// 站点改版时可能误判，行为与线上脚本保持一致
pub async fn check_login_status<D: PageDriver>(driver: &D) -> bool {
    let (login_button, user_menu) = match (
        driver.exists_text(LOGIN_TEXT).await,
        driver.exists(USER_MENU_SELECTOR).await,
    ) {
        (Ok(login_button), Ok(user_menu)) => (login_button, user_menu),
        _ => {
            warn!("⚠️ 登录状态探测出错，按未登录处理");
            return false;
        }
    };

    if login_button && !user_menu {
        return false;
    }
    !login_button || user_menu
}

async fn login<D: PageDriver>(driver: &D, credentials: &Credentials) -> Result<()> {
    info!("🔑 尝试登录...");

    driver.click_text(LOGIN_TEXT).await?;
    driver.wait_network_idle().await?;

    driver.fill(EMAIL_INPUT, &credentials.email).await?;
    driver.fill(PASSWORD_INPUT, &credentials.password).await?;

    driver.click(LOGIN_SUBMIT).await?;
    driver.wait_network_idle().await?;

    // 等站点完成登录后的跳转
    sleep(POST_LOGIN_SETTLE).await;
    info!("✓ 登录流程完成");
    Ok(())
}
