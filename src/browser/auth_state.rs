//! 登录状态持久化
//!
//! 把当前会话的 cookie 序列化到文件，下次运行恢复后即可跳过登录。
//! 文件缺失或损坏一律降级为"未登录启动"，绝不让它中断运行。

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::cdp::browser_protocol::network::{Cookie, CookieParam, TimeSinceEpoch};
use chromiumoxide::Page;
use tracing::{debug, info, warn};

/// 确保持久化文件所在目录存在
pub fn ensure_auth_dir(auth_state_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(auth_state_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建目录: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// 尽力恢复上次保存的登录状态
///
/// 返回是否真的恢复了 cookie；任何失败只记日志，不报错
pub async fn restore_auth_state(page: &Page, auth_state_path: &str) -> bool {
    let cookies = match load_cookie_file(auth_state_path) {
        Some(cookies) => cookies,
        None => return false,
    };
    if cookies.is_empty() {
        debug!("会话文件为空，按未登录处理");
        return false;
    }

    let params: Vec<CookieParam> = cookies.into_iter().filter_map(cookie_to_param).collect();
    let count = params.len();
    match page.set_cookies(params).await {
        Ok(_) => {
            info!("✓ 已恢复上次保存的登录状态 ({} 个 cookie)", count);
            true
        }
        Err(e) => {
            warn!("⚠️ 恢复登录状态失败，将以未登录状态继续: {}", e);
            false
        }
    }
}

/// 把当前会话的 cookie 写回文件，供下次运行使用
pub async fn persist_auth_state(page: &Page, auth_state_path: &str) -> Result<()> {
    let cookies = page
        .get_cookies()
        .await
        .map_err(|e| anyhow!("读取 cookie 失败: {}", e))?;

    ensure_auth_dir(auth_state_path)?;
    let json = serde_json::to_string_pretty(&cookies)?;
    fs::write(auth_state_path, json)
        .with_context(|| format!("写入会话文件失败: {}", auth_state_path))?;

    info!("💾 登录状态已保存至: {}", auth_state_path);
    Ok(())
}

/// 读取并解析会话文件
///
/// 缺失按"无历史会话"处理，损坏打警告，两种情况都返回 None
fn load_cookie_file(auth_state_path: &str) -> Option<Vec<Cookie>> {
    let raw = match fs::read_to_string(auth_state_path) {
        Ok(raw) => raw,
        Err(_) => {
            debug!("没有历史会话文件: {}", auth_state_path);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(cookies) => Some(cookies),
        Err(e) => {
            warn!("⚠️ 会话文件损坏，将以未登录状态启动: {}", e);
            None
        }
    }
}

fn cookie_to_param(cookie: Cookie) -> Option<CookieParam> {
    let mut builder = CookieParam::builder()
        .name(cookie.name)
        .value(cookie.value)
        .domain(cookie.domain)
        .path(cookie.path)
        .secure(cookie.secure)
        .http_only(cookie.http_only)
        .expires(TimeSinceEpoch::new(cookie.expires));
    if let Some(same_site) = cookie.same_site {
        builder = builder.same_site(same_site);
    }
    builder.build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_means_no_session() {
        assert!(load_cookie_file("/不存在/auth.json").is_none());
    }

    #[test]
    fn corrupt_file_degrades_to_none() {
        let mut file = tempfile::NamedTempFile::new().expect("创建临时文件失败");
        write!(file, "不是 JSON").expect("写入失败");
        assert!(load_cookie_file(file.path().to_str().expect("路径非法")).is_none());
    }

    #[test]
    fn empty_cookie_list_parses() {
        let mut file = tempfile::NamedTempFile::new().expect("创建临时文件失败");
        write!(file, "[]").expect("写入失败");
        let cookies = load_cookie_file(file.path().to_str().expect("路径非法"));
        assert_eq!(cookies.map(|c| c.len()), Some(0));
    }

    #[test]
    fn cookie_converts_to_param_with_expiry() {
        let raw = r#"{
            "name": "session_id",
            "value": "abc123",
            "domain": ".example.com",
            "path": "/",
            "expires": 1900000000.0,
            "size": 18,
            "httpOnly": true,
            "secure": true,
            "session": false,
            "sameSite": "Lax",
            "priority": "Medium",
            "sourceScheme": "Secure",
            "sourcePort": 443
        }"#;
        let cookie: Cookie = serde_json::from_str(raw).expect("cookie 应能解析");
        let param = cookie_to_param(cookie).expect("转换应成功");
        assert_eq!(param.name, "session_id");
        assert_eq!(param.expires, Some(TimeSinceEpoch::new(1_900_000_000.0)));
    }

    #[test]
    fn ensure_auth_dir_creates_parents() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join(".auth/bevy-auth.json");
        ensure_auth_dir(path.to_str().expect("路径非法")).expect("应能创建目录");
        assert!(path.parent().expect("应有父目录").exists());
    }
}
